//! Country name/code lookup.

use isocountry::CountryCode;

/// Maps ISO 3166-1 alpha-2 codes to country names and back.
///
/// Lookups are fallible by returning `None`; callers leave the derived field
/// unset rather than failing.
pub trait CountryLookup: Send + Sync {
    /// Name for an alpha-2 code (case-insensitive).
    fn name_for_code(&self, code: &str) -> Option<String>;

    /// Alpha-2 code for a country name (case-insensitive, exact name).
    fn code_for_name(&self, name: &str) -> Option<String>;
}

/// Lookup backed by the ISO 3166-1 table from the `isocountry` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoCountries;

impl CountryLookup for IsoCountries {
    fn name_for_code(&self, code: &str) -> Option<String> {
        let code = code.trim().to_ascii_uppercase();
        CountryCode::for_alpha2(&code)
            .ok()
            .map(|c| c.name().to_string())
    }

    fn code_for_name(&self, name: &str) -> Option<String> {
        let name = name.trim();
        CountryCode::iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .map(|c| c.alpha2().to_string())
    }
}
