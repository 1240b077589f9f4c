//! URL equivalence.
//!
//! Registries advertise the same resource as `http://x.org`, `https://x.org/`
//! or plain `x.org`. [`canonicalize_url`] expands a URL into every spelling
//! reachable by toggling the scheme and a single trailing slash; two URLs are
//! equivalent when their variant sets intersect. Input is never validated.

use std::collections::BTreeSet;

/// The set of spellings considered identical to a URL.
pub type UrlVariants = BTreeSet<String>;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// Expands `url` into its equivalence closure.
///
/// The closure always contains the input itself. Scheme-qualified input
/// yields both schemes with and without a trailing slash. Bare input
/// additionally keeps its bare spellings.
#[must_use]
pub fn canonicalize_url(url: &str) -> UrlVariants {
    let mut variants = UrlVariants::new();
    variants.insert(url.to_string());

    let (rest, bare) = match strip_scheme(url) {
        Some(rest) => (rest, false),
        None => (url, true),
    };
    let base = rest.strip_suffix('/').unwrap_or(rest);

    for path in [base.to_string(), format!("{base}/")] {
        for scheme in SCHEMES {
            variants.insert(format!("{scheme}{path}"));
        }
        if bare {
            variants.insert(path);
        }
    }
    variants
}

/// Returns true if the two variant sets share a spelling.
#[must_use]
pub fn variants_intersect(a: &UrlVariants, b: &UrlVariants) -> bool {
    !a.is_disjoint(b)
}

/// Returns true if `a` and `b` name the same resource.
#[must_use]
pub fn urls_equivalent(a: &str, b: &str) -> bool {
    variants_intersect(&canonicalize_url(a), &canonicalize_url(b))
}

fn strip_scheme(url: &str) -> Option<&str> {
    SCHEMES.iter().find_map(|scheme| {
        url.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .map(|_| &url[scheme.len()..])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_matched_case_insensitively() {
        assert_eq!(strip_scheme("HTTPS://x.org"), Some("x.org"));
        assert_eq!(strip_scheme("http://x.org"), Some("x.org"));
        assert_eq!(strip_scheme("ftp://x.org"), None);
    }

    #[test]
    fn short_and_multibyte_input_does_not_panic() {
        assert_eq!(strip_scheme("ht"), None);
        assert_eq!(strip_scheme("héllo wörld"), None);
    }
}
