//! Operational status of a repository.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry operational status.
///
/// Unknown values are kept verbatim in [`OperationalStatus::Unrecognised`] so a
/// record is never lost over one bad enum value; the register logs a warning
/// when one is set or loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationalStatus {
    Operational,
    Trial,
    Broken,
    Closed,
    Unrecognised(String),
}

impl OperationalStatus {
    /// Parses a status string. Matching is exact; anything else is kept as
    /// [`OperationalStatus::Unrecognised`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "Operational" => Self::Operational,
            "Trial" => Self::Trial,
            "Broken" => Self::Broken,
            "Closed" => Self::Closed,
            other => Self::Unrecognised(other.to_string()),
        }
    }

    /// The wire spelling of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Operational => "Operational",
            Self::Trial => "Trial",
            Self::Broken => "Broken",
            Self::Closed => "Closed",
            Self::Unrecognised(s) => s,
        }
    }

    /// Returns false for values outside the registry vocabulary.
    #[must_use]
    pub fn is_recognised(&self) -> bool {
        !matches!(self, Self::Unrecognised(_))
    }
}

impl From<String> for OperationalStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for OperationalStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<OperationalStatus> for String {
    fn from(status: OperationalStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
