//! Driver license number rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Three uppercase ASCII letters followed by five ASCII digits.
static LICENSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9]{5}$").expect("license pattern is valid"));

/// Validate a license number candidate.
///
/// Length, letter-case and digit violations all report the same
/// [`DomainError::InvalidLicenseFormat`].
pub fn validate_license_number(candidate: &str) -> DomainResult<()> {
    if LICENSE_PATTERN.is_match(candidate) {
        Ok(())
    } else {
        Err(DomainError::InvalidLicenseFormat)
    }
}

/// A license number known to satisfy the format rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseNumber(String);

impl LicenseNumber {
    /// Validate and wrap a candidate.
    pub fn parse(candidate: impl Into<String>) -> DomainResult<Self> {
        let candidate = candidate.into();
        validate_license_number(&candidate)?;
        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for LicenseNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LicenseNumber::parse(value)
    }
}

impl From<LicenseNumber> for String {
    fn from(license: LicenseNumber) -> Self {
        license.0
    }
}

impl std::fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
