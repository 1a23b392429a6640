//! Raw "current version" as it appears in target files.

use crate::domain::version::SemanticVersion;
use crate::error::{Result, VersionUpperError};
use std::fmt;
use std::str::FromStr;

/// Separator between the semantic core and the suffix
pub const SUFFIX_SEPARATOR: char = '+';

/// Semantic version plus an optional suffix such as a commit hash.
///
/// # Examples
/// - "1.2.3" -> VersionRecord { base: 1.2.3, suffix: None }
/// - "1.2.3-rc1+57fabef" -> VersionRecord { base: 1.2.3-rc1, suffix: Some("57fabef") }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub base: SemanticVersion,
    pub suffix: Option<String>,
}

impl VersionRecord {
    /// A record without suffix
    pub fn new(base: SemanticVersion) -> Self {
        VersionRecord { base, suffix: None }
    }

    /// A record carrying a suffix.
    ///
    /// The suffix must be a non-empty run of ASCII alphanumerics, `.` or `-`.
    pub fn with_suffix(base: SemanticVersion, suffix: impl Into<String>) -> Result<Self> {
        let suffix = suffix.into();
        validate_suffix(&suffix)?;
        Ok(VersionRecord {
            base,
            suffix: Some(suffix),
        })
    }

    /// Parse `semver[+suffix]`, splitting on the first `+`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(SUFFIX_SEPARATOR) {
            Some((base, suffix)) => {
                let base = SemanticVersion::parse(base)?;
                VersionRecord::with_suffix(base, suffix).map_err(|_| {
                    VersionUpperError::parse(format!("Invalid version suffix in '{}'", text))
                })
            }
            None => Ok(VersionRecord::new(SemanticVersion::parse(text)?)),
        }
    }
}

fn validate_suffix(suffix: &str) -> Result<()> {
    let valid = !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(VersionUpperError::parse(format!(
            "Invalid version suffix: '{}'",
            suffix
        )))
    }
}

impl FromStr for VersionRecord {
    type Err = VersionUpperError;

    fn from_str(s: &str) -> Result<Self> {
        VersionRecord::parse(s)
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "{}{}", SUFFIX_SEPARATOR, suffix)?;
        }
        Ok(())
    }
}

impl From<SemanticVersion> for VersionRecord {
    fn from(base: SemanticVersion) -> Self {
        VersionRecord::new(base)
    }
}
