use crate::error::{Result, VersionUpperError};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn release_candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^rc(0|[1-9][0-9]*)$").expect("valid rc pattern"))
}

/// Semantic version with an optional release-candidate marker.
///
/// Renders as `major.minor.patch`, or `major.minor.patch-rcN` when the
/// marker is present. Values are immutable: every bump returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub release_candidate: Option<u64>,
}

/// Transition applied to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    /// Next release candidate of the same base (`1.2.3` -> `1.2.3-rc1` -> `1.2.3-rc2`)
    ReleaseCandidate,
    /// Lift the release-candidate marker
    Release,
    /// Only touches the raw version suffix, never the semantic version
    CommitHash,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::ReleaseCandidate => "rc",
            BumpKind::Release => "release",
            BumpKind::CommitHash => "commit_hash",
        };
        f.write_str(name)
    }
}

impl SemanticVersion {
    /// Create a released (non-candidate) version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            release_candidate: None,
        }
    }

    /// Create a release candidate `major.minor.patch-rcN`
    pub fn candidate(major: u64, minor: u64, patch: u64, rc: u64) -> Self {
        SemanticVersion {
            release_candidate: Some(rc),
            ..SemanticVersion::new(major, minor, patch)
        }
    }

    /// Parse `major.minor.patch[-rcN]`.
    ///
    /// Components must be non-negative integers without leading zeros, so
    /// that `parse(s).to_string() == s` for every accepted input.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text).map_err(|e| {
            VersionUpperError::parse(format!("Invalid version '{}': {}", text, e))
        })?;

        if !parsed.build.is_empty() {
            return Err(VersionUpperError::parse(format!(
                "Invalid version '{}': build metadata is not part of a semantic version",
                text
            )));
        }

        let release_candidate = if parsed.pre.is_empty() {
            None
        } else {
            let captures = release_candidate_pattern()
                .captures(parsed.pre.as_str())
                .ok_or_else(|| {
                    VersionUpperError::parse(format!(
                        "Invalid version '{}': pre-release must be of the form rcN",
                        text
                    ))
                })?;
            let number = captures[1].parse::<u64>().map_err(|_| {
                VersionUpperError::parse(format!(
                    "Invalid release candidate number in '{}'",
                    text
                ))
            })?;
            Some(number)
        };

        Ok(SemanticVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            release_candidate,
        })
    }

    pub fn is_release_candidate(&self) -> bool {
        self.release_candidate.is_some()
    }

    /// The same numbers without a release-candidate marker
    pub fn base(&self) -> Self {
        SemanticVersion::new(self.major, self.minor, self.patch)
    }

    /// Apply a bump.
    ///
    /// - `Major`/`Minor`/`Patch` increment their component, reset the lower
    ///   ones and drop any release-candidate marker.
    /// - `ReleaseCandidate` keeps the base and starts or advances the marker.
    /// - `Release` drops the marker; fails when there is none.
    /// - `CommitHash` is rejected: it never changes a semantic version.
    pub fn bump(&self, kind: BumpKind) -> Result<Self> {
        match kind {
            BumpKind::Major => Ok(SemanticVersion::new(increment(self.major, "major")?, 0, 0)),
            BumpKind::Minor => Ok(SemanticVersion::new(
                self.major,
                increment(self.minor, "minor")?,
                0,
            )),
            BumpKind::Patch => Ok(SemanticVersion::new(
                self.major,
                self.minor,
                increment(self.patch, "patch")?,
            )),
            BumpKind::ReleaseCandidate => {
                let rc = match self.release_candidate {
                    Some(rc) => increment(rc, "rc")?,
                    None => 1,
                };
                Ok(SemanticVersion {
                    release_candidate: Some(rc),
                    ..*self
                })
            }
            BumpKind::Release => {
                if self.release_candidate.is_none() {
                    return Err(VersionUpperError::state(format!(
                        "{} is not a release candidate",
                        self
                    )));
                }
                Ok(self.base())
            }
            BumpKind::CommitHash => Err(VersionUpperError::unsupported_kind(
                "commit_hash does not change the semantic version",
            )),
        }
    }

    /// Apply a `Major`/`Minor`/`Patch` bump and mark the result as a release
    /// candidate.
    ///
    /// The marker starts at 1, or advances when this version already is a
    /// candidate of the bumped base.
    pub fn bump_as_candidate(&self, kind: BumpKind) -> Result<Self> {
        match kind {
            BumpKind::Major | BumpKind::Minor | BumpKind::Patch => {}
            other => {
                return Err(VersionUpperError::unsupported_kind(format!(
                    "Cannot use --release-candidate when bumping {}",
                    other
                )))
            }
        }

        let target = self.bump(kind)?;
        let rc = match self.release_candidate {
            Some(rc) if self.base() == target => increment(rc, "rc")?,
            _ => 1,
        };
        Ok(SemanticVersion {
            release_candidate: Some(rc),
            ..target
        })
    }
}

fn increment(value: u64, component: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        VersionUpperError::state(format!(
            "cannot bump {}: {} is already the largest supported value",
            component, value
        ))
    })
}

impl FromStr for SemanticVersion {
    type Err = VersionUpperError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(rc) = self.release_candidate {
            write!(f, "-rc{}", rc)?;
        }
        Ok(())
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.release_candidate, other.release_candidate) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(&b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v, SemanticVersion::new(1, 2, 3));
        assert!(!v.is_release_candidate());
    }

    #[test]
    fn test_version_parse_release_candidate() {
        let v = SemanticVersion::parse("1.2.3-rc4").unwrap();
        assert_eq!(v, SemanticVersion::candidate(1, 2, 3, 4));
    }

    #[test]
    fn test_version_parse_invalid() {
        for text in [
            "", "1.2", "1.2.3.4", "v1.2.3", "1.2.x", "-1.2.3", "01.2.3", "1.2.3-beta1",
            "1.2.3-rc", "1.2.3-rc01", "1.2.3+abc", "1.2.3rc1", " 1.2.3",
        ] {
            let err = SemanticVersion::parse(text).unwrap_err();
            assert!(
                matches!(err, VersionUpperError::Parse(_)),
                "expected parse error for {:?}, got {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_version_round_trip() {
        for text in ["0.0.0", "1.2.3", "10.20.30", "1.0.1-rc1", "3.0.0-rc0", "2.4.6-rc12"] {
            assert_eq!(SemanticVersion::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_version_ordering() {
        let rc = SemanticVersion::parse("1.2.3-rc1").unwrap();
        let rc2 = SemanticVersion::parse("1.2.3-rc2").unwrap();
        let released = SemanticVersion::parse("1.2.3").unwrap();
        let minor = SemanticVersion::parse("1.3.0").unwrap();
        let major = SemanticVersion::parse("2.0.0").unwrap();
        assert!(rc < rc2);
        assert!(rc2 < released);
        assert!(released < minor);
        assert!(minor < major);
        assert!(SemanticVersion::parse("1.2.2").unwrap() < rc);
    }

    #[test]
    fn test_version_bump_resets_lower_components() {
        let v = SemanticVersion::new(1, 2, 3);
        assert_eq!(v.bump(BumpKind::Major).unwrap(), SemanticVersion::new(2, 0, 0));
        assert_eq!(v.bump(BumpKind::Minor).unwrap(), SemanticVersion::new(1, 3, 0));
        assert_eq!(v.bump(BumpKind::Patch).unwrap(), SemanticVersion::new(1, 2, 4));
    }

    #[test]
    fn test_plain_bump_drops_release_candidate() {
        let v = SemanticVersion::candidate(1, 0, 1, 2);
        assert_eq!(v.bump(BumpKind::Patch).unwrap(), SemanticVersion::new(1, 0, 2));
        assert_eq!(v.bump(BumpKind::Major).unwrap(), SemanticVersion::new(2, 0, 0));
    }

    #[test]
    fn test_bump_does_not_mutate() {
        let v = SemanticVersion::new(0, 1, 0);
        let _ = v.bump(BumpKind::Major).unwrap();
        assert_eq!(v, SemanticVersion::new(0, 1, 0));
    }

    #[test]
    fn test_standalone_release_candidate_bump() {
        let v = SemanticVersion::new(0, 0, 0);
        let rc1 = v.bump(BumpKind::ReleaseCandidate).unwrap();
        assert_eq!(rc1.to_string(), "0.0.0-rc1");
        let rc2 = rc1.bump(BumpKind::ReleaseCandidate).unwrap();
        assert_eq!(rc2.to_string(), "0.0.0-rc2");
    }

    #[test]
    fn test_bump_as_candidate() {
        let v = SemanticVersion::new(1, 0, 0);
        assert_eq!(
            v.bump_as_candidate(BumpKind::Patch).unwrap().to_string(),
            "1.0.1-rc1"
        );
        assert_eq!(
            v.bump_as_candidate(BumpKind::Minor).unwrap().to_string(),
            "1.1.0-rc1"
        );

        let rc = SemanticVersion::candidate(0, 0, 0, 1);
        assert_eq!(
            rc.bump_as_candidate(BumpKind::Major).unwrap().to_string(),
            "1.0.0-rc1"
        );
    }

    #[test]
    fn test_bump_as_candidate_rejects_other_kinds() {
        let v = SemanticVersion::new(1, 0, 0);
        for kind in [BumpKind::ReleaseCandidate, BumpKind::Release, BumpKind::CommitHash] {
            assert!(matches!(
                v.bump_as_candidate(kind),
                Err(VersionUpperError::UnsupportedKind(_))
            ));
        }
    }

    #[test]
    fn test_release() {
        let v = SemanticVersion::parse("1.0.1-rc1").unwrap();
        let released = v.bump(BumpKind::Release).unwrap();
        assert_eq!(released.to_string(), "1.0.1");

        let err = released.bump(BumpKind::Release).unwrap_err();
        assert!(matches!(err, VersionUpperError::State(_)));
        assert!(err.to_string().contains("not a release candidate"));
    }

    #[test]
    fn test_commit_hash_is_unsupported() {
        let v = SemanticVersion::new(1, 0, 0);
        assert!(matches!(
            v.bump(BumpKind::CommitHash),
            Err(VersionUpperError::UnsupportedKind(_))
        ));
    }

    #[test]
    fn test_bump_at_u64_limit_is_state_error() {
        let max = u64::MAX.to_string();
        let cases = [
            (format!("{}.0.0", max), BumpKind::Major),
            (format!("0.{}.0", max), BumpKind::Minor),
            (format!("0.0.{}", max), BumpKind::Patch),
            (format!("0.0.0-rc{}", max), BumpKind::ReleaseCandidate),
        ];
        for (text, kind) in cases {
            let v = SemanticVersion::parse(&text).unwrap();
            let err = v.bump(kind).unwrap_err();
            assert!(
                matches!(err, VersionUpperError::State(_)),
                "expected state error for {} {}, got {:?}",
                text,
                kind,
                err
            );
            assert!(err.to_string().contains(&max));
        }

        let v = SemanticVersion::parse(&format!("{}.0.0", max)).unwrap();
        assert!(matches!(
            v.bump_as_candidate(BumpKind::Major),
            Err(VersionUpperError::State(_))
        ));
        assert_eq!(
            v.bump(BumpKind::Minor).unwrap(),
            SemanticVersion::new(u64::MAX, 1, 0)
        );
    }
}
