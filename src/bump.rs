//! Version transitions over a [Config].
//!
//! The engine never touches the filesystem: it turns the stored state and a
//! requested bump into the `(old_raw, new_raw)` pair the rewriter substitutes
//! and the config to persist afterwards.

use tracing::debug;

use crate::config::Config;
use crate::domain::{BumpKind, VersionRecord};
use crate::error::{Result, VersionUpperError};
use crate::git::CommitSource;

/// Outcome of one version transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// `current_version` exactly as stored; the search string for rewriting
    pub old_raw: String,
    /// Replacement string written into target files
    pub new_raw: String,
    /// Config carrying the new versions, `files` unchanged
    pub config: Config,
}

/// Computes the transition for `bump <kind> [--release-candidate]`.
///
/// `commits` is consulted only for [BumpKind::CommitHash].
///
/// # Returns
/// * `Ok(Transition)` - Old and new raw versions plus the updated config
/// * `Err(UnsupportedKind)` - If `release_candidate` is combined with `rc` or `commit_hash`
/// * `Err(State)` - If a release is requested on a version without a candidate marker
pub fn apply<C>(
    config: &Config,
    kind: BumpKind,
    release_candidate: bool,
    commits: &C,
) -> Result<Transition>
where
    C: CommitSource + ?Sized,
{
    let current = config.current_semantic_version;

    let new_record = match kind {
        BumpKind::CommitHash => {
            if release_candidate {
                return Err(VersionUpperError::unsupported_kind(
                    "Cannot use --release-candidate when bumping commit_hash",
                ));
            }
            let commit = commits.current_commit()?;
            debug!(commit = %commit, "resolved current commit");
            VersionRecord::with_suffix(current, commit)?
        }
        BumpKind::Release => {
            if release_candidate {
                return Err(VersionUpperError::unsupported_kind(
                    "Cannot use --release-candidate when releasing",
                ));
            }
            return release(config);
        }
        BumpKind::Major | BumpKind::Minor | BumpKind::Patch if release_candidate => {
            VersionRecord::new(current.bump_as_candidate(kind)?)
        }
        BumpKind::ReleaseCandidate if release_candidate => {
            return Err(VersionUpperError::unsupported_kind(
                "Cannot use --release-candidate when bumping rc",
            ));
        }
        _ => VersionRecord::new(current.bump(kind)?),
    };

    Ok(transition(config, kind, new_record))
}

/// Computes the transition for `release`: drops the release-candidate marker.
///
/// Any suffix on the stored raw version is dropped as well.
pub fn release(config: &Config) -> Result<Transition> {
    let released = config.current_semantic_version.bump(BumpKind::Release)?;
    Ok(transition(config, BumpKind::Release, VersionRecord::new(released)))
}

fn transition(config: &Config, kind: BumpKind, new_record: VersionRecord) -> Transition {
    let old_raw = config.current_version.to_string();
    let new_raw = new_record.to_string();
    debug!(%kind, old = %old_raw, new = %new_raw, "computed version transition");

    Transition {
        old_raw,
        new_raw,
        config: Config {
            current_semantic_version: new_record.base,
            current_version: new_record,
            files: config.files.clone(),
        },
    }
}
