//! Commit identifier lookup
//!
//! `bump commit_hash` needs the identifier of the commit the working tree
//! is on. The lookup sits behind the [CommitSource] trait so the bump engine
//! can run against a real repository or a fixed value in tests.
//!
//! - [repository::Git2CommitSource]: reads HEAD with the `git2` crate
//! - [mock::FixedCommitSource]: returns a preset identifier

pub mod mock;
pub mod repository;

pub use mock::FixedCommitSource;
pub use repository::Git2CommitSource;

use crate::error::Result;

/// Source of the current VCS commit identifier
pub trait CommitSource {
    /// Full identifier of the current commit (40 hex characters for git).
    ///
    /// # Returns
    /// * `Ok(String)` - The commit identifier
    /// * `Err` - If there is no repository or it has no commits yet
    fn current_commit(&self) -> Result<String>;
}
