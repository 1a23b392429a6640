use crate::error::Result;
use crate::git::CommitSource;

/// Commit source returning a preset identifier, for tests
pub struct FixedCommitSource {
    commit: String,
}

impl FixedCommitSource {
    pub fn new(commit: impl Into<String>) -> Self {
        FixedCommitSource {
            commit: commit.into(),
        }
    }
}

impl CommitSource for FixedCommitSource {
    fn current_commit(&self) -> Result<String> {
        Ok(self.commit.clone())
    }
}
