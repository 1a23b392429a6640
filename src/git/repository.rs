use crate::error::{Result, VersionUpperError};
use crate::git::CommitSource;
use git2::Repository as Git2Repo;
use std::path::{Path, PathBuf};

/// Reads the HEAD commit of the git repository at or above a directory.
///
/// The repository is discovered on each lookup, so constructing the source
/// never touches the filesystem.
pub struct Git2CommitSource {
    start: PathBuf,
}

impl Git2CommitSource {
    /// Look for a repository at or above `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Git2CommitSource {
            start: path.as_ref().to_path_buf(),
        }
    }
}

impl CommitSource for Git2CommitSource {
    fn current_commit(&self) -> Result<String> {
        let repo = Git2Repo::discover(&self.start)?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Err(VersionUpperError::state(
                    "repository has no commits yet; cannot bump commit_hash",
                ))
            }
            Err(e) => return Err(e.into()),
        };
        let commit = head.peel_to_commit()?;
        Ok(commit.id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_empty_tree(repo: &Git2Repo, message: &str) -> git2::Oid {
        let sig = git2::Signature::now("Test Author", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_current_commit_is_head() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit_empty_tree(&repo, "initial commit");
        let second = commit_empty_tree(&repo, "second commit");

        let source = Git2CommitSource::new(dir.path());
        let commit = source.current_commit().unwrap();
        assert_eq!(commit, second.to_string());
        assert_eq!(commit.len(), 40);
    }

    #[test]
    fn test_outside_repository_is_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = Git2CommitSource::new(dir.path().join("missing"));
        assert!(matches!(
            source.current_commit(),
            Err(VersionUpperError::Git(_))
        ));
    }

    #[test]
    fn test_unborn_head_is_state_error() {
        let dir = tempfile::tempdir().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        let source = Git2CommitSource::new(dir.path());
        assert!(matches!(
            source.current_commit(),
            Err(VersionUpperError::State(_))
        ));
    }
}
