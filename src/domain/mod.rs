//! Domain logic - pure version rules independent of files and git

pub mod record;
pub mod version;

pub use record::{VersionRecord, SUFFIX_SEPARATOR};
pub use version::{BumpKind, SemanticVersion};
