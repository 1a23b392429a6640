pub mod atomic;
pub mod bump;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod rewrite;
pub mod ui;

pub use error::{Result, VersionUpperError};
