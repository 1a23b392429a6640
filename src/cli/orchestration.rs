//! Command workflows
//!
//! Each handler receives the [CommandContext] explicitly instead of reading
//! a process-wide default, loads the config itself and returns plain data;
//! printing and exit codes are left to `main`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bump::{self, Transition};
use crate::config::{config_schema, Config, DEFAULT_CONFIG_FILE};
use crate::domain::BumpKind;
use crate::error::Result;
use crate::git::CommitSource;
use crate::rewrite::{self, RewriteReport};

/// State shared by every command handler
#[derive(Debug, Clone, PartialEq)]
pub struct CommandContext {
    /// Path of the config file
    pub config_path: PathBuf,
}

impl CommandContext {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        CommandContext {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        CommandContext::new(DEFAULT_CONFIG_FILE)
    }
}

/// Arguments for the bump workflow
///
/// Mirrors the CLI arguments without depending on clap, so the workflow can
/// be driven programmatically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpWorkflowArgs {
    pub kind: BumpKind,

    /// Mark the bumped version as a release candidate
    pub release_candidate: bool,

    /// Compute and report without writing files or the config
    pub dry_run: bool,
}

/// Result of a bump or release workflow
#[derive(Debug)]
pub struct WorkflowResult {
    /// Version strings substituted and the config as computed
    pub transition: Transition,

    /// Per-file rewrite results
    pub report: RewriteReport,

    /// Whether the config file was written
    pub saved: bool,

    pub dry_run: bool,
}

impl WorkflowResult {
    /// Every configured target failed; the config was left as it was.
    pub fn all_files_failed(&self) -> bool {
        self.report.all_failed()
    }
}

/// Bump workflow
///
/// 1. Load and validate the config
/// 2. Compute the transition (fails before touching any file)
/// 3. Rewrite the old raw version in every target file
/// 4. Persist the new config unless every target failed
pub fn run_bump<C>(ctx: &CommandContext, args: BumpWorkflowArgs, commits: &C) -> Result<WorkflowResult>
where
    C: CommitSource + ?Sized,
{
    let config = Config::load(ctx.config_path())?;
    let transition = bump::apply(&config, args.kind, args.release_candidate, commits)?;
    finish(ctx, transition, args.dry_run)
}

/// Release workflow: drop the release-candidate marker everywhere
pub fn run_release(ctx: &CommandContext, dry_run: bool) -> Result<WorkflowResult> {
    let config = Config::load(ctx.config_path())?;
    let transition = bump::release(&config)?;
    finish(ctx, transition, dry_run)
}

fn finish(ctx: &CommandContext, transition: Transition, dry_run: bool) -> Result<WorkflowResult> {
    let files = &transition.config.files;

    if dry_run {
        let report = rewrite::preview(&transition.old_raw, &transition.new_raw, files);
        return Ok(WorkflowResult {
            transition,
            report,
            saved: false,
            dry_run,
        });
    }

    let report = rewrite::rewrite(&transition.old_raw, &transition.new_raw, files);

    let saved = if report.all_failed() {
        debug!("every target failed; config left untouched");
        false
    } else {
        transition.config.save(ctx.config_path())?;
        info!(
            config = %ctx.config_path().display(),
            version = %transition.new_raw,
            "saved config"
        );
        true
    };

    Ok(WorkflowResult {
        transition,
        report,
        saved,
        dry_run,
    })
}

/// `current_version` as stored
pub fn current_version(ctx: &CommandContext) -> Result<String> {
    Ok(Config::load(ctx.config_path())?.current_version.to_string())
}

/// `current_semantic_version` as stored
pub fn current_semantic_version(ctx: &CommandContext) -> Result<String> {
    Ok(Config::load(ctx.config_path())?
        .current_semantic_version
        .to_string())
}

/// The canonical default config, serialized. Never reads the config file.
pub fn sample_config() -> Result<String> {
    Config::sample().to_json_string()
}

/// The config schema, pretty-printed. Never reads the config file.
pub fn schema() -> Result<String> {
    let mut text = serde_json::to_string_pretty(&config_schema())?;
    text.push('\n');
    Ok(text)
}
