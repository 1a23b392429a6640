use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use version_upper::cli::orchestration::{self, BumpWorkflowArgs, CommandContext, WorkflowResult};
use version_upper::config::DEFAULT_CONFIG_FILE;
use version_upper::domain::BumpKind;
use version_upper::git::Git2CommitSource;
use version_upper::ui;

#[derive(Parser)]
#[command(
    name = "version-upper",
    version,
    about = "Update version strings in files using semantic versioning and commit hashes",
    after_help = "Examples:\n  version-upper bump patch\n  version-upper bump minor --release-candidate\n  version-upper bump commit_hash\n  version-upper release"
)]
struct Args {
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file path")]
    config: PathBuf,

    #[arg(short, long, global = true, help = "Print debug logs to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bumps version strings, updates config
    Bump {
        #[arg(value_enum)]
        part: BumpPart,

        #[arg(long, help = "Designate the bumped version as a release candidate")]
        release_candidate: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
    /// Removes the release-candidate marker from the version strings
    Release {
        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
    /// Prints the current version
    CurrentVersion,
    /// Prints the current semantic version
    CurrentSemanticVersion,
    /// Prints a sample config
    SampleConfig,
    /// Prints the config schema in JSON
    ConfigSchema,
}

#[derive(Clone, Copy, ValueEnum)]
enum BumpPart {
    Major,
    Minor,
    Patch,
    Rc,
    #[value(name = "commit_hash")]
    CommitHash,
}

impl From<BumpPart> for BumpKind {
    fn from(part: BumpPart) -> Self {
        match part {
            BumpPart::Major => BumpKind::Major,
            BumpPart::Minor => BumpKind::Minor,
            BumpPart::Patch => BumpKind::Patch,
            BumpPart::Rc => BumpKind::ReleaseCandidate,
            BumpPart::CommitHash => BumpKind::CommitHash,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let ctx = CommandContext::new(args.config);
    let code = match run(&ctx, args.command) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&e.to_string());
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &CommandContext, command: Command) -> Result<i32> {
    match command {
        Command::Bump {
            part,
            release_candidate,
            dry_run,
        } => {
            let args = BumpWorkflowArgs {
                kind: part.into(),
                release_candidate,
                dry_run,
            };
            let commits = Git2CommitSource::new(".");
            let result = orchestration::run_bump(ctx, args, &commits)?;
            Ok(report(ctx, &result))
        }
        Command::Release { dry_run } => {
            let result = orchestration::run_release(ctx, dry_run)?;
            Ok(report(ctx, &result))
        }
        Command::CurrentVersion => {
            println!("{}", orchestration::current_version(ctx)?);
            Ok(0)
        }
        Command::CurrentSemanticVersion => {
            println!("{}", orchestration::current_semantic_version(ctx)?);
            Ok(0)
        }
        Command::SampleConfig => {
            print!("{}", orchestration::sample_config()?);
            Ok(0)
        }
        Command::ConfigSchema => {
            print!("{}", orchestration::schema()?);
            Ok(0)
        }
    }
}

/// Print the outcome of a bump or release and pick the exit code.
fn report(ctx: &CommandContext, result: &WorkflowResult) -> i32 {
    let transition = &result.transition;
    ui::display_transition(&transition.old_raw, &transition.new_raw);
    println!();
    ui::display_rewrite_report(&result.report, result.dry_run);

    if result.dry_run {
        ui::display_status("Dry run: no files or config were written");
        return 0;
    }

    if result.all_files_failed() {
        ui::display_error(&format!(
            "No target file could be updated; {} still records {}",
            ctx.config_path().display(),
            transition.old_raw
        ));
        return 1;
    }

    let failed = result.report.failed().count();
    if failed > 0 {
        ui::display_warning(&format!(
            "{} file(s) were not updated and may still contain {}",
            failed, transition.old_raw
        ));
    }

    if result.saved {
        ui::display_success(&format!(
            "Saved {} at version {}",
            ctx.config_path().display(),
            transition.new_raw
        ));
    }
    0
}
