//! Terminal output for humans.
//!
//! Command results meant for scripts (`current-version`, `sample-config`,
//! ...) are printed plainly by the command handlers, not through here.

use console::style;

use crate::rewrite::{FileOutcome, FileReport, RewriteReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the version change about to be applied.
pub fn display_transition(old_raw: &str, new_raw: &str) {
    println!("\n{}", style("Version Change:").bold());
    println!("  From: {}", style(old_raw).red());
    println!("  To:   {}", style(new_raw).green());
}

/// Describe one file's outcome in a single line, without styling.
pub fn describe_outcome(file: &FileReport, dry_run: bool) -> String {
    let path = file.path.display();
    match &file.outcome {
        FileOutcome::Changed { occurrences } => {
            let verb = if dry_run { "would update" } else { "updated" };
            let noun = if *occurrences == 1 { "occurrence" } else { "occurrences" };
            format!("{} {} ({} {})", verb, path, occurrences, noun)
        }
        FileOutcome::Unchanged => format!("{}: version not found, left unchanged", path),
        FileOutcome::Failed(err) => format!("{}: {}", path, err),
    }
}

/// Display every file of a rewrite report.
///
/// Failures go to stderr so they stay visible when stdout is redirected.
pub fn display_rewrite_report(report: &RewriteReport, dry_run: bool) {
    if report.files.is_empty() {
        display_status("No files configured");
        return;
    }

    for file in &report.files {
        let line = describe_outcome(file, dry_run);
        match file.outcome {
            FileOutcome::Changed { .. } => display_success(&line),
            FileOutcome::Unchanged => display_status(&line),
            FileOutcome::Failed(_) => display_error(&line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VersionUpperError;
    use std::path::PathBuf;

    fn report(outcome: FileOutcome) -> FileReport {
        FileReport {
            path: PathBuf::from("app/main.py"),
            outcome,
        }
    }

    #[test]
    fn test_describe_changed() {
        let file = report(FileOutcome::Changed { occurrences: 2 });
        assert_eq!(describe_outcome(&file, false), "updated app/main.py (2 occurrences)");
        assert_eq!(
            describe_outcome(&file, true),
            "would update app/main.py (2 occurrences)"
        );
    }

    #[test]
    fn test_describe_single_occurrence() {
        let file = report(FileOutcome::Changed { occurrences: 1 });
        assert_eq!(describe_outcome(&file, false), "updated app/main.py (1 occurrence)");
    }

    #[test]
    fn test_describe_unchanged_and_failed() {
        let unchanged = report(FileOutcome::Unchanged);
        assert!(describe_outcome(&unchanged, false).contains("left unchanged"));

        let failed = report(FileOutcome::Failed(VersionUpperError::file_access(
            "app/main.py",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        )));
        let line = describe_outcome(&failed, false);
        assert!(line.starts_with("app/main.py: Cannot access app/main.py"));
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed to stdout/stderr
        display_error("test error");
        display_warning("test warning");
        display_success("test success");
        display_status("test status");
        display_transition("1.0.0", "1.0.1");
        display_rewrite_report(&RewriteReport::default(), false);
    }
}
