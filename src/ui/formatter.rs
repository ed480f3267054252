//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::{Progress, StepOutcome};
use crate::git::RepositorySnapshot;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Echo a command line before it runs.
pub fn display_command(command: &str) {
    println!("  {}", style(format!("$ {}", command)).dim());
}

/// Forward a failed tool's captured output verbatim.
pub fn display_tool_output(output: &str) {
    eprintln!("{}", output.trim_end());
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print one workflow progress event.
pub fn display_progress(progress: Progress<'_>) {
    match progress {
        Progress::Started(step) => display_status(&format!("{}...", step)),
        Progress::Finished(StepOutcome::ManualInstructions { commands }) => {
            display_manual_instructions(commands)
        }
        Progress::Finished(outcome) => display_success(&outcome.to_string()),
        Progress::Warning(warning) => display_boundary_warning(warning),
    }
}

/// Display the commands the operator still has to run.
///
/// # Arguments
/// * `commands` - Command lines, in the order they should be run
pub fn display_manual_instructions(commands: &[String]) {
    println!(
        "\n{} Local commit is ready. To publish, run:",
        style("→").yellow()
    );
    for command in commands {
        println!("  {}", style(command).cyan());
    }
}

/// Display the steps of a dry run.
pub fn display_plan(steps: &[String]) {
    println!("{}", style("Dry run, no changes will be made:").bold());
    for (i, step) in steps.iter().enumerate() {
        println!("  Step {}: {}", i + 1, step);
    }
}

/// Render a repository snapshot as text lines.
pub fn format_snapshot(snapshot: Option<&RepositorySnapshot>) -> Vec<String> {
    let Some(snapshot) = snapshot else {
        return vec!["Repository: none".to_string()];
    };

    let mut lines = vec!["Repository: present".to_string()];
    lines.push(format!(
        "Branch:     {}",
        snapshot.branch.as_deref().unwrap_or("(detached HEAD)")
    ));
    lines.push(format!(
        "HEAD:       {}",
        match (&snapshot.head_oid, &snapshot.head_summary) {
            (Some(oid), Some(summary)) => format!("{} {}", &oid[..oid.len().min(7)], summary),
            _ => "(no commits yet)".to_string(),
        }
    ));
    lines.push(format!(
        "Upstream:   {}",
        snapshot.upstream.as_deref().unwrap_or("(none)")
    ));
    if snapshot.remotes.is_empty() {
        lines.push("Remotes:    (none)".to_string());
    } else {
        lines.push("Remotes:".to_string());
        for (name, url) in &snapshot.remotes {
            lines.push(format!("  {} {}", name, url));
        }
    }
    lines
}

/// Display a repository snapshot.
pub fn display_snapshot(snapshot: Option<&RepositorySnapshot>) {
    for line in format_snapshot(snapshot) {
        println!("{}", line);
    }
}
