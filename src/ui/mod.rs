//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_command, display_error, display_manual_instructions,
    display_plan, display_progress, display_snapshot, display_status, display_success,
    display_tool_output,
};

/// Reads one line from `input` after printing `prompt`.
///
/// End of input counts as an empty answer.
pub fn read_answer<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompts the operator for the remote URL.
///
/// Returns the trimmed answer; validation is left to the workflow so that
/// the tool check still runs first.
pub fn prompt_remote_url() -> Result<String> {
    let stdin = io::stdin();
    read_answer(
        "Enter the remote repository URL: ",
        &mut stdin.lock(),
        &mut io::stdout(),
    )
}

/// Waits for the operator to press Enter before the process exits.
pub fn pause_for_acknowledgment() -> Result<()> {
    let stdin = io::stdin();
    read_answer("\nPress Enter to exit...", &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}
