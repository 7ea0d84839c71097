//! Human-readable companion to the JSON response on stdout.
//!
//! Stdout carries exactly one JSON envelope per command, so anything meant
//! for a person reading the terminal is written to stderr.

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
///
/// # Colors
/// - "✕ Error:" in red
/// - Message in white
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints the notice shown when a merge or rebase stops on conflicts.
pub fn print_conflict(message: &str) {
    eprintln!("\n{} {}\n", "! Conflict:".yellow(), message.white());
}
