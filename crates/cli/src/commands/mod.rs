//! Subcommand implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod token;

use serde::Serialize;

/// Print `value` to stdout as pretty JSON.
///
/// Logs go to stderr, so stdout stays machine-readable.
#[allow(clippy::print_stdout)]
pub fn emit(value: &impl Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
