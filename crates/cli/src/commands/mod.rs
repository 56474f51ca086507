//! Command implementations.
//!
//! Commands render to stdout; logs go to stderr.

pub mod cart;
pub mod checkout;

use std::io::Write;

/// Write a rendered view followed by a newline to stdout.
pub fn print(text: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}")
}
