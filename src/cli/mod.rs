//! CLI command definitions and output helpers.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;

use precedence::config::Resolved;

/// Render a resolved value, optionally tagged with the layer it came from.
pub fn format_resolved(resolved: &Resolved, with_source: bool) -> String {
    if with_source {
        format!(
            "{}  {}",
            resolved.value,
            format!("({})", resolved.source).dimmed()
        )
    } else {
        resolved.value.to_string()
    }
}
