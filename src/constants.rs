//! App-wide constants.
//!
//! Centralises the tool name, environment prefix, and key syntax so a
//! rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "precedence";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix the CLI configures for environment lookups (`TEST_PRECEDENCE`).
pub const ENV_PREFIX: &str = "test";

// ── Key syntax ──────────────────────────────────────────────────────

/// Separates the segments of a nested key (`foo.bar`).
pub const KEY_DELIMITER: char = '.';

/// Joins the environment prefix and the key (`TEST` + `_` + `FOO`).
pub const ENV_PREFIX_SEPARATOR: &str = "_";

// ── The `run` command's flag ────────────────────────────────────────

/// Key of the flag the `run` command resolves.
pub const PRECEDENCE_KEY: &str = "precedence";

/// Default value of `--precedence` when no other layer defines it.
pub const PRECEDENCE_DEFAULT: &str = "default";
