//! precedence — layered configuration resolver (library crate).
//!
//! Resolves each setting from, in order: flags the user passed, `PREFIX_KEY`
//! environment variables, a YAML/TOML/JSON config file, and registered
//! defaults. Re-exports public modules for integration tests and the CLI.

pub mod config;
pub mod constants;
pub mod env;
pub mod flags;

pub use config::{ConfigError, Resolver, Value};
pub use env::Env;
