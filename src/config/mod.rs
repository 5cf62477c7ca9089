//! Layered configuration.
//!
//! Resolves each key from overrides, the environment, a config file, and
//! registered defaults, in that order.

pub mod error;
pub mod file;
pub mod format;
pub mod key;
pub mod layer;
pub mod resolver;
pub mod value;

pub use error::{ConfigError, ConfigResult};
pub use format::FileFormat;
pub use key::Key;
pub use layer::{Layer, Source};
pub use resolver::{Resolved, Resolver};
pub use value::Value;
