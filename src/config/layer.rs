//! Layer providers.
//!
//! A layer answers `try_get(key)` with a value or nothing. The resolver
//! scans layers top-down and stops at the first answer; it knows nothing
//! about how each layer stores its bindings.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::trace;

use super::key::Key;
use super::value::Value;
use crate::env::Env;

/// Which layer supplied a resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Override,
    Environment,
    File,
    /// A caller-registered layer, by name.
    Extension(String),
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Override => write!(f, "override"),
            Source::Environment => write!(f, "environment"),
            Source::File => write!(f, "file"),
            Source::Extension(name) => write!(f, "{name}"),
            Source::Default => write!(f, "default"),
        }
    }
}

/// A source of key → value bindings taking part in resolution.
///
/// Implement this to plug an extra source (a remote key/value store, a
/// secrets vault) in between the file and default layers.
pub trait Layer: Send + Sync {
    /// Short name used in logs and provenance.
    fn name(&self) -> &str;

    /// Look up an already-normalized key.
    fn try_get(&self, key: &Key) -> Option<Value>;

    /// Keys this layer can enumerate. Layers that derive values on demand
    /// (the environment) return nothing.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn source(&self) -> Source {
        Source::Extension(self.name().to_string())
    }
}

/// Values explicitly supplied at runtime, as if passed on the command line.
///
/// The only layer mutated after setup, so it sits behind a lock.
#[derive(Debug, Default)]
pub struct OverrideLayer {
    values: RwLock<HashMap<Key, Value>>,
}

impl OverrideLayer {
    /// Record a value; last write wins.
    pub fn set(&self, key: Key, value: Value) {
        // Each write is a single insert, so a poisoned map is still consistent.
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Drop an override, returning the previous value.
    pub fn remove(&self, key: &Key) -> Option<Value> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }
}

impl Layer for OverrideLayer {
    fn name(&self) -> &str {
        "override"
    }

    fn try_get(&self, key: &Key) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .map(|k| k.to_string())
            .collect()
    }

    fn source(&self) -> Source {
        Source::Override
    }
}

/// Reads `PREFIX_KEY` from the environment at lookup time.
///
/// Inactive until a prefix is configured.
#[derive(Debug, Clone)]
pub struct EnvLayer {
    env: Env,
    prefix: Option<String>,
    allow_empty: bool,
    key_separator: Option<String>,
}

impl EnvLayer {
    pub fn new(env: Env) -> Self {
        Self {
            env,
            prefix: None,
            allow_empty: false,
            key_separator: None,
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    /// When `true`, a variable that is set but empty counts as defined.
    pub fn set_allow_empty(&mut self, allow: bool) {
        self.allow_empty = allow;
    }

    /// Replace `.` in dotted keys with `sep` when forming variable names.
    pub fn set_key_separator(&mut self, sep: impl Into<String>) {
        self.key_separator = Some(sep.into());
    }

    /// Variable name consulted for `key`, if a prefix is configured.
    pub fn var_name(&self, key: &Key) -> Option<String> {
        let prefix = self.prefix.as_deref()?;
        Some(key.env_name(prefix, self.key_separator.as_deref()))
    }
}

impl Layer for EnvLayer {
    fn name(&self) -> &str {
        "environment"
    }

    fn try_get(&self, key: &Key) -> Option<Value> {
        let name = self.var_name(key)?;
        let value = self.env.var(&name).ok()?;
        if value.is_empty() && !self.allow_empty {
            trace!(var = %name, "ignoring empty environment variable");
            return None;
        }
        Some(Value::String(value))
    }

    fn source(&self) -> Source {
        Source::Environment
    }
}

/// Fallback values declared when keys are registered.
#[derive(Debug, Default, Clone)]
pub struct DefaultLayer {
    values: HashMap<Key, Value>,
}

impl DefaultLayer {
    pub fn insert(&mut self, key: Key, value: Value) {
        self.values.insert(key, value);
    }
}

impl Layer for DefaultLayer {
    fn name(&self) -> &str {
        "default"
    }

    fn try_get(&self, key: &Key) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().map(|k| k.to_string()).collect()
    }

    fn source(&self) -> Source {
        Source::Default
    }
}
