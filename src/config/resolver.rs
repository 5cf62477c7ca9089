//! The layered resolver.
//!
//! Priority (highest to lowest):
//! 1. Overrides (flags the user actually passed, or `set_override`)
//! 2. Environment variables (`PREFIX_KEY`)
//! 3. Config file
//! 4. Extension layers, in registration order
//! 5. Registered defaults
//!
//! A resolver is an ordinary value: build one per application (or per test)
//! and hand it to whatever needs configuration.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{ConfigError, ConfigResult};
use super::file::FileLayer;
use super::key::Key;
use super::layer::{DefaultLayer, EnvLayer, Layer, OverrideLayer, Source};
use super::value::Value;
use crate::env::Env;

/// A value together with the layer that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: Source,
}

/// Merges overrides, environment, file, and defaults into one view.
pub struct Resolver {
    overrides: OverrideLayer,
    env: EnvLayer,
    file: Option<FileLayer>,
    extensions: Vec<Box<dyn Layer>>,
    defaults: DefaultLayer,
    bound: HashSet<Key>,
}

impl Resolver {
    /// Create a resolver reading environment variables through `env`.
    pub fn new(env: Env) -> Self {
        Self {
            overrides: OverrideLayer::default(),
            env: EnvLayer::new(env),
            file: None,
            extensions: Vec::new(),
            defaults: DefaultLayer::default(),
            bound: HashSet::new(),
        }
    }

    /// Count a set-but-empty environment variable as defined.
    ///
    /// Off by default: `PREFIX_KEY=` falls through to the file and defaults.
    pub fn allow_empty_env(mut self, allow: bool) -> Self {
        self.env.set_allow_empty(allow);
        self
    }

    /// Replace `.` with `sep` when mapping dotted keys to variable names.
    pub fn env_key_separator(mut self, sep: impl Into<String>) -> Self {
        self.env.set_key_separator(sep);
        self
    }

    /// Builder form of [`Resolver::add_layer`].
    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Self {
        self.add_layer(layer);
        self
    }

    /// Register an extra layer below the file and above the defaults.
    ///
    /// Later registrations rank below earlier ones.
    pub fn add_layer(&mut self, layer: impl Layer + 'static) {
        debug!(layer = layer.name(), "registered extension layer");
        self.extensions.push(Box::new(layer));
    }

    /// Set the environment prefix.
    ///
    /// Repeating the same prefix (in any case) is a no-op. An empty prefix
    /// is accepted and yields names like `_KEY`.
    pub fn configure(&mut self, prefix: &str) -> ConfigResult<()> {
        if prefix.contains(['=', '\0']) {
            return Err(ConfigError::InvalidPrefix {
                prefix: prefix.to_string(),
            });
        }
        if let Some(current) = self.env.prefix() {
            if current.to_uppercase() == prefix.to_uppercase() {
                return Ok(());
            }
            return Err(ConfigError::PrefixConflict {
                current: current.to_string(),
                requested: prefix.to_string(),
            });
        }
        if prefix.is_empty() {
            warn!("empty environment prefix; variables will be named _KEY");
        }
        self.env.set_prefix(prefix);
        Ok(())
    }

    pub fn env_prefix(&self) -> Option<&str> {
        self.env.prefix()
    }

    /// Declare the fallback value for `key`. An empty key is ignored.
    pub fn register_default(&mut self, key: &str, value: impl Into<Value>) {
        let Some(key) = Key::new(key) else {
            warn!("ignoring default registered for an empty key");
            return;
        };
        self.defaults.insert(key, value.into());
    }

    /// Mark `key` as one whose value may be overridden (a bound flag).
    pub fn bind_overridable(&mut self, key: &str) {
        if let Some(key) = Key::new(key) {
            self.bound.insert(key);
        }
    }

    pub fn is_bound(&self, key: &str) -> bool {
        Key::new(key).is_some_and(|k| self.bound.contains(&k))
    }

    /// Record an explicit value for `key`. Outranks every other layer.
    pub fn set_override(&self, key: &str, value: impl Into<Value>) {
        let Some(key) = Key::new(key) else {
            warn!("ignoring override for an empty key");
            return;
        };
        if !self.bound.contains(&key) {
            debug!(%key, "override set for a key that was never bound");
        }
        self.overrides.set(key, value.into());
    }

    /// Remove an override so lower layers show through again.
    pub fn clear_override(&self, key: &str) -> Option<Value> {
        Key::new(key).and_then(|k| self.overrides.remove(&k))
    }

    /// Load `path` as the file layer, replacing any previous document.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        self.file = Some(FileLayer::load(path.as_ref())?);
        Ok(())
    }

    /// Like [`Resolver::load_file`], but a missing file is not an error.
    ///
    /// Returns `Ok(false)` and leaves the file layer untouched when `path`
    /// does not exist.
    pub fn load_optional_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<bool> {
        match self.load_file(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(path = %path.as_ref().display(), "optional config file not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Re-read the last loaded file. Returns `Ok(false)` if none was loaded.
    pub fn reload_file(&mut self) -> ConfigResult<bool> {
        let Some(path) = self.config_file().map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.load_file(path)?;
        Ok(true)
    }

    /// Path of the installed config document.
    pub fn config_file(&self) -> Option<&Path> {
        self.file.as_ref().map(FileLayer::path)
    }

    /// Layers in precedence order.
    fn layers(&self) -> impl Iterator<Item = &dyn Layer> {
        let fixed: [&dyn Layer; 2] = [&self.overrides, &self.env];
        fixed
            .into_iter()
            .chain(self.file.as_ref().map(|f| f as &dyn Layer))
            .chain(self.extensions.iter().map(|l| l.as_ref() as &dyn Layer))
            .chain(std::iter::once(&self.defaults as &dyn Layer))
    }

    /// Resolve `key` and report which layer answered.
    pub fn lookup(&self, key: &str) -> Option<Resolved> {
        let key = Key::new(key)?;
        let resolved = self.layers().find_map(|layer| {
            layer.try_get(&key).map(|value| Resolved {
                value,
                source: layer.source(),
            })
        });
        match &resolved {
            Some(r) => debug!(%key, source = %r.source, "resolved"),
            None => debug!(%key, "unresolved"),
        }
        resolved
    }

    /// Resolve `key` to its highest-precedence value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).map(|r| r.value)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    /// Every key known to an enumerable layer, sorted.
    ///
    /// Environment-only keys are not listed; there is no way to tell which
    /// variables are configuration.
    pub fn keys(&self) -> Vec<String> {
        self.layers()
            .flat_map(|layer| layer.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every known key resolved through the full scan, as a nested mapping.
    pub fn all_settings(&self) -> Value {
        let mut root = Value::empty_mapping();
        for key in self.keys() {
            if let Some(value) = self.get(&key) {
                let segments: Vec<&str> = key.split(crate::constants::KEY_DELIMITER).collect();
                root.insert_path(&segments, value);
            }
        }
        root
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Env::real())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("env_prefix", &self.env.prefix())
            .field("config_file", &self.config_file().map(PathBuf::from))
            .field(
                "extensions",
                &self.extensions.iter().map(|l| l.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
