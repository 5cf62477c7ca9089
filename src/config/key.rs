//! Normalized configuration keys.
//!
//! Every key is trimmed and lower-cased before it reaches a layer, so
//! `Foo.Bar`, `foo.bar` and `FOO.BAR` address the same setting in the
//! override, file, and default layers alike. The environment layer
//! upper-cases the normalized form.

use std::fmt;

use crate::constants::{ENV_PREFIX_SEPARATOR, KEY_DELIMITER};

/// A case-folded, possibly dotted, configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Normalize `raw` into a key. Returns `None` for an empty key.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of a dotted key; a flat key yields one segment.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_DELIMITER)
    }

    /// Environment variable name for this key: `PREFIX_KEY`, upper-cased.
    ///
    /// With `separator` set, every `.` in the key is replaced by it first.
    /// An empty prefix still contributes the joining underscore (`_KEY`).
    pub fn env_name(&self, prefix: &str, separator: Option<&str>) -> String {
        let key = match separator {
            Some(sep) => self.0.replace(KEY_DELIMITER, sep),
            None => self.0.clone(),
        };
        format!("{prefix}{ENV_PREFIX_SEPARATOR}{key}").to_uppercase()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_folded_and_trimmed() {
        let key = Key::new("  Foo.BAR ").unwrap();
        assert_eq!(key.as_str(), "foo.bar");
        assert_eq!(key, Key::new("FOO.bar").unwrap());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(Key::new("").is_none());
        assert!(Key::new("   ").is_none());
    }

    #[test]
    fn segments_split_on_dots() {
        let key = Key::new("a.b.c").unwrap();
        assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let flat = Key::new("precedence").unwrap();
        assert_eq!(flat.segments().collect::<Vec<_>>(), vec!["precedence"]);
    }

    #[test]
    fn env_name_joins_prefix_and_uppercases() {
        let key = Key::new("precedence").unwrap();
        assert_eq!(key.env_name("test", None), "TEST_PRECEDENCE");
    }

    #[test]
    fn env_name_keeps_dots_without_separator() {
        let key = Key::new("foo.bar").unwrap();
        assert_eq!(key.env_name("app", None), "APP_FOO.BAR");
        assert_eq!(key.env_name("app", Some("__")), "APP_FOO__BAR");
    }

    #[test]
    fn empty_prefix_leaves_leading_underscore() {
        let key = Key::new("port").unwrap();
        assert_eq!(key.env_name("", None), "_PORT");
    }
}
