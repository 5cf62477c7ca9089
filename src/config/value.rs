//! Configuration values.
//!
//! Every layer answers lookups with a [`Value`]. Documents loaded from disk
//! become a tree of [`Value::Mapping`] nodes whose keys are lower-cased so
//! dotted lookups stay case-insensitive.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A scalar or nested configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// An empty mapping, the root of an empty document.
    pub fn empty_mapping() -> Self {
        Value::Mapping(IndexMap::new())
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Interpret the value as a boolean.
    ///
    /// Strings accept `true/false`, `1/0`, `yes/no`, `on/off` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            // `as` saturates, so out-of-range floats are rejected first.
            Value::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Walk a dotted path through nested mappings.
    ///
    /// Returns `None` as soon as a segment is missing or an intermediate
    /// node is not a mapping.
    pub fn get_path<'a, 'k>(&'a self, segments: impl IntoIterator<Item = &'k str>) -> Option<&'a Value> {
        segments
            .into_iter()
            .try_fold(self, |node, segment| node.as_mapping()?.get(segment))
    }

    /// Insert `value` at a dotted path, creating intermediate mappings.
    ///
    /// A non-mapping node in the way is replaced by a mapping. An empty
    /// path replaces `self`.
    pub fn insert_path(&mut self, segments: &[&str], value: Value) {
        let Some((first, rest)) = segments.split_first() else {
            *self = value;
            return;
        };
        if !self.is_mapping() {
            *self = Value::empty_mapping();
        }
        if let Value::Mapping(map) = self {
            map.entry((*first).to_string())
                .or_insert(Value::Null)
                .insert_path(rest, value);
        }
    }

    /// Dotted paths of every non-mapping node below this one.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_leaves(self, String::new(), &mut out);
        out
    }
}

fn collect_leaves(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Mapping(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_leaves(v, path, out);
            }
        }
        _ if !prefix.is_empty() => out.push(prefix),
        _ => {}
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested() -> Value {
        let mut root = Value::empty_mapping();
        root.insert_path(&["foo", "bar"], Value::from("baz"));
        root.insert_path(&["precedence"], Value::from("config"));
        root
    }

    #[test]
    fn get_path_descends_mappings() {
        let root = nested();
        assert_eq!(root.get_path(["foo", "bar"]), Some(&Value::from("baz")));
        assert_eq!(root.get_path(["precedence"]), Some(&Value::from("config")));
    }

    #[test]
    fn get_path_stops_at_scalars() {
        let root = nested();
        assert_eq!(root.get_path(["precedence", "deeper"]), None);
        assert_eq!(root.get_path(["foo", "missing"]), None);
    }

    #[test]
    fn insert_path_replaces_scalar_in_the_way() {
        let mut root = nested();
        root.insert_path(&["precedence", "inner"], Value::from(1));
        assert_eq!(root.get_path(["precedence", "inner"]), Some(&Value::Integer(1)));
    }

    #[test]
    fn leaf_paths_lists_nested_keys_in_order() {
        let root = nested();
        assert_eq!(root.leaf_paths(), vec!["foo.bar", "precedence"]);
    }

    #[test]
    fn bool_conversion_accepts_common_spellings() {
        assert_eq!(Value::from("Yes").as_bool(), Some(true));
        assert_eq!(Value::from("off").as_bool(), Some(false));
        assert_eq!(Value::from(0).as_bool(), Some(false));
        assert_eq!(Value::from("maybe").as_bool(), None);
    }

    #[test]
    fn numeric_conversion_from_strings() {
        assert_eq!(Value::from(" 42 ").as_i64(), Some(42));
        assert_eq!(Value::from("1.5").as_f64(), Some(1.5));
        assert_eq!(Value::from(2.0).as_i64(), Some(2));
        assert_eq!(Value::from(2.5).as_i64(), None);
        assert_eq!(Value::from("nope").as_i64(), None);
    }

    #[test]
    fn out_of_range_float_is_not_an_integer() {
        assert_eq!(Value::from(1e300).as_i64(), None);
        assert_eq!(Value::from(-1e300).as_i64(), None);
        assert_eq!(Value::from(f64::NAN).as_i64(), None);
        assert_eq!(Value::from(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
    }

    #[test]
    fn display_renders_scalars_and_sequences() {
        assert_eq!(Value::from("baz").to_string(), "baz");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn display_renders_mapping_as_json() {
        let root = nested();
        let rendered = root.get_path(["foo"]).unwrap().to_string();
        assert_eq!(rendered, r#"{"bar":"baz"}"#);
    }
}
