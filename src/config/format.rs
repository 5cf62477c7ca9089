//! Config document formats.
//!
//! The format is picked from the file extension and each parser's own
//! value tree is folded into a [`Value`] with lower-cased mapping keys.

use std::path::Path;

use indexmap::IndexMap;
use strum::{Display, EnumString};

use super::error::{ConfigError, ConfigResult, ParseSource};
use super::value::Value;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum FileFormat {
    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
    #[strum(to_string = "toml")]
    Toml,
    #[strum(to_string = "json")]
    Json,
}

impl FileFormat {
    /// Pick the format from `path`'s extension. No extension means YAML.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let Some(ext) = path.extension() else {
            return Ok(FileFormat::Yaml);
        };
        let ext = ext.to_string_lossy();
        ext.parse().map_err(|_| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.into_owned(),
        })
    }

    /// Parse `content` into a document tree whose root is a mapping.
    pub fn parse(self, content: &str) -> Result<Value, ParseSource> {
        let root = match self {
            FileFormat::Yaml => {
                let raw: serde_yaml_ng::Value = serde_yaml_ng::from_str(content)?;
                from_yaml(raw)?
            }
            FileFormat::Toml => {
                let raw: toml::Table = toml::from_str(content)?;
                from_toml(toml::Value::Table(raw))
            }
            FileFormat::Json => {
                let raw: serde_json::Value = serde_json::from_str(content)?;
                from_json(raw)
            }
        };

        match root {
            Value::Mapping(_) => Ok(root),
            // An empty YAML document.
            Value::Null => Ok(Value::empty_mapping()),
            _ => Err("document root must be a mapping".into()),
        }
    }
}

fn from_yaml(raw: serde_yaml_ng::Value) -> Result<Value, ParseSource> {
    use serde_yaml_ng::Value as Y;

    Ok(match raw {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Boolean(b),
        Y::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Y::String(s) => Value::String(s),
        Y::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<_, _>>()?,
        ),
        Y::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    Y::String(s) => s,
                    Y::Bool(b) => b.to_string(),
                    Y::Number(n) => n.to_string(),
                    other => return Err(format!("unsupported mapping key: {other:?}").into()),
                };
                out.insert(key.to_lowercase(), from_yaml(v)?);
            }
            Value::Mapping(out)
        }
        Y::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn from_toml(raw: toml::Value) -> Value {
    match raw {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Boolean(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), from_toml(v)))
                .collect(),
        ),
    }
}

fn from_json(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), from_json(v)))
                .collect(),
        ),
    }
}
