//! The file layer: one parsed document, read-only once loaded.

use std::path::{Path, PathBuf};

use tracing::info;

use super::error::{ConfigError, ConfigResult};
use super::format::FileFormat;
use super::key::Key;
use super::layer::{Layer, Source};
use super::value::Value;

/// A config document loaded from disk.
#[derive(Debug, Clone)]
pub struct FileLayer {
    path: PathBuf,
    document: Value,
}

impl FileLayer {
    /// Read and parse `path`. The file is read in full; no handle is kept.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            source: e,
        })?;
        let format = FileFormat::from_path(path)?;
        let document = format.parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            source: e,
        })?;

        info!(path = %path.display(), %format, "loaded config file");
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Layer for FileLayer {
    fn name(&self) -> &str {
        "file"
    }

    /// Only leaves resolve. A key naming a whole section is absent, and so
    /// is an empty (`~`/`null`) leaf, which leaves the key to lower layers.
    fn try_get(&self, key: &Key) -> Option<Value> {
        self.document
            .get_path(key.segments())
            .filter(|node| !node.is_mapping() && !matches!(node, Value::Null))
            .cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.document
            .leaf_paths()
            .into_iter()
            .filter(|path| {
                self.document
                    .get_path(path.split('.'))
                    .is_some_and(|node| !matches!(node, Value::Null))
            })
            .collect()
    }

    fn source(&self) -> Source {
        Source::File
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn key(raw: &str) -> Key {
        Key::new(raw).unwrap()
    }

    #[test]
    fn load_yaml_and_lookup_dotted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.yaml", "precedence: config\nfoo:\n  bar: baz\n");

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(layer.path(), path.as_path());
        assert_eq!(layer.try_get(&key("foo.bar")), Some(Value::from("baz")));
        assert_eq!(layer.try_get(&key("precedence")), Some(Value::from("config")));
    }

    #[test]
    fn section_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.yaml", "foo:\n  bar: baz\n");

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(layer.try_get(&key("foo")), None);
    }

    #[test]
    fn scalar_as_intermediate_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.yaml", "precedence: config\n");

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(layer.try_get(&key("precedence.inner")), None);
    }

    #[test]
    fn sequences_are_leaves() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.json", r#"{"tags": ["a", "b"]}"#);

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(
            layer.try_get(&key("tags")).map(|v| v.to_string()),
            Some("a,b".to_string())
        );
        assert_eq!(layer.keys(), vec!["tags"]);
    }

    #[test]
    fn null_leaves_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.yaml", "precedence:\nport: ~\nname: app\n");

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(layer.try_get(&key("precedence")), None);
        assert_eq!(layer.try_get(&key("port")), None);
        assert_eq!(layer.keys(), vec!["name"]);
    }

    #[test]
    fn json_null_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.json", r#"{"server": {"port": null, "host": "h"}}"#);

        let layer = FileLayer::load(&path).unwrap();
        assert_eq!(layer.try_get(&key("server.port")), None);
        assert_eq!(layer.try_get(&key("server.host")), Some(Value::from("h")));
    }

    #[test]
    fn load_not_found() {
        let err = FileLayer::load(Path::new("/tmp/precedence_not_exist_config.yaml")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.toml", "not valid {{ toml");

        let err = FileLayer::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: FileFormat::Toml, .. }));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "config.ini", "a=b");

        let err = FileLayer::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }
}
