//! Hierarchical config store with dotted key paths
//!
//! The ConfigTree provides:
//! - Named paths into nested maps (e.g., "database.connection_pool.max_size")
//! - Values that can be read and written
//! - Typed getters and decoding into serde structures

use crate::{Error, Map, Registry, Result, Value};
use serde::de::DeserializeOwned;

/// Separator for nested key notation
pub const KEY_SEPARATOR: char = '.';

/// The main config tree structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    /// Top-level entries
    root: Map,
}

impl ConfigTree {
    /// Create a new empty config tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config tree from top-level entries
    pub fn with_root(root: Map) -> Self {
        Self { root }
    }

    /// Get the top-level entries
    pub fn root(&self) -> &Map {
        &self.root
    }

    /// Check if the tree holds no entries
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Get a value by path (e.g., "database.host")
    pub fn get(&self, path: &str) -> Result<&Value> {
        let mut parts = path.split(KEY_SEPARATOR);
        let first = parts.next().unwrap_or_default();
        let mut current = self
            .root
            .get(first)
            .ok_or_else(|| Error::PathNotFound(path.to_string()))?;

        for part in parts {
            current = match current {
                Value::Map(map) => map.get(part),
                _ => None,
            }
            .ok_or_else(|| Error::PathNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// Get a value by path with a default if not found
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// Check if a path resolves to a value
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Set a value by path, creating intermediate maps as needed.
    /// Non-map values on the way are replaced by maps.
    pub fn set(&mut self, path: &str, value: Value) {
        let parts: Vec<&str> = path.split(KEY_SEPARATOR).collect();
        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current = &mut self.root;
        for &part in parents {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Map(Map::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(Map::new());
            }
            let Value::Map(map) = entry else {
                return;
            };
            current = map;
        }
        current.insert((*last).to_string(), value);
    }

    /// Get value as specific type
    pub fn get_bool(&self, path: &str) -> Result<bool> {
        self.get(path)?.as_bool()
    }

    pub fn get_i64(&self, path: &str) -> Result<i64> {
        self.get(path)?.as_i64()
    }

    pub fn get_u32(&self, path: &str) -> Result<u32> {
        self.get(path)?.as_u32()
    }

    pub fn get_f64(&self, path: &str) -> Result<f64> {
        self.get(path)?.as_f64()
    }

    pub fn get_str(&self, path: &str) -> Result<&str> {
        self.get(path)?.as_str()
    }

    pub fn get_string_slice(&self, path: &str) -> Result<Vec<String>> {
        self.get(path)?
            .as_sequence()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn get_i64_slice(&self, path: &str) -> Result<Vec<i64>> {
        self.get(path)?
            .as_sequence()?
            .iter()
            .map(Value::as_i64)
            .collect()
    }

    /// All leaf paths in dotted notation, sorted. Empty maps count as leaves.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys);
        keys
    }

    /// Decode the whole tree into a typed structure
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(&self.root)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Decode the value at a path into a typed structure
    pub fn unmarshal_key<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let json = serde_json::to_value(self.get(path)?)?;
        Ok(serde_json::from_value(json)?)
    }
}

fn collect_keys(map: &Map, prefix: &str, keys: &mut Vec<String>) {
    for (name, value) in map {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}{}{}", prefix, KEY_SEPARATOR, name)
        };
        match value {
            Value::Map(child) if !child.is_empty() => collect_keys(child, &path, keys),
            _ => keys.push(path),
        }
    }
}

impl Registry for ConfigTree {
    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        ConfigTree::set(self, key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn sample() -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.set("app.name", Value::from("Demo"));
        tree.set("app.version", Value::from(1));
        tree.set("database.pool.max_size", Value::from(16));
        tree.set("database.replicas", Value::from(vec!["r1", "r2"]));
        tree.set("debug", Value::from(true));
        tree
    }

    #[test]
    fn test_config_tree_basic() {
        let tree = sample();
        assert_eq!(tree.get_str("app.name").unwrap(), "Demo");
        assert_eq!(tree.get_i64("app.version").unwrap(), 1);
        assert_eq!(tree.get_u32("database.pool.max_size").unwrap(), 16);
        assert!(tree.get_bool("debug").unwrap());
        assert_eq!(
            tree.get_string_slice("database.replicas").unwrap(),
            vec!["r1", "r2"]
        );
    }

    #[test]
    fn test_config_tree_path_not_found() {
        let tree = sample();
        assert!(matches!(
            tree.get("nonexistent.path"),
            Err(Error::PathNotFound(_))
        ));
        assert!(tree.get("debug.deeper").is_err());
        assert!(!tree.contains("app.missing"));
        assert_eq!(tree.get_or("app.missing", &Value::Null), &Value::Null);
    }

    #[test]
    fn test_nested_map_values_reachable() {
        let mut db = Map::new();
        db.insert("host".into(), Value::from("localhost"));
        db.insert("port".into(), Value::from(5432));

        let mut tree = ConfigTree::new();
        tree.set("database", Value::Map(db));
        assert_eq!(tree.get_str("database.host").unwrap(), "localhost");
        assert_eq!(tree.get_i64("database.port").unwrap(), 5432);
    }

    #[test]
    fn test_set_replaces_scalar_parent() {
        let mut tree = ConfigTree::new();
        tree.set("a", Value::from(1));
        tree.set("a.b", Value::from(2));
        assert_eq!(tree.get_i64("a.b").unwrap(), 2);
    }

    #[test]
    fn test_keys() {
        let tree = sample();
        assert_eq!(
            tree.keys(),
            vec![
                "app.name",
                "app.version",
                "database.pool.max_size",
                "database.replicas",
                "debug"
            ]
        );
    }

    #[test]
    fn test_unmarshal() {
        #[derive(Deserialize)]
        struct Pool {
            max_size: u16,
        }
        #[derive(Deserialize)]
        struct Database {
            pool: Pool,
            replicas: Vec<String>,
        }
        #[derive(Deserialize)]
        struct AppConfig {
            database: Database,
            debug: bool,
        }

        let tree = sample();
        let config: AppConfig = tree.unmarshal().unwrap();
        assert_eq!(config.database.pool.max_size, 16);
        assert_eq!(config.database.replicas, vec!["r1", "r2"]);
        assert!(config.debug);

        let pool: Pool = tree.unmarshal_key("database.pool").unwrap();
        assert_eq!(pool.max_size, 16);
    }

    #[test]
    fn test_unmarshal_type_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            debug: String,
        }

        let tree = sample();
        assert!(matches!(
            tree.unmarshal::<Wrong>(),
            Err(Error::Decode(_))
        ));
    }
}
