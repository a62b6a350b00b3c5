//! Loading Lua config scripts into a [`Map`]
//!
//! A config script may either return a table:
//!
//! ```lua
//! return {
//!     app = { name = "demo", version = "1.0.0" },
//!     port = 8080,
//! }
//! ```
//!
//! or assign globals directly:
//!
//! ```lua
//! app = { name = "demo", version = "1.0.0" }
//! port = 8080
//! ```
//!
//! A returned table takes precedence; its fields become the top-level
//! entries. Otherwise every global the script defined is collected, leaving
//! out runtime built-ins and host globals the script did not change.

use crate::convert::{lua_table_to_map, ConvertOptions, Unsupported};
use crate::{Error, LuaEngine, Map, Result, Value};
use mlua::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of config script files
pub const CONFIG_EXTENSION: &str = "lua";

/// Input for one [`load`] call
#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    /// Script to run
    pub path: PathBuf,
    /// Globals bound before the script runs
    pub globals: Map,
    /// Turn array-shaped tables into sequences
    pub convert_arrays: bool,
    /// Policy for functions and other values without a config representation
    pub unsupported: Unsupported,
}

impl LoadConfig {
    /// Create a config for the given script path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Replace all injected globals
    pub fn with_globals(mut self, globals: Map) -> Self {
        self.globals = globals;
        self
    }

    /// Inject one global
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    /// Inject one global from any serializable host value
    pub fn try_with_global<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        self.globals
            .insert(name.into(), Value::from_serialize(value)?);
        Ok(self)
    }

    /// Enable or disable array conversion
    pub fn with_arrays(mut self, convert_arrays: bool) -> Self {
        self.convert_arrays = convert_arrays;
        self
    }

    /// Set the policy for values without a config representation
    pub fn with_unsupported(mut self, unsupported: Unsupported) -> Self {
        self.unsupported = unsupported;
        self
    }

    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_arrays(self.convert_arrays)
            .with_unsupported(self.unsupported)
    }
}

/// Run a config script and collect its values
pub fn load(config: &LoadConfig) -> Result<Map> {
    if config.path.as_os_str().is_empty() {
        return Err(Error::MissingPath);
    }
    if !config.path.is_file() {
        return Err(Error::NotFound(config.path.clone()));
    }

    tracing::debug!(
        "loading lua config {} (arrays: {})",
        config.path.display(),
        config.convert_arrays
    );

    let mut engine = LuaEngine::new();
    for (name, value) in &config.globals {
        engine.set_global(name, value)?;
    }

    let returned = engine.exec_file(&config.path)?;
    let options = config.convert_options();

    if let Some(LuaValue::Table(table)) = returned {
        tracing::debug!("using table returned by {}", config.path.display());
        return lua_table_to_map(&table, &options);
    }

    tracing::debug!("collecting globals from {}", config.path.display());
    engine.script_globals(&options)
}

/// Load with array conversion on
pub fn load_with_arrays(path: impl AsRef<Path>) -> Result<Map> {
    load(&LoadConfig::new(path.as_ref()).with_arrays(true))
}

/// Load with injected globals
pub fn load_with_globals(path: impl AsRef<Path>, globals: Map) -> Result<Map> {
    load(&LoadConfig::new(path.as_ref()).with_globals(globals))
}

/// Load with injected globals and array conversion on
pub fn load_with_arrays_and_globals(path: impl AsRef<Path>, globals: Map) -> Result<Map> {
    load(
        &LoadConfig::new(path.as_ref())
            .with_globals(globals)
            .with_arrays(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn script(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".lua").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            load(&LoadConfig::default()),
            Err(Error::MissingPath)
        ));
    }

    #[test]
    fn test_not_found() {
        let err = load(&LoadConfig::new("/nonexistent/file.lua")).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref p) if p == Path::new("/nonexistent/file.lua")));
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&LoadConfig::new(dir.path())),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_globals_style() {
        let f = script("debug_mode = true\nport = 8080\n");
        let result = load(&LoadConfig::new(f.path())).unwrap();

        let mut expected = Map::new();
        expected.insert("debug_mode".into(), Value::Bool(true));
        expected.insert("port".into(), Value::Number(8080.0));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_return_takes_precedence() {
        let f = script("ignored = 1\nreturn { kept = 2 }\n");
        let result = load(&LoadConfig::new(f.path())).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["kept"], Value::Number(2.0));
    }

    #[test]
    fn test_non_table_return_falls_back_to_globals() {
        let f = script("name = 'x'\nreturn 42\n");
        let result = load(&LoadConfig::new(f.path())).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["name"], Value::from("x"));
    }

    #[test]
    fn test_injected_global() {
        let f = script("result = global_value * 2\n");
        let result = load(&LoadConfig::new(f.path()).with_global("global_value", 21)).unwrap();

        let mut expected = Map::new();
        expected.insert("result".into(), Value::Number(42.0));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_serialized_global() {
        #[derive(Serialize)]
        struct Env {
            name: &'static str,
            replicas: u32,
        }

        let f = script("label = env.name .. '-' .. env.replicas\n");
        let config = LoadConfig::new(f.path())
            .try_with_global(
                "env",
                &Env {
                    name: "prod",
                    replicas: 3,
                },
            )
            .unwrap();
        let result = load(&config).unwrap();
        assert_eq!(result["label"], Value::from("prod-3"));
    }

    #[test]
    fn test_returned_array_keeps_positions() {
        let f = script("return { 'a', 'b' }\n");
        let result = load_with_arrays(f.path()).unwrap();
        assert_eq!(result["1"], Value::from("a"));
        assert_eq!(result["2"], Value::from("b"));
    }

    #[test]
    fn test_reject_unsupported() {
        let f = script("function helper() end\nport = 1\n");
        let lenient = load(&LoadConfig::new(f.path())).unwrap();
        assert!(lenient["helper"].as_str().unwrap().starts_with("function: "));

        let strict = load(&LoadConfig::new(f.path()).with_unsupported(Unsupported::Reject));
        assert!(matches!(strict, Err(Error::Conversion { .. })));
    }

    #[test]
    fn test_presets() {
        let f = script("return { list = { 'x' }, n = base }\n");
        let mut globals = Map::new();
        globals.insert("base".into(), Value::from(7));

        let plain = load_with_globals(f.path(), globals.clone()).unwrap();
        assert!(plain["list"].as_map().is_ok());
        assert_eq!(plain["n"], Value::Number(7.0));

        let both = load_with_arrays_and_globals(f.path(), globals).unwrap();
        assert_eq!(both["list"], Value::from(vec!["x"]));
        assert_eq!(both["n"], Value::Number(7.0));
    }
}
