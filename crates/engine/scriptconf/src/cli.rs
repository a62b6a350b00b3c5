//! Command line flags for loading a config script at startup
//!
//! ```ignore
//! use clap::Parser;
//! use scriptconf::{cli::ConfigArgs, ConfigTree};
//!
//! #[derive(Parser)]
//! struct MyAppArgs {
//!     #[command(flatten)]
//!     config: ConfigArgs,
//! }
//!
//! let args = MyAppArgs::parse();
//! let mut tree = ConfigTree::new();
//! args.config.apply("myapp", &mut tree)?;
//! ```

use crate::{bind_to_registry, ConfigSearch, LoadConfig, Map, Registry, Result, Value};
use clap::Args;
use std::path::PathBuf;

/// Config flags shared by command line tools.
/// Use `#[command(flatten)]` to include these in your own argument struct.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Load configuration from a Lua file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Config name to search for when --config is not given (<NAME>.lua)
    #[arg(long, value_name = "NAME")]
    pub config_name: Option<String>,

    /// Directory to search for the named config (can specify multiple)
    #[arg(long = "config-path", value_name = "DIR")]
    pub config_paths: Vec<PathBuf>,

    /// Convert array-shaped tables into lists
    #[arg(long)]
    pub arrays: bool,

    /// Global made available to the script (can specify multiple)
    #[arg(long = "global", value_name = "KEY=VALUE", value_parser = parse_global)]
    pub globals: Vec<(String, Value)>,
}

impl ConfigArgs {
    /// Load config into the registry.
    ///
    /// An explicit `--config` path must load; its errors are returned.
    /// Otherwise the named config (`--config-name`, or `default_name`) is
    /// searched for and, if found, bound; failures there are logged and
    /// skipped. Returns the path that was bound.
    pub fn apply<R: Registry + ?Sized>(
        &self,
        default_name: &str,
        registry: &mut R,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.config {
            bind_to_registry(&self.load_config(path.clone()), registry)?;
            return Ok(Some(path.clone()));
        }

        let Some(path) = self.search(default_name).find() else {
            return Ok(None);
        };

        match bind_to_registry(&self.load_config(path.clone()), registry) {
            Ok(()) => {
                tracing::info!("loaded config {}", path.display());
                Ok(Some(path))
            }
            Err(e) => {
                tracing::warn!("skipping config {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Search configured by these flags; without `--config-path` the
    /// default directories and `SCRIPTCONF_PATH` are used
    pub fn search(&self, default_name: &str) -> ConfigSearch {
        let name = self.config_name.as_deref().unwrap_or(default_name);
        if self.config_paths.is_empty() {
            return ConfigSearch::new(name).with_default_paths().with_env_paths();
        }
        self.config_paths
            .iter()
            .fold(ConfigSearch::new(name), |search, dir| search.with_path(dir))
    }

    /// Load settings for a script path from these flags
    pub fn load_config(&self, path: PathBuf) -> LoadConfig {
        let globals: Map = self.globals.iter().cloned().collect();
        LoadConfig::new(path)
            .with_globals(globals)
            .with_arrays(self.arrays)
    }

    /// Get the config path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }
}

/// Parse `KEY=VALUE`; the value becomes a bool, a number or a string
pub fn parse_global(arg: &str) -> std::result::Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", arg));
    }

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(raw)),
    };
    Ok((key.to_string(), value))
}
