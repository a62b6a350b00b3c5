//! Lua configuration scripts loaded into a generic value model
//!
//! This crate provides:
//! - **Loader**: run a Lua config script and collect what it returned or
//!   the globals it defined
//! - **Converter**: map Lua values to [`Value`] and back, optionally turning
//!   array-shaped tables into sequences
//! - **ConfigTree**: a registry with dotted key paths and typed getters
//! - **Discovery / CLI**: find `<name>.lua` in search directories and wire
//!   `--config` into command line tools
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptconf::{bind_to_registry, load, ConfigTree, LoadConfig};
//!
//! // Load a script into a flat map of top-level entries
//! let data = load(&LoadConfig::new("config/app.lua").with_arrays(true))?;
//!
//! // Or bind it into a registry and query nested keys
//! let mut tree = ConfigTree::new();
//! bind_to_registry(&LoadConfig::new("config/app.lua"), &mut tree)?;
//! let port = tree.get_u32("database.port")?;
//! ```

mod builtins;
mod config_tree;
pub mod convert;
mod discovery;
mod error;
mod loader;
mod lua_engine;
mod registry;
mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use builtins::{is_builtin_global, ROOT_GLOBAL};
pub use config_tree::{ConfigTree, KEY_SEPARATOR};
pub use convert::{ConvertOptions, Unsupported};
pub use discovery::{ConfigSearch, SEARCH_PATH_ENV};
pub use error::{Error, Result};
pub use loader::{
    load, load_with_arrays, load_with_arrays_and_globals, load_with_globals, LoadConfig,
    CONFIG_EXTENSION,
};
pub use lua_engine::LuaEngine;
pub use registry::{
    auto_bind_to_registry, bind_to_registry, bind_to_registry_with_arrays, Registry,
};
pub use value::{Map, Value};

// Re-export mlua for downstream crates
pub use mlua;
