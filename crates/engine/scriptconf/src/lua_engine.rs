//! Lua execution context for a single config load
//!
//! Provides a Lua VM wrapper with:
//! - Host globals injected before the script runs
//! - Script execution that keeps the chunk's return values
//! - Enumeration of script-defined globals, skipping runtime built-ins

use crate::builtins::is_builtin_global;
use crate::convert::{
    key_to_string, lua_value_to_value, value_to_lua_value, ConvertOptions, Unsupported,
};
use crate::{Error, Map, Result, Value};
use mlua::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Conversion used to compare injected globals with what the script left
const SNAPSHOT: ConvertOptions = ConvertOptions {
    convert_arrays: true,
    unsupported: Unsupported::Stringify,
};

/// Lua state owned by one load. Dropping it closes the VM.
pub struct LuaEngine {
    lua: Lua,
    /// Contents of each host-injected global at injection time
    injected: HashMap<String, Value>,
}

impl LuaEngine {
    /// Create a fresh Lua state with the safe standard libraries
    pub fn new() -> Self {
        Self {
            lua: Lua::new(),
            injected: HashMap::new(),
        }
    }

    /// Get the underlying Lua state
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Bind a host value as a Lua global
    pub fn set_global(&mut self, name: &str, value: &Value) -> Result<()> {
        let lua_value = value_to_lua_value(&self.lua, value)?;
        let snapshot = lua_value_to_value(&lua_value, &SNAPSHOT)?;
        self.lua.globals().set(name, lua_value)?;
        self.injected.insert(name.to_string(), snapshot);
        tracing::trace!("injected global '{}' ({})", name, value.type_name());
        Ok(())
    }

    /// Run a Lua source file and return the last value it returned, if any
    pub fn exec_file(&self, path: &Path) -> Result<Option<LuaValue>> {
        let source = std::fs::read(path)?;
        self.exec_chunk(source, &format!("@{}", path.display()))
    }

    /// Run a Lua chunk under the given chunk name
    pub fn exec_chunk(&self, source: impl AsRef<[u8]>, name: &str) -> Result<Option<LuaValue>> {
        let returned: LuaMultiValue = self
            .lua
            .load(source.as_ref())
            .set_name(name)
            .call(())
            .map_err(Error::Execution)?;
        Ok(returned.into_iter().last())
    }

    /// Globals the script defined or changed, converted with `options`.
    ///
    /// Built-ins are left out, and so are host injections whose contents
    /// the script did not touch. A table changed in place counts as changed.
    pub fn script_globals(&self, options: &ConvertOptions) -> Result<Map> {
        let mut found = Map::new();
        for pair in self.lua.globals().pairs::<LuaValue, LuaValue>() {
            let (key, value) = pair?;
            let name = key_to_string(&key, options)?;
            if is_builtin_global(&name) || self.is_untouched_injection(&name, &value) {
                continue;
            }
            found.insert(name, lua_value_to_value(&value, options)?);
        }
        Ok(found)
    }

    fn is_untouched_injection(&self, name: &str, value: &LuaValue) -> bool {
        let Some(snapshot) = self.injected.get(name) else {
            return false;
        };
        lua_value_to_value(value, &SNAPSHOT).is_ok_and(|current| current == *snapshot)
    }
}

impl Default for LuaEngine {
    fn default() -> Self {
        Self::new()
    }
}
