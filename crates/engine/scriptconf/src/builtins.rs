//! Global names owned by the Lua runtime rather than by a config script

use std::collections::HashSet;
use std::sync::LazyLock;

/// Name of the global table's reference to itself
pub const ROOT_GLOBAL: &str = "_G";

static BUILTIN_GLOBALS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Version markers
        "_VERSION",
        // Base library
        "assert",
        "collectgarbage",
        "dofile",
        "error",
        "getmetatable",
        "ipairs",
        "load",
        "loadfile",
        "next",
        "pairs",
        "pcall",
        "print",
        "rawequal",
        "rawget",
        "rawlen",
        "rawset",
        "require",
        "select",
        "setmetatable",
        "tonumber",
        "tostring",
        "type",
        "warn",
        "xpcall",
        // Lua 5.1 era names still shipped by some builds
        "getfenv",
        "setfenv",
        "loadstring",
        "unpack",
        "module",
        "newproxy",
        // Library namespaces
        "bit32",
        "coroutine",
        "debug",
        "io",
        "math",
        "os",
        "package",
        "string",
        "table",
        "utf8",
    ]
    .into_iter()
    .collect()
});

/// Check whether a global name belongs to the runtime, including the root
/// `_G` binding.
pub fn is_builtin_global(name: &str) -> bool {
    name == ROOT_GLOBAL || BUILTIN_GLOBALS.contains(name)
}
