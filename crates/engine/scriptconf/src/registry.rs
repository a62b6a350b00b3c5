//! Handing loaded config to a key/value registry

use crate::{load, LoadConfig, Result, Value};
use std::path::Path;

/// A store that accepts top-level config entries.
///
/// Keys containing `.` are nested-key notation; how they are indexed is up
/// to the registry.
pub trait Registry {
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Load a config script and set every top-level entry on the registry.
///
/// The registry is left untouched when loading fails.
pub fn bind_to_registry<R: Registry + ?Sized>(config: &LoadConfig, registry: &mut R) -> Result<()> {
    let data = load(config)?;
    tracing::debug!(
        "binding {} entries from {}",
        data.len(),
        config.path.display()
    );
    for (key, value) in data {
        registry.set(&key, value)?;
    }
    Ok(())
}

/// Like [`bind_to_registry`] with array conversion forced on, so sequence
/// getters see lists instead of index-keyed maps
pub fn auto_bind_to_registry<R: Registry + ?Sized>(
    config: &LoadConfig,
    registry: &mut R,
) -> Result<()> {
    let config = config.clone().with_arrays(true);
    bind_to_registry(&config, registry)
}

/// Bind a script by path with array conversion on
pub fn bind_to_registry_with_arrays<R: Registry + ?Sized>(
    path: impl AsRef<Path>,
    registry: &mut R,
) -> Result<()> {
    bind_to_registry(&LoadConfig::new(path.as_ref()).with_arrays(true), registry)
}
