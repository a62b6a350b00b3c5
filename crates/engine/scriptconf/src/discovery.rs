//! Locating a config script by name across search directories

use crate::loader::CONFIG_EXTENSION;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable with extra search directories (platform path-list syntax)
pub const SEARCH_PATH_ENV: &str = "SCRIPTCONF_PATH";

/// Search for `<name>.lua` in a list of directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSearch {
    /// File stem to look for
    pub name: String,
    /// Directories searched in order
    pub paths: Vec<PathBuf>,
}

impl ConfigSearch {
    /// Create a search for the given config name with no directories
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
        }
    }

    /// Add a directory to search. A leading `~` or `$HOME` is expanded.
    pub fn with_path(mut self, dir: impl AsRef<Path>) -> Self {
        self.paths.push(expand_home(dir.as_ref()));
        self
    }

    /// Add the working directory, the user config directory and `/etc`
    pub fn with_default_paths(mut self) -> Self {
        self.paths.push(PathBuf::from("."));
        if let Some(dir) = dirs::config_dir() {
            self.paths.push(dir);
        }
        self.paths.push(PathBuf::from("/etc"));
        self
    }

    /// Add directories listed in `SCRIPTCONF_PATH`
    pub fn with_env_paths(mut self) -> Self {
        if let Some(list) = env::var_os(SEARCH_PATH_ENV) {
            self.paths.extend(
                env::split_paths(&list)
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| expand_home(&p)),
            );
        }
        self
    }

    /// File name searched for in each directory
    pub fn file_name(&self) -> String {
        let suffix = format!(".{}", CONFIG_EXTENSION);
        if self.name.ends_with(&suffix) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, suffix)
        }
    }

    /// Candidate files in search order
    pub fn candidates(&self) -> Vec<PathBuf> {
        let file_name = self.file_name();
        self.paths.iter().map(|dir| dir.join(&file_name)).collect()
    }

    /// First candidate that exists as a file
    pub fn find(&self) -> Option<PathBuf> {
        if self.name.is_empty() {
            return None;
        }
        let found = self.candidates().into_iter().find(|p| p.is_file());
        match &found {
            Some(path) => tracing::debug!("found config {}", path.display()),
            None => tracing::debug!(
                "no {} in {} search directories",
                self.file_name(),
                self.paths.len()
            ),
        }
        found
    }
}

fn expand_home(dir: &Path) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return dir.to_path_buf();
    };
    for prefix in ["~", "$HOME"] {
        if let Ok(rest) = dir.strip_prefix(prefix) {
            return home.join(rest);
        }
    }
    dir.to_path_buf()
}
