//! Storage path management for uptimes.
//!
//! Production code uses [`StoragePaths::from_home`], which points at
//! `~/.uptimes/`. Tests use [`StoragePaths::with_root`] with a temp dir.

use std::path::{Path, PathBuf};

use crate::error::{Result, UptimesError};

/// Central location for every file uptimes reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// `~/.uptimes`
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(UptimesError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(".uptimes"),
        })
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default database file, shared by every tracked session.
    pub fn database_file(&self) -> PathBuf {
        self.root.join("uptimes.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

/// Expands a leading `~/` against the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_home_root_is_dot_uptimes() {
        if let Ok(paths) = StoragePaths::from_home() {
            assert!(paths.root().ends_with(".uptimes"));
        }
    }

    #[test]
    fn test_file_paths_under_root() {
        let paths = StoragePaths::with_root(PathBuf::from("/tmp/uptimes"));
        assert_eq!(
            paths.database_file(),
            PathBuf::from("/tmp/uptimes/uptimes.json")
        );
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/uptimes/config.toml")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/uptimes/logs"));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        let path = Path::new("/var/lib/uptimes.json");
        assert_eq!(expand_home(path), path.to_path_buf());
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/db/uptimes.json")),
                home.join("db/uptimes.json")
            );
        }
    }
}
