//! Startup configuration for a single invocation.
//!
//! Precedence: config file, then `UPTIMES_*` environment, then CLI flags.

use std::path::PathBuf;

use uptimes_core::{load_config, CurrentSession, SessionTracker, StoragePaths, UptimesConfig};

#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub keep_count: Option<usize>,
}

pub struct Context {
    pub paths: StoragePaths,
    pub config: UptimesConfig,
}

impl Context {
    pub fn load(overrides: &Overrides) -> Result<Self, String> {
        let paths = StoragePaths::from_home()?;
        Self::load_with_paths(paths, overrides, |name| std::env::var(name).ok())
    }

    /// Env values are only parsed here; validation runs once, after flags.
    pub fn load_with_paths<F>(
        paths: StoragePaths,
        overrides: &Overrides,
        env: F,
    ) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = overrides
            .config
            .clone()
            .unwrap_or_else(|| paths.config_file());

        let mut config = load_config(&config_path)?;
        config.apply_env_with(env)?;

        if let Some(database) = &overrides.database {
            config.database = Some(database.clone());
        }
        if let Some(keep_count) = overrides.keep_count {
            config.keep_count = keep_count;
        }
        config.validate()?;

        tracing::debug!(
            config = %config_path.display(),
            database = %config.database_path(&paths).display(),
            keep_count = config.keep_count,
            "Configuration loaded"
        );

        Ok(Self { paths, config })
    }

    pub fn tracker(&self, current: CurrentSession) -> SessionTracker {
        SessionTracker::from_config(&self.config, &self.paths, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn flags_override_config_file() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let paths = StoragePaths::with_root(temp_dir.path().to_path_buf());
        fs_err::write(paths.config_file(), "keep_count = 4\n").expect("write config");

        let overrides = Overrides {
            database: Some(temp_dir.path().join("elsewhere.json")),
            keep_count: Some(7),
            ..Overrides::default()
        };
        let ctx = Context::load_with_paths(paths, &overrides, no_env).expect("load context");

        assert_eq!(ctx.config.keep_count, 7);
        assert_eq!(
            ctx.config.database_path(&ctx.paths),
            temp_dir.path().join("elsewhere.json")
        );
    }

    #[test]
    fn zero_keep_flag_is_rejected() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let paths = StoragePaths::with_root(temp_dir.path().to_path_buf());
        let overrides = Overrides {
            keep_count: Some(0),
            ..Overrides::default()
        };

        assert!(Context::load_with_paths(paths, &overrides, no_env).is_err());
    }

    #[test]
    fn explicit_config_path_is_used() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let paths = StoragePaths::with_root(temp_dir.path().join("root"));
        let config_path = temp_dir.path().join("custom.toml");
        fs_err::write(&config_path, "[display]\nbooted_first = false\n").expect("write config");

        let overrides = Overrides {
            config: Some(config_path),
            ..Overrides::default()
        };
        let ctx = Context::load_with_paths(paths, &overrides, no_env).expect("load context");
        assert!(!ctx.config.display.booted_first);
    }

    #[test]
    fn keep_flag_overrides_zero_from_env() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let paths = StoragePaths::with_root(temp_dir.path().to_path_buf());
        let overrides = Overrides {
            keep_count: Some(5),
            ..Overrides::default()
        };
        let env = |name: &str| (name == "UPTIMES_KEEP_COUNT").then(|| "0".to_string());

        let ctx = Context::load_with_paths(paths, &overrides, env).expect("load context");
        assert_eq!(ctx.config.keep_count, 5);
    }

    #[test]
    fn zero_keep_from_env_alone_is_rejected() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let paths = StoragePaths::with_root(temp_dir.path().to_path_buf());
        let env = |name: &str| (name == "UPTIMES_KEEP_COUNT").then(|| "0".to_string());

        assert!(Context::load_with_paths(paths, &Overrides::default(), env).is_err());
    }
}
