pub mod config;
pub mod show;
pub mod update;

use std::path::PathBuf;

use solvestreak_core::storage::executable_dir;
use solvestreak_core::{Config, ConfigError, StoragePaths};

use crate::GlobalArgs;

/// Everything a command needs, resolved once at startup.
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
    /// Whether `--config` named the file.
    pub config_explicit: bool,
    /// Set when the config file was missing or invalid and defaults are in use.
    pub config_error: Option<ConfigError>,
    pub paths: StoragePaths,
}

impl AppContext {
    pub fn resolve(args: &GlobalArgs) -> Self {
        let exe_dir = executable_dir();
        let config_path = args
            .config
            .clone()
            .unwrap_or_else(|| Config::default_path_in(&exe_dir));

        let (mut config, config_error) = match Config::load_from(&config_path) {
            Ok(cfg) => (cfg, None),
            Err(err) => (Config::default(), Some(err)),
        };

        if let Some(dir) = &args.dir {
            let dir = if dir.is_absolute() {
                dir.clone()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(dir))
                    .unwrap_or_else(|_| dir.clone())
            };
            config.base_dir = Some(dir);
        }

        let paths = config.paths_relative_to(&exe_dir);
        Self {
            config,
            config_path,
            config_explicit: args.config.is_some(),
            config_error,
            paths,
        }
    }

    /// The loaded config, or the load error when `--config` named a file
    /// that could not be used.
    pub fn explicit_config(&self) -> Result<&Config, String> {
        match &self.config_error {
            Some(err) if self.config_explicit => Err(err.to_string()),
            _ => Ok(&self.config),
        }
    }

    /// Log a config problem once logging is up.
    pub fn report_config_problem(&self) {
        if let Some(err) = &self.config_error {
            tracing::warn!(
                error = %err,
                "using placeholder configuration; copy config.example.toml to config.toml and set your usernames"
            );
        }
    }
}
