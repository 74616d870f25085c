use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SPINMIX__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SPINMIX")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.matching.tolerance_percent == 0 || self.matching.tolerance_percent > 100 {
            return Err("matching.tolerance_percent must be in 1..=100".to_string());
        }
        if self.matching.min_clip_seconds == 0 {
            return Err("matching.min_clip_seconds must be >= 1".to_string());
        }
        if self.matching.near_miss_penalty > self.matching.far_miss_penalty {
            return Err(
                "matching.near_miss_penalty must not exceed matching.far_miss_penalty".to_string(),
            );
        }
        if self.fade.fade_interval_ms == 0 {
            return Err("fade.fade_interval_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SPINMIX_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SPINMIX_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/spinmix/config.toml`
/// or `~/.config/spinmix/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("spinmix").join("config.toml"))
}
