//! Configuration for stagehook
//!
//! Settings are TOML files under `<base>/configs/`, where `<base>` is
//! `$STAGEHOOK_HOME` or the current directory. Missing files are created
//! with defaults on first load.
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use stagehook_core::ExtensionConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct ParticlesConfig {
//!     pub max_emitters: u32,
//! }
//!
//! impl ExtensionConfig for ParticlesConfig {
//!     const EXTENSION_NAME: &'static str = "particles";
//! }
//!
//! let config = ParticlesConfig::load().unwrap_or_default();
//! ```

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{base_dir, configs_dir, core_config_path, extension_config_path, HOME_VAR};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Neither `$STAGEHOOK_HOME` nor the current directory is usable
    #[error("Config directory not available")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read `path`, or write and return the default when it does not exist
fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    } else {
        let default = T::default();
        write(path, &default)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

fn write<T: Serialize>(path: &Path, config: &T) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}

fn read<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    tracing::debug!("Reloaded config from {:?}", path);
    Ok(config)
}

/// Trait for extension configuration types.
///
/// An extension is a module built on top of the core that wants its own
/// settings file. Implement this on a serde struct to get loading, saving
/// and reloading.
///
/// # File Location
///
/// `configs/extensions/{EXTENSION_NAME}/{EXTENSION_NAME}.toml`
pub trait ExtensionConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Name used for config file path resolution
    const EXTENSION_NAME: &'static str;

    /// Load config from file, creating default if missing.
    fn load() -> ConfigResult<Self> {
        load_or_create(&extension_config_path(Self::EXTENSION_NAME)?)
    }

    /// Save config to file, creating parent directories as needed.
    fn save(&self) -> ConfigResult<()> {
        write(&extension_config_path(Self::EXTENSION_NAME)?, self)
    }

    /// Replace self with the current file contents.
    fn reload(&mut self) -> ConfigResult<()> {
        *self = read(&extension_config_path(Self::EXTENSION_NAME)?)?;
        Ok(())
    }
}

/// Core configuration.
///
/// Loaded from `configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,

    /// Clamp anchor assignments to `0..=1`
    pub clamp_anchors: bool,

    /// Report a point at the origin as the stage bounds of new objects
    pub dummy_stage_bounds: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            log_level: "info".to_string(),
            clamp_anchors: true,
            dummy_stage_bounds: false,
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&core_config_path()?)
    }

    /// Load from an explicit path, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        load_or_create(path)
    }

    /// Save core config to file.
    pub fn save(&self) -> ConfigResult<()> {
        write(&core_config_path()?, self)
    }

    /// Reload core config from file.
    pub fn reload(&mut self) -> ConfigResult<()> {
        *self = read(&core_config_path()?)?;
        Ok(())
    }

    /// Filter directive for the log subscriber
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        pub value: i32,
        pub name: String,
    }

    #[test]
    fn test_config_serialize_deserialize() {
        let config = TestConfig {
            value: 42,
            name: "test".to_string(),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: TestConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.version, 1);
        assert!(!config.debug);
        assert!(config.clamp_anchors);
        assert!(!config.dummy_stage_bounds);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_core_config_partial_file() {
        let config: CoreConfig = toml::from_str("clamp_anchors = false\ndebug = true").unwrap();
        assert!(!config.clamp_anchors);
        assert_eq!(config.version, 1);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_core_config_serialize() {
        let config = CoreConfig {
            version: 2,
            log_level: "stagehook_core=trace".to_string(),
            dummy_stage_bounds: true,
            ..Default::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 2"));
        assert!(toml_str.contains("dummy_stage_bounds = true"));
        assert_eq!(toml::from_str::<CoreConfig>(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_load_from_creates_default() {
        let dir = std::env::temp_dir().join(format!("stagehook-config-{}", std::process::id()));
        let path = dir.join("configs").join("core.toml");
        let _ = std::fs::remove_dir_all(&dir);

        let created = CoreConfig::load_from(&path).unwrap();
        assert_eq!(created, CoreConfig::default());
        assert!(path.exists());

        std::fs::write(&path, "log_level = \"warn\"").unwrap();
        assert_eq!(CoreConfig::load_from(&path).unwrap().log_level, "warn");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
