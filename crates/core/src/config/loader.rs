//! Config path resolution

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Environment variable naming the base directory
pub const HOME_VAR: &str = "STAGEHOOK_HOME";

/// Returns the base directory: `$STAGEHOOK_HOME`, else the current directory.
pub fn base_dir() -> ConfigResult<PathBuf> {
    match std::env::var_os(HOME_VAR) {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => std::env::current_dir().map_err(|_| ConfigError::NoConfigDirectory),
    }
}

/// Returns the base configs directory.
///
/// Path: `<base>/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(base_dir()?.join("configs"))
}

/// Returns the path for an extension's config file.
///
/// Path: `<base>/configs/extensions/{name}/{name}.toml`
pub fn extension_config_path(name: &str) -> ConfigResult<PathBuf> {
    Ok(extension_path_in(&configs_dir()?, name))
}

/// Returns the core config path.
///
/// Path: `<base>/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}

fn extension_path_in(configs: &Path, name: &str) -> PathBuf {
    configs
        .join("extensions")
        .join(name)
        .join(format!("{}.toml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_config_path_format() {
        let path = extension_path_in(Path::new("/srv/stagehook/configs"), "particles");
        assert!(path.ends_with("extensions/particles/particles.toml"));
    }

    #[test]
    fn test_core_config_under_configs_dir() {
        let core = core_config_path().unwrap();
        assert!(core.ends_with("configs/core.toml"));
        assert_eq!(core.parent().unwrap(), configs_dir().unwrap());
    }
}
