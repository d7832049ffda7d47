use std::path::Path;

use serde::Deserialize;

use crate::domain::AppError;

/// Config file read from the working directory.
pub const CONFIG_FILE: &str = "mailforge.toml";

/// Asset base URL used when not building for production.
pub const DEFAULT_ASSET_BASE: &str = "./assets";

/// Environment variable that switches production mode on.
pub const ENV_MODE_VAR: &str = "MAILFORGE_ENV";

/// Raw `mailforge.toml` contents.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base URL prepended to asset references in production builds.
    /// Must not be empty and must not end with a slash.
    #[serde(default)]
    pub asset_base_url: String,
}

impl FileConfig {
    /// Load `mailforge.toml` from `dir` if present.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|err| {
            AppError::config_error(format!("Malformed {CONFIG_FILE}: {err}"))
        })
    }
}

/// Immutable build configuration, resolved once at process start and
/// threaded into every component.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// The sole variable visible to templates during rendering.
    pub asset_base_url: String,
    pub production: bool,
}

impl BuildConfig {
    /// Resolve the asset base URL for the given mode.
    ///
    /// Production requires a non-empty configured value and strips exactly
    /// one trailing slash; any other mode uses the relative fallback so
    /// local output references the copied `assets/` subtree.
    pub fn resolve(production: bool, file: &FileConfig) -> Result<Self, AppError> {
        let asset_base_url = if production {
            if file.asset_base_url.is_empty() {
                return Err(AppError::config_error(format!(
                    "asset_base_url must be set in {CONFIG_FILE} for production builds"
                )));
            }
            file.asset_base_url
                .strip_suffix('/')
                .unwrap_or(&file.asset_base_url)
                .to_string()
        } else {
            DEFAULT_ASSET_BASE.to_string()
        };
        Ok(Self { asset_base_url, production })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(url: &str) -> FileConfig {
        FileConfig { asset_base_url: url.to_string() }
    }

    #[test]
    fn production_strips_exactly_one_trailing_slash() {
        let config = BuildConfig::resolve(true, &file_config("https://cdn.example.com/"))
            .expect("resolution should succeed");
        assert_eq!(config.asset_base_url, "https://cdn.example.com");

        let config = BuildConfig::resolve(true, &file_config("https://cdn.example.com//"))
            .expect("resolution should succeed");
        assert_eq!(config.asset_base_url, "https://cdn.example.com/");
    }

    #[test]
    fn production_keeps_value_without_trailing_slash() {
        let config = BuildConfig::resolve(true, &file_config("https://cdn.example.com"))
            .expect("resolution should succeed");
        assert_eq!(config.asset_base_url, "https://cdn.example.com");
    }

    #[test]
    fn production_with_empty_value_is_fatal() {
        let err = BuildConfig::resolve(true, &FileConfig::default())
            .expect_err("empty asset_base_url should fail");
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn default_mode_ignores_configured_value() {
        let config = BuildConfig::resolve(false, &file_config("https://cdn.example.com/"))
            .expect("resolution should succeed");
        assert_eq!(config.asset_base_url, DEFAULT_ASSET_BASE);
    }

    #[test]
    fn config_file_parse_error_is_a_configuration_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE), "asset_base_url = [1, 2]").unwrap();
        let err = FileConfig::load(dir.path()).expect_err("malformed toml should fail");
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn missing_config_file_defaults_to_empty() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = FileConfig::load(dir.path()).expect("missing file should default");
        assert!(file.asset_base_url.is_empty());
    }
}
