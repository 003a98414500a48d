use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Catalog URL template; `{identifier}` is replaced per product.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Cap on concurrent image downloads per product. Unset means unbounded.
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            output_dir: default_output_dir(),
            concurrency: None,
            user_agent: None,
        }
    }
}

fn default_catalog_url() -> String {
    product_images_http::DEFAULT_CATALOG_URL.into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(product_images::DEFAULT_OUTPUT_DIR)
}

/// Config file path: `~/.config/product-images/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("product-images").join("config.toml"))
}

/// Load config from the default location, falling back to defaults if it is
/// missing or unreadable.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config, using defaults"
            ),
        }
    }

    AppConfig::default()
}

/// Load config from an explicitly requested file. Unlike [`load_config`],
/// any failure is an error.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_mediabank() {
        let config = AppConfig::default();
        assert_eq!(
            config.catalog_url,
            "https://reima.mediabank.fi/fi/extension/onesite/xml/{identifier}"
        );
        assert_eq!(config.output_dir, PathBuf::from("product-images"));
        assert_eq!(config.concurrency, None);
        assert_eq!(config.user_agent, None);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parse_full_config_from_toml() {
        let toml_str = r#"
catalog_url = "http://catalog.local/xml/{identifier}"
output_dir = "/srv/images"
concurrency = 8
user_agent = "importer/1.0"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog_url, "http://catalog.local/xml/{identifier}");
        assert_eq!(config.output_dir, PathBuf::from("/srv/images"));
        assert_eq!(config.concurrency, Some(8));
        assert_eq!(config.user_agent.as_deref(), Some("importer/1.0"));
    }

    #[test]
    fn load_config_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "concurrency = 2\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.concurrency, Some(2));
        assert_eq!(config.output_dir, PathBuf::from("product-images"));
    }

    #[test]
    fn load_config_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "concurrency = \"lots\"\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn load_config_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }
}
