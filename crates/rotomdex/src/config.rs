//! Catalog settings shared by every command

use anyhow::{Context, Result};
use clap::Args;
use rotomdex_catalog::{CatalogConfig, JoinPolicy};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the API root
pub const API_URL_ENV: &str = "ROTOMDEX_API_URL";

#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// API root [default: $ROTOMDEX_API_URL or https://pokeapi.co/api/v2]
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Resource to list under the API root [default: pokemon]
    #[arg(long, value_name = "NAME")]
    pub resource: Option<String>,

    /// Number of entries to load [default: 151]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Per-request timeout in seconds, 0 disables it [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep the entries that loaded when some requests fail
    #[arg(long)]
    pub partial: bool,

    /// TOML file with catalog settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CatalogArgs {
    /// Defaults, then `--config`, then the environment, then flags
    pub fn resolve(&self) -> Result<CatalogConfig> {
        self.resolve_with_env(std::env::var(API_URL_ENV).ok())
    }

    pub fn resolve_with_env(&self, env_api_url: Option<String>) -> Result<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => CatalogConfig::default(),
        };

        if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(resource) = &self.resource {
            config.resource = resource.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if self.partial {
            config.join_policy = JoinPolicy::Partial;
        }

        config.validate()?;
        log::debug!("Resolved catalog config: {:?}", config);
        Ok(config)
    }
}

pub fn load_config_file(path: &Path) -> Result<CatalogConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_flags() {
        let config = CatalogArgs::default().resolve_with_env(None).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_env_then_flag_precedence() {
        let args = CatalogArgs::default();
        let config = args
            .resolve_with_env(Some("http://env.local/api".into()))
            .unwrap();
        assert_eq!(config.base_url, "http://env.local/api");

        let args = CatalogArgs {
            api_url: Some("http://flag.local/api".into()),
            ..Default::default()
        };
        let config = args
            .resolve_with_env(Some("http://env.local/api".into()))
            .unwrap();
        assert_eq!(config.base_url, "http://flag.local/api");
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "http://file.local/api/v2"
limit = 12
timeout_secs = 3
join_policy = "partial"
sprite_pointers = ["/front_shiny"]
"#
        )
        .unwrap();

        let args = CatalogArgs {
            config: Some(file.path().to_path_buf()),
            limit: Some(5),
            ..Default::default()
        };
        let config = args.resolve_with_env(None).unwrap();

        assert_eq!(config.base_url, "http://file.local/api/v2");
        assert_eq!(config.limit, 5);
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.join_policy, JoinPolicy::Partial);
        assert_eq!(config.sprite_pointers, vec!["/front_shiny"]);
        assert_eq!(config.resource, "pokemon");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let args = CatalogArgs {
            api_url: Some("pokeapi.co".into()),
            ..Default::default()
        };
        assert!(args.resolve_with_env(None).is_err());

        let args = CatalogArgs {
            config: Some(PathBuf::from("/nonexistent/rotomdex.toml")),
            ..Default::default()
        };
        let err = args.resolve_with_env(None).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
