use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub icon: IconConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for request bodies (inline icons travel in the body)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Largest canvas side the compositor will allocate
    #[serde(default = "default_max_pixel_size")]
    pub max_pixel_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    /// Client identifier sent with remote icon fetches
    #[serde(default = "default_icon_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_icon_fetch_timeout")]
    pub fetch_timeout: String,
    #[serde(default = "default_max_icon_bytes")]
    pub max_icon_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Interval of the background purge of expired entries; "off" disables it
    #[serde(default = "default_cache_sweep_interval")]
    pub sweep_interval: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// Image defaults
fn default_max_pixel_size() -> u32 {
    DEFAULT_MAX_PIXEL_SIZE
}

// Icon defaults
fn default_icon_user_agent() -> String {
    DEFAULT_ICON_USER_AGENT.to_string()
}

fn default_icon_fetch_timeout() -> String {
    DEFAULT_ICON_FETCH_TIMEOUT.to_string()
}

fn default_max_icon_bytes() -> usize {
    DEFAULT_MAX_ICON_BYTES
}

// Cache defaults
fn default_cache_sweep_interval() -> String {
    DEFAULT_CACHE_SWEEP_INTERVAL.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_pixel_size: default_max_pixel_size(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            user_agent: default_icon_user_agent(),
            fetch_timeout: default_icon_fetch_timeout(),
            max_icon_bytes: default_max_icon_bytes(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: default_cache_sweep_interval(),
        }
    }
}

impl IconConfig {
    pub fn fetch_timeout_duration(&self) -> Result<Duration> {
        humantime::parse_duration(&self.fetch_timeout)
            .with_context(|| format!("Invalid icon.fetch_timeout '{}'", self.fetch_timeout))
    }
}

impl CacheConfig {
    pub fn sweep_interval_duration(&self) -> Result<Option<Duration>> {
        let raw = self.sweep_interval.trim();
        if raw.eq_ignore_ascii_case("off") {
            return Ok(None);
        }
        let interval = humantime::parse_duration(raw)
            .with_context(|| format!("Invalid cache.sweep_interval '{raw}'"))?;
        Ok((!interval.is_zero()).then_some(interval))
    }
}

impl Config {
    /// Config file to read: the `--config` flag, else `CONFIG_FILE`, else
    /// `config.toml`.
    pub fn resolve_path(flag: Option<String>) -> String {
        Self::pick_path(flag, std::env::var(CONFIG_FILE_ENV).ok())
    }

    fn pick_path(flag: Option<String>, from_env: Option<String>) -> String {
        flag.into_iter()
            .chain(from_env)
            .find(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject values that would only fail later, at first request.
    fn validate(config: &Config) -> Result<()> {
        config.icon.fetch_timeout_duration()?;
        config.cache.sweep_interval_duration()?;
        if config.image.max_pixel_size == 0 {
            anyhow::bail!("image.max_pixel_size must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.icon.user_agent, "QR Generator Bot");
        assert_eq!(
            config.icon.fetch_timeout_duration().unwrap(),
            Duration::from_secs(10)
        );
        assert_eq!(
            config.cache.sweep_interval_duration().unwrap(),
            Some(Duration::from_secs(300))
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 9000

            [icon]
            user_agent = "custom-agent"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.icon.user_agent, "custom-agent");
        assert_eq!(config.icon.max_icon_bytes, DEFAULT_MAX_ICON_BYTES);
        assert_eq!(config.image.max_pixel_size, DEFAULT_MAX_PIXEL_SIZE);
    }

    #[test]
    fn test_invalid_durations_are_rejected() {
        let mut config = Config::default();
        config.icon.fetch_timeout = "soon".to_string();
        assert!(Config::validate(&config).is_err());

        let mut config = Config::default();
        config.cache.sweep_interval = "every now and then".to_string();
        assert!(Config::validate(&config).is_err());

        for disabled in ["off", "OFF", "0s"] {
            let mut config = Config::default();
            config.cache.sweep_interval = disabled.to_string();
            assert!(Config::validate(&config).is_ok());
            assert_eq!(config.cache.sweep_interval_duration().unwrap(), None);
        }
    }

    #[test]
    fn test_config_path_precedence() {
        let flag = Some("/etc/qr/flag.toml".to_string());
        let env = Some("/etc/qr/env.toml".to_string());

        assert_eq!(Config::pick_path(flag, env.clone()), "/etc/qr/flag.toml");
        assert_eq!(Config::pick_path(None, env), "/etc/qr/env.toml");
        assert_eq!(Config::pick_path(None, Some(String::new())), DEFAULT_CONFIG_FILE);
        assert_eq!(Config::pick_path(None, None), "config.toml");
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.web.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }
}
