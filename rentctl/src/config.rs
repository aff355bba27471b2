//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. Sources are merged in order (later overrides earlier):
//!
//! 1. YAML config file (default `config.yaml`, `-f` flag or `RENTCTL_CONFIG`)
//! 2. Environment variables prefixed with `RENTCTL_` (nested fields use
//!    double underscores, e.g. `RENTCTL_CORS__ALLOW_CREDENTIALS=true`)
//! 3. `DATABASE_URL` - special case: overrides `database_url` if set

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Simple CLI args - just for specifying the config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "RENTCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    /// CORS settings for the browser-facing availability endpoints
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3100,
            database_url: "postgresql://localhost/rentctl".to_string(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://www.example-rentals.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<CorsOrigin>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: None,
        }
    }
}

impl Config {
    /// Load configuration from the YAML file and environment overrides.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("RENTCTL_").split("__"))
            .extract()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3100");
        assert!(matches!(config.cors.allowed_origins[0], CorsOrigin::Wildcard));
    }

    #[test]
    fn test_yaml_and_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
port: 4000
cors:
  allowed_origins:
    - "https://www.example-rentals.com"
  allow_credentials: true
"#,
            )?;
            jail.set_env("RENTCTL_HOST", "127.0.0.1");
            jail.set_env("DATABASE_URL", "postgresql://db.internal/rentals");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");

            assert_eq!(config.port, 4000);
            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.database_url, "postgresql://db.internal/rentals");
            assert!(config.cors.allow_credentials);
            match &config.cors.allowed_origins[0] {
                CorsOrigin::Url(url) => assert_eq!(url.as_str(), "https://www.example-rentals.com/"),
                CorsOrigin::Wildcard => panic!("expected concrete origin"),
            }
            Ok(())
        });
    }
}
