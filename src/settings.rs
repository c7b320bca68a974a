use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Humantime duration, e.g. `30s` or `1m 30s`.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Image-Manager".to_string()
}
fn default_api_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_request_timeout() -> String {
    "30s".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").prefix_separator("_").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    /// Reports every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match Url::parse(&self.api_base_url) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push("API_BASE_URL must use http or https".to_string());
            }
            Ok(url) if self.is_production() && url.scheme() != "https" => {
                errors.push("API_BASE_URL must use https in production".to_string());
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("API_BASE_URL is invalid: {}", e)),
        }

        match humantime::parse_duration(&self.request_timeout) {
            Ok(timeout) if timeout.is_zero() => {
                errors.push("REQUEST_TIMEOUT must be greater than zero".to_string());
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("REQUEST_TIMEOUT is invalid: {}", e)),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::Message(format!("API_BASE_URL is invalid: {}", e)))
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.request_timeout)
            .map_err(|e| ConfigError::Message(format!("REQUEST_TIMEOUT is invalid: {}", e)))
    }
}
