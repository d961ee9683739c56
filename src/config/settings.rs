use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::env;

use super::auth::AuthSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Mount prefix the app is served under; empty when at the root.
    #[serde(default)]
    pub script_name: String,
    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_app_port() -> u16 {
    8080
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            app_port: default_app_port(),
            script_name: String::new(),
            auth: AuthSettings::default(),
        }
    }
}

pub fn load() -> Result<Settings, ConfigError> {
    let env = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let env_file = match env.as_str() {
        "production" => ".env.production",
        _ => ".env.development",
    };

    dotenv::from_filename(env_file).ok();

    let config = Config::builder()
        .add_source(Environment::default().separator("__").try_parsing(true))
        .build()?;

    config
        .try_deserialize::<Settings>()
        .map_err(|e| ConfigError::Message(format!("Failed to deserialize settings: {}", e)))
}
