use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;

const CONFIG_FILE: &str = "frontkit.toml";
const ENV_PREFIX: &str = "FRONTKIT_";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request unless the caller overrides them.
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            default_headers: default_headers(),
        }
    }
}

fn default_user_agent() -> String {
    format!("frontkit/{}", env!("CARGO_PKG_VERSION"))
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Accept".to_string(), "application/json".to_string())])
}

/// Load configuration from frontkit.toml and environment variables
pub fn load() -> Result<Config, figment::Error> {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        // Use double-underscore nesting for snake_case keys
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
}

/// Validate configuration and return a user-friendly error
pub fn validate(config: &Config) -> Result<(), String> {
    let http = &config.http;

    if http.user_agent.trim().is_empty() {
        return Err("http.user_agent must not be empty".into());
    }

    if HeaderValue::from_str(&http.user_agent).is_err() {
        return Err(format!(
            "http.user_agent is not a valid header value: {}",
            http.user_agent
        ));
    }

    for (name, value) in &http.default_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(format!("http.default_headers: invalid header name '{name}'"));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(format!(
                "http.default_headers: invalid value for header '{name}'"
            ));
        }
    }

    Ok(())
}
