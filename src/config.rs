use brochure_contact::{ContactConfig, DEFAULT_IP_LOOKUP_URL};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use url::Url;

use crate::language::Locale;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON lines instead of the pretty console format
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (FORM_ENDPOINT_URL, FORM_TOKEN)
    /// 2. Environment variables (BROCHURE__CONTACT__ENDPOINT, etc.)
    /// 3. Config file (config/default.toml or the given path)
    /// 4. Defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("contact.ip_lookup_url", DEFAULT_IP_LOOKUP_URL)?
            .set_default("observability.log_level", "info")?
            .set_default("site.locale", "en")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("BROCHURE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(endpoint) = env::var("FORM_ENDPOINT_URL") {
            builder = builder.set_override("contact.endpoint", endpoint)?;
        }
        if let Ok(token) = env::var("FORM_TOKEN") {
            builder = builder.set_override("contact.token", token)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Reject values that would make the contact form misbehave.
    ///
    /// A missing endpoint or token is not checked here; the submission
    /// controller refuses to start without them.
    pub fn validate(&self) -> Result<(), String> {
        let contact = &self.contact;

        for (name, value) in [
            ("contact.cooldown_ms", contact.cooldown_ms),
            ("contact.ip_lookup_timeout_ms", contact.ip_lookup_timeout_ms),
            ("contact.dispatch_timeout_ms", contact.dispatch_timeout_ms),
        ] {
            if value == 0 {
                return Err(format!("{name} must be greater than zero"));
            }
        }

        if let Some(endpoint) = contact.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            Url::parse(endpoint.trim())
                .map_err(|e| format!("contact.endpoint is not a valid url: {e}"))?;
        }

        Url::parse(&contact.ip_lookup_url)
            .map_err(|e| format!("contact.ip_lookup_url is not a valid url: {e}"))?;

        if self.observability.log_level.trim().is_empty() {
            return Err("observability.log_level must not be empty".to_string());
        }

        Ok(())
    }
}
