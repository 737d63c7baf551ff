use std::time::Duration;

use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::SubmitError;

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// How the submission request is sent to the form endpoint.
#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportMode {
    /// Fire the request and never look at the response.
    #[default]
    Opaque,
    /// Read the response status and report non-2xx answers.
    Readable,
}

/// What a network-layer failure on dispatch turns into.
///
/// An opaque request to a cross-origin endpoint fails with the same signature
/// as a genuine connection problem, so the default assumes the message went
/// through. `Report` surfaces the failure instead.
#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NetworkFailurePolicy {
    #[default]
    AssumeDelivered,
    Report,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    /// Form-processing endpoint receiving the POST
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Shared anti-spam token checked by the endpoint
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_ip_lookup_timeout_ms")]
    pub ip_lookup_timeout_ms: u64,
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
    #[serde(default)]
    pub transport: TransportMode,
    #[serde(default)]
    pub network_failure: NetworkFailurePolicy,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            ip_lookup_url: default_ip_lookup_url(),
            cooldown_ms: default_cooldown_ms(),
            ip_lookup_timeout_ms: default_ip_lookup_timeout_ms(),
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            success_display_ms: default_success_display_ms(),
            transport: TransportMode::default(),
            network_failure: NetworkFailurePolicy::default(),
        }
    }
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

fn default_cooldown_ms() -> u64 {
    60_000
}

fn default_ip_lookup_timeout_ms() -> u64 {
    3_000
}

fn default_dispatch_timeout_ms() -> u64 {
    10_000
}

fn default_success_display_ms() -> u64 {
    5_000
}

impl ContactConfig {
    /// Endpoint URL and token, both required before anything goes on the wire.
    pub fn credentials(&self) -> Result<(&str, &str), SubmitError> {
        let endpoint = non_blank(self.endpoint.as_deref()).ok_or_else(|| {
            SubmitError::Configuration(
                "contact form endpoint is not configured, set contact.endpoint or FORM_ENDPOINT_URL"
                    .to_owned(),
            )
        })?;

        let token = non_blank(self.token.as_deref()).ok_or_else(|| {
            SubmitError::Configuration(
                "contact form token is not configured, set contact.token or FORM_TOKEN".to_owned(),
            )
        })?;

        Ok((endpoint, token))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.ip_lookup_timeout_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
