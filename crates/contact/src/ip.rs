use async_trait::async_trait;
use serde::Deserialize;

use crate::LookupError;

/// Resolves the public IP address the visitor is seen from.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup(&self) -> Result<String, LookupError>;
}

/// "What is my IP" service answering `{ "ip": "..." }`.
#[derive(Clone)]
pub struct IpifyLookup {
    client: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct IpAnswer {
    ip: Option<String>,
}

impl IpifyLookup {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IpLookup for IpifyLookup {
    async fn lookup(&self) -> Result<String, LookupError> {
        let answer: IpAnswer = self.client.get(&self.url).send().await?.json().await?;

        answer
            .ip
            .map(|ip| ip.trim().to_owned())
            .filter(|ip| !ip.is_empty())
            .ok_or(LookupError::MissingIp)
    }
}
