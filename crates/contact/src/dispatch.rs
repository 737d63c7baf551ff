use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::{DispatchError, Payload, TransportMode};

/// What the caller knows once a dispatch returned without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The request went out; the response was not inspected.
    Issued,
    /// The endpoint answered with a success status.
    Acknowledged,
}

/// Sends a submission to the form endpoint.
///
/// Throttling and timeouts are applied by the caller, so implementations only
/// decide how much of the response they look at.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, payload: &Payload) -> Result<Delivery, DispatchError>;
}

/// Issues the POST and drops the response unread.
#[derive(Clone)]
pub struct OpaqueDispatcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl OpaqueDispatcher {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Dispatcher for OpaqueDispatcher {
    async fn dispatch(&self, payload: &Payload) -> Result<Delivery, DispatchError> {
        self.client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        Ok(Delivery::Issued)
    }
}

/// Issues the POST and requires a 2xx answer.
#[derive(Clone)]
pub struct ReadableDispatcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReadableDispatcher {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Dispatcher for ReadableDispatcher {
    async fn dispatch(&self, payload: &Payload) -> Result<Delivery, DispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "form endpoint rejected submission");
            return Err(DispatchError::Status(status.as_u16()));
        }

        Ok(Delivery::Acknowledged)
    }
}

pub fn dispatcher_for(
    mode: TransportMode,
    client: reqwest::Client,
    endpoint: Url,
) -> Box<dyn Dispatcher> {
    match mode {
        TransportMode::Opaque => Box::new(OpaqueDispatcher::new(client, endpoint)),
        TransportMode::Readable => Box::new(ReadableDispatcher::new(client, endpoint)),
    }
}
