use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tracing::{error, info, warn};
use url::Url;
use validator::Validate;

use crate::{
    ContactConfig, DispatchError, Dispatcher, Field, FormFields, IpLookup, IpifyLookup,
    NetworkFailurePolicy, Payload, SubmitError, UNKNOWN_CLIENT_IP, dispatcher_for,
};

/// User-visible state of the contact form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionOutcome {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(SubmitError),
}

/// Owns one visitor session of the contact form.
///
/// `submit` takes `&mut self`, so a second submission cannot start while one
/// is in flight. Status changes are published on a watch channel for the UI.
pub struct SubmissionController {
    token: String,
    cooldown: Duration,
    ip_lookup_timeout: Duration,
    dispatch_timeout: Duration,
    success_display: Duration,
    network_failure: NetworkFailurePolicy,
    ip_lookup: Box<dyn IpLookup>,
    dispatcher: Box<dyn Dispatcher>,
    fields: FormFields,
    last_success: Option<Instant>,
    status: Arc<watch::Sender<SubmissionOutcome>>,
    revert: Option<JoinHandle<()>>,
}

impl SubmissionController {
    /// Builds a controller talking HTTP to the configured endpoint and IP service.
    pub fn from_config(config: &ContactConfig) -> Result<Self, SubmitError> {
        let (endpoint, _) = config.credentials()?;
        let endpoint = Url::parse(endpoint).map_err(|e| {
            SubmitError::Configuration(format!("contact form endpoint is not a valid url: {e}"))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("brochure/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SubmitError::Configuration(e.to_string()))?;

        let ip_lookup = IpifyLookup::new(client.clone(), config.ip_lookup_url.to_owned());
        let dispatcher = dispatcher_for(config.transport, client, endpoint);

        Self::new(config, Box::new(ip_lookup), dispatcher)
    }

    pub fn new(
        config: &ContactConfig,
        ip_lookup: Box<dyn IpLookup>,
        dispatcher: Box<dyn Dispatcher>,
    ) -> Result<Self, SubmitError> {
        let (_, token) = config.credentials()?;
        let (status, _) = watch::channel(SubmissionOutcome::Idle);

        Ok(Self {
            token: token.to_owned(),
            cooldown: config.cooldown(),
            ip_lookup_timeout: config.ip_lookup_timeout(),
            dispatch_timeout: config.dispatch_timeout(),
            success_display: config.success_display(),
            network_failure: config.network_failure,
            ip_lookup,
            dispatcher,
            fields: FormFields::default(),
            last_success: None,
            status: Arc::new(status),
            revert: None,
        })
    }

    pub fn status(&self) -> SubmissionOutcome {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionOutcome> {
        self.status.subscribe()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    /// Records an edit; a pending error message goes away with it.
    pub fn update(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
        self.status.send_if_modified(|status| {
            if !matches!(status, SubmissionOutcome::Failed(_)) {
                return false;
            }

            *status = SubmissionOutcome::Idle;
            true
        });
    }

    /// Time left before another submission is accepted.
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_success?);

        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    pub async fn submit(&mut self, fields: FormFields) -> SubmissionOutcome {
        self.fields = fields;
        if let Some(revert) = self.revert.take() {
            revert.abort();
        }

        let now = Instant::now();
        if let Some(remaining) = self.cooldown_remaining(now) {
            return self.finish(Err(SubmitError::RateLimited {
                remaining_secs: whole_seconds_up(remaining),
            }));
        }

        if let Err(errors) = self.fields.validate() {
            return self.finish(Err(errors.into()));
        }

        let in_flight = InFlight::begin(&self.status);
        let result = self.deliver(now).await;
        in_flight.settle();

        self.finish(result)
    }

    async fn deliver(&mut self, now: Instant) -> Result<(), SubmitError> {
        let client_ip = self.resolve_client_ip().await;
        let payload = Payload::new(
            &self.fields,
            &self.token,
            client_ip,
            OffsetDateTime::now_utc(),
        )?;

        match tokio::time::timeout(self.dispatch_timeout, self.dispatcher.dispatch(&payload)).await
        {
            Err(_) => return Err(SubmitError::Timeout),
            Ok(Ok(delivery)) => {
                info!(?delivery, client_ip = %payload.client_ip, "Contact form dispatched");
            }
            Ok(Err(DispatchError::Network(reason))) => match self.network_failure {
                NetworkFailurePolicy::AssumeDelivered => {
                    warn!(
                        %reason,
                        "Network error while dispatching contact form, assuming it was delivered"
                    );
                }
                NetworkFailurePolicy::Report => return Err(SubmitError::Network(reason)),
            },
            Ok(Err(err)) => return Err(SubmitError::unknown(err.to_string())),
        }

        self.last_success = Some(now);
        self.fields = FormFields::default();

        Ok(())
    }

    async fn resolve_client_ip(&self) -> String {
        match tokio::time::timeout(self.ip_lookup_timeout, self.ip_lookup.lookup()).await {
            Ok(Ok(ip)) => ip,
            Ok(Err(e)) => {
                warn!(error = %e, "Could not resolve client ip");
                UNKNOWN_CLIENT_IP.to_owned()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.ip_lookup_timeout.as_millis() as u64,
                    "Client ip lookup timed out"
                );
                UNKNOWN_CLIENT_IP.to_owned()
            }
        }
    }

    fn finish(&mut self, result: Result<(), SubmitError>) -> SubmissionOutcome {
        let outcome = match result {
            Ok(()) => {
                self.schedule_revert();
                SubmissionOutcome::Succeeded
            }
            Err(e) => {
                error!(error = %e, "Error submitting contact form");
                SubmissionOutcome::Failed(e)
            }
        };

        self.status.send_replace(outcome.clone());

        outcome
    }

    fn schedule_revert(&mut self) {
        let status = Arc::clone(&self.status);
        let delay = self.success_display;

        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_if_modified(|status| {
                if *status != SubmissionOutcome::Succeeded {
                    return false;
                }

                *status = SubmissionOutcome::Idle;
                true
            });
        }));
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(revert) = self.revert.take() {
            revert.abort();
        }
    }
}

/// Marks the form as submitting; falls back to idle if the submission future
/// is dropped before it settles.
struct InFlight {
    status: Arc<watch::Sender<SubmissionOutcome>>,
    armed: bool,
}

impl InFlight {
    fn begin(status: &Arc<watch::Sender<SubmissionOutcome>>) -> Self {
        status.send_replace(SubmissionOutcome::Submitting);

        Self {
            status: Arc::clone(status),
            armed: true,
        }
    }

    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        self.status.send_if_modified(|status| {
            if *status != SubmissionOutcome::Submitting {
                return false;
            }

            *status = SubmissionOutcome::Idle;
            true
        });
    }
}

fn whole_seconds_up(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
