use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use brochure_contact::{
    ContactConfig, Delivery, DispatchError, Dispatcher, IpLookup, LookupError, Payload,
    SubmissionController,
};

pub const TOKEN: &str = "test-token";
pub const CLIENT_IP: &str = "203.0.113.7";

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum IpBehaviour {
    Answer,
    Hang(Duration),
    Fail,
}

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum DispatchBehaviour {
    Deliver,
    Hang(Duration),
    NetworkError,
    Reject(u16),
}

#[derive(Clone, Default)]
pub struct Probe {
    ip_calls: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<Payload>>>,
}

#[allow(dead_code)]
impl Probe {
    pub fn ip_calls(&self) -> usize {
        self.ip_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Payload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.ip_calls() + self.sent().len()
    }
}

struct FakeIpLookup {
    probe: Probe,
    behaviour: IpBehaviour,
}

#[async_trait]
impl IpLookup for FakeIpLookup {
    async fn lookup(&self) -> Result<String, LookupError> {
        self.probe.ip_calls.fetch_add(1, Ordering::SeqCst);

        match self.behaviour {
            IpBehaviour::Answer => Ok(CLIENT_IP.to_owned()),
            IpBehaviour::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(CLIENT_IP.to_owned())
            }
            IpBehaviour::Fail => Err(LookupError::MissingIp),
        }
    }
}

struct FakeDispatcher {
    probe: Probe,
    behaviour: DispatchBehaviour,
}

#[async_trait]
impl Dispatcher for FakeDispatcher {
    async fn dispatch(&self, payload: &Payload) -> Result<Delivery, DispatchError> {
        self.probe.sent.lock().unwrap().push(payload.clone());

        match self.behaviour {
            DispatchBehaviour::Deliver => Ok(Delivery::Issued),
            DispatchBehaviour::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Delivery::Issued)
            }
            DispatchBehaviour::NetworkError => {
                Err(DispatchError::Network("failed to fetch".to_owned()))
            }
            DispatchBehaviour::Reject(status) => Err(DispatchError::Status(status)),
        }
    }
}

pub fn config() -> ContactConfig {
    ContactConfig {
        endpoint: Some("https://forms.example.com/submit".to_owned()),
        token: Some(TOKEN.to_owned()),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn setup(ip: IpBehaviour, dispatch: DispatchBehaviour) -> (SubmissionController, Probe) {
    setup_with(config(), ip, dispatch)
}

pub fn setup_with(
    config: ContactConfig,
    ip: IpBehaviour,
    dispatch: DispatchBehaviour,
) -> (SubmissionController, Probe) {
    let probe = Probe::default();
    let controller = SubmissionController::new(
        &config,
        Box::new(FakeIpLookup {
            probe: probe.clone(),
            behaviour: ip,
        }),
        Box::new(FakeDispatcher {
            probe: probe.clone(),
            behaviour: dispatch,
        }),
    )
    .expect("test config carries endpoint and token");

    (controller, probe)
}
