use std::sync::{Arc, Mutex};
use std::time::Duration;

use brochure_contact::{
    Field, FormFields, NetworkFailurePolicy, SubmissionOutcome, SubmitError, UNKNOWN_CLIENT_IP,
};
use helpers::{CLIENT_IP, DispatchBehaviour, IpBehaviour, TOKEN};

mod helpers;

fn ana() -> FormFields {
    FormFields::new("Ana", "ana@x.com", "Hi")
}

#[tokio::test(start_paused = true)]
async fn test_first_submission_sends_one_lookup_and_one_post() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(IpBehaviour::Answer, DispatchBehaviour::Deliver);

    let outcome = controller.submit(ana()).await;

    assert_eq!(outcome, SubmissionOutcome::Succeeded);
    assert_eq!(controller.status(), SubmissionOutcome::Succeeded);
    assert_eq!(probe.ip_calls(), 1);

    let sent = probe.sent();
    assert_eq!(sent.len(), 1);
    let payload = &sent[0];
    assert_eq!(payload.name, "Ana");
    assert_eq!(payload.email, "ana@x.com");
    assert_eq!(payload.message, "Hi");
    assert_eq!(payload.token, TOKEN);
    assert_eq!(payload.client_ip, CLIENT_IP);
    assert!(payload.timestamp.ends_with('Z'));

    assert!(controller.fields().is_empty());
    assert!(controller.last_success().is_some());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_second_submission_within_cooldown_is_rejected_locally() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(IpBehaviour::Answer, DispatchBehaviour::Deliver);

    controller.submit(ana()).await;
    let last_success = controller.last_success();
    let calls = probe.network_calls();

    tokio::time::advance(Duration::from_secs(10)).await;
    let outcome = controller.submit(ana()).await;

    let SubmissionOutcome::Failed(err) = &outcome else {
        panic!("expected a rate limited submission, got {outcome:?}");
    };
    assert_eq!(err, &SubmitError::RateLimited { remaining_secs: 50 });
    assert!(err.to_string().contains("50 seconds"));
    assert_eq!(probe.network_calls(), calls);
    assert_eq!(controller.last_success(), last_success);
    assert_eq!(controller.fields(), &ana());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_submission_accepted_again_after_cooldown() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(IpBehaviour::Answer, DispatchBehaviour::Deliver);

    controller.submit(ana()).await;
    tokio::time::advance(Duration::from_millis(59_500)).await;

    assert_eq!(
        controller.submit(ana()).await,
        SubmissionOutcome::Failed(SubmitError::RateLimited { remaining_secs: 1 })
    );

    tokio::time::advance(Duration::from_millis(500)).await;

    assert_eq!(controller.submit(ana()).await, SubmissionOutcome::Succeeded);
    assert_eq!(probe.sent().len(), 2);
    assert_eq!(probe.ip_calls(), 2);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_slow_ip_lookup_falls_back_to_unknown() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(
        IpBehaviour::Hang(Duration::from_secs(4)),
        DispatchBehaviour::Deliver,
    );

    let outcome = controller.submit(ana()).await;

    assert_eq!(outcome, SubmissionOutcome::Succeeded);
    let sent = probe.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].client_ip, UNKNOWN_CLIENT_IP);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_ip_lookup_falls_back_to_unknown() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(IpBehaviour::Fail, DispatchBehaviour::Deliver);

    assert_eq!(controller.submit(ana()).await, SubmissionOutcome::Succeeded);
    assert_eq!(probe.sent()[0].client_ip, UNKNOWN_CLIENT_IP);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_slow_dispatch_times_out() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(
        IpBehaviour::Answer,
        DispatchBehaviour::Hang(Duration::from_secs(11)),
    );

    let outcome = controller.submit(ana()).await;

    assert_eq!(outcome, SubmissionOutcome::Failed(SubmitError::Timeout));
    assert!(outcome_text(&outcome).contains("took too long"));
    assert_eq!(probe.sent().len(), 1);
    assert_eq!(controller.last_success(), None);
    assert_eq!(controller.fields(), &ana());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_network_error_is_assumed_delivered() -> anyhow::Result<()> {
    let (mut controller, _probe) =
        helpers::setup(IpBehaviour::Answer, DispatchBehaviour::NetworkError);

    assert_eq!(controller.submit(ana()).await, SubmissionOutcome::Succeeded);
    assert!(controller.last_success().is_some());
    assert!(controller.fields().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_network_error_reported_when_configured() -> anyhow::Result<()> {
    let mut config = helpers::config();
    config.network_failure = NetworkFailurePolicy::Report;
    let (mut controller, _probe) =
        helpers::setup_with(config, IpBehaviour::Answer, DispatchBehaviour::NetworkError);

    let outcome = controller.submit(ana()).await;

    assert!(matches!(
        outcome,
        SubmissionOutcome::Failed(SubmitError::Network(_))
    ));
    assert_eq!(controller.last_success(), None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_other_dispatch_errors_surface_their_message() -> anyhow::Result<()> {
    let (mut controller, _probe) =
        helpers::setup(IpBehaviour::Answer, DispatchBehaviour::Reject(500));

    let outcome = controller.submit(ana()).await;

    let SubmissionOutcome::Failed(SubmitError::Unknown(message)) = &outcome else {
        panic!("expected an unknown error, got {outcome:?}");
    };
    assert!(message.contains("500"));
    assert_eq!(controller.last_success(), None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_incomplete_form_never_reaches_the_network() -> anyhow::Result<()> {
    let (mut controller, probe) = helpers::setup(IpBehaviour::Answer, DispatchBehaviour::Deliver);

    let outcome = controller
        .submit(FormFields::new("Ana", "ana@x.com", ""))
        .await;

    assert!(matches!(
        outcome,
        SubmissionOutcome::Failed(SubmitError::Invalid(_))
    ));
    assert_eq!(probe.network_calls(), 0);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_status_goes_idle_submitting_succeeded_idle() -> anyhow::Result<()> {
    let (mut controller, _probe) = helpers::setup(
        IpBehaviour::Answer,
        DispatchBehaviour::Hang(Duration::from_secs(1)),
    );

    let mut rx = controller.subscribe();
    let seen = Arc::new(Mutex::new(vec![rx.borrow().clone()]));
    let recorder = tokio::spawn({
        let seen = Arc::clone(&seen);
        async move {
            while rx.changed().await.is_ok() {
                let status = rx.borrow_and_update().clone();
                seen.lock().unwrap().push(status);
            }
        }
    });

    assert_eq!(controller.submit(ana()).await, SubmissionOutcome::Succeeded);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(controller.status(), SubmissionOutcome::Succeeded);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.status(), SubmissionOutcome::Idle);

    recorder.abort();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            SubmissionOutcome::Idle,
            SubmissionOutcome::Submitting,
            SubmissionOutcome::Succeeded,
            SubmissionOutcome::Idle,
        ]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_editing_a_field_clears_the_error() -> anyhow::Result<()> {
    let (mut controller, _probe) = helpers::setup(
        IpBehaviour::Answer,
        DispatchBehaviour::Hang(Duration::from_secs(30)),
    );

    controller.submit(ana()).await;
    assert_eq!(
        controller.status(),
        SubmissionOutcome::Failed(SubmitError::Timeout)
    );

    controller.update(Field::Message, "Hi again");

    assert_eq!(controller.status(), SubmissionOutcome::Idle);
    assert_eq!(controller.fields().message, "Hi again");
    assert_eq!(controller.fields().name, "Ana");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_submission_returns_to_idle() -> anyhow::Result<()> {
    let (mut controller, _probe) = helpers::setup(
        IpBehaviour::Answer,
        DispatchBehaviour::Hang(Duration::from_secs(30)),
    );

    let cancelled = tokio::time::timeout(Duration::from_secs(1), controller.submit(ana())).await;

    assert!(cancelled.is_err());
    assert_eq!(controller.status(), SubmissionOutcome::Idle);
    assert_eq!(controller.last_success(), None);

    Ok(())
}

fn outcome_text(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Failed(err) => err.to_string(),
        other => format!("{other:?}"),
    }
}
