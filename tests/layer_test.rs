use httpmock::prelude::*;
use slack_log_appender::{AppenderConfig, HttpTransport, SlackLayer, SlackNotifier, StatusBuffer};
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

#[test]
fn test_layer_forwards_events_at_or_above_filter() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/hook")
            .body_contains("-- [ERROR]layer_test - disk almost full disk=sda1");
        then.status(200);
    });

    let mut config = AppenderConfig::default();
    config.set_webhook_uri(server.url("/hook"));
    let status = StatusBuffer::new();
    let transport = HttpTransport::new(config.timeout()).unwrap();
    let notifier = SlackNotifier::with_parts(config, transport, Arc::new(status.clone()));

    let subscriber =
        tracing_subscriber::registry().with(SlackLayer::new(notifier).with_filter(LevelFilter::WARN));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("service started");
        tracing::error!(disk = "sda1", "disk almost full");
    });

    mock.assert_hits(1);
    assert!(status.is_empty(), "unexpected status: {:?}", status.messages());
}

#[test]
fn test_layer_does_not_forward_its_own_failure_reports() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(500).body("internal_error");
    });

    let mut config = AppenderConfig::default();
    config.set_webhook_uri(server.url("/hook"));
    // Default status sink reports through `tracing`, which this layer sees.
    let notifier = SlackNotifier::new(config).unwrap();

    let subscriber = tracing_subscriber::registry().with(SlackLayer::new(notifier));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!("queue backing up");
    });

    mock.assert_hits(1);
}

#[test]
fn test_ignored_target_is_not_forwarded() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(200);
    });

    let mut config = AppenderConfig::default();
    config.set_webhook_uri(server.url("/hook"));
    let notifier = SlackNotifier::new(config).unwrap();

    let subscriber = tracing_subscriber::registry()
        .with(SlackLayer::new(notifier).ignore_target("noisy"));

    tracing::subscriber::with_default(subscriber, || {
        tracing::error!(target: "noisy::poller", "poll failed");
        tracing::error!(target: "billing", "charge failed");
    });

    mock.assert_hits(1);
}
