//! Cancellation of in-flight requests against a slow server.

use std::time::Duration;

use quiver::{AbortSignal, Command, Error, Index, Output, SignalSource, TIMEOUT_REASON};

use crate::common::MockServer;

#[tokio::test]
async fn manual_abort_resolves_with_reason() {
    let server = MockServer::spawn().await;
    server.slow_down(Duration::from_secs(5));

    let signal = AbortSignal::new();
    let index = Index::new(server.config().with_signal(signal.clone())).unwrap();

    let trigger = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.abort_with("user navigated away");
    });

    let started = std::time::Instant::now();
    let output = index.executor().execute(Command::info(None)).await.unwrap();
    assert_eq!(
        output,
        Output::Aborted {
            reason: "user navigated away".into()
        }
    );
    assert!(started.elapsed() < Duration::from_secs(2));

    // Later requests through the same signal abort before sending.
    let before = server.seen().len();
    let err = index.info(None).await.unwrap_err();
    assert_eq!(
        err,
        Error::Aborted {
            reason: "user navigated away".into()
        }
    );
    assert_eq!(server.seen().len(), before);
}

#[tokio::test]
async fn per_request_timeout_uses_a_fresh_signal() {
    let server = MockServer::spawn().await;
    server.slow_down(Duration::from_millis(300));

    let config = server
        .config()
        .with_signal(SignalSource::per_request_timeout(Duration::from_millis(50)));
    let index = Index::new(config).unwrap();

    for _ in 0..2 {
        let err = index.info(None).await.unwrap_err();
        assert_eq!(
            err,
            Error::Aborted {
                reason: TIMEOUT_REASON.into()
            }
        );
    }
    // Each call got its own signal, so both reached the server.
    assert_eq!(server.seen().len(), 2);
}
