//! HTTP status mapping, retries and headers.

use std::time::Duration;

use quiver::telemetry::telemetry_headers;
use quiver::{Backoff, Error, Index, IndexConfig, RetryConfig, Vector};
use tokio::net::TcpListener;

use crate::common::{MockServer, TOKEN};

/// A local address with nothing listening on it.
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn fast_retries(retries: u32) -> RetryConfig {
    RetryConfig::retries(retries).with_backoff(Backoff::constant(Duration::from_millis(10)))
}

#[tokio::test]
async fn wrong_token_is_a_service_error_with_status() {
    let server = MockServer::spawn().await;
    let index = Index::new(IndexConfig::new(server.url.clone(), "wrong")).unwrap();

    let err = index.info(None).await.unwrap_err();
    assert_eq!(
        err,
        Error::Service {
            message: "Unauthorized".into(),
            status: Some(401)
        }
    );
    // Error statuses are never retried.
    assert_eq!(server.seen().len(), 1);
}

#[tokio::test]
async fn unsupported_endpoint_error_is_surfaced() {
    let server = MockServer::spawn().await;
    let err = server
        .index()
        .query(quiver::QueryRequest::vector(vec![0.1, 0.2], 1), None)
        .await
        .unwrap_err();
    match err {
        Error::Service { message, status } => {
            assert!(message.contains("unsupported endpoint"));
            assert_eq!(status, Some(400));
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_refused_without_retry_is_one_attempt() {
    let config = IndexConfig::new(dead_address().await, TOKEN).with_retry(RetryConfig::Disabled);
    let err = Index::new(config).unwrap().info(None).await.unwrap_err();
    assert!(matches!(err, Error::Transport { attempts: 1, .. }));
}

#[tokio::test]
async fn connection_refused_exhausts_retries() {
    let config = IndexConfig::new(dead_address().await, TOKEN).with_retry(fast_retries(2));
    let err = Index::new(config).unwrap().info(None).await.unwrap_err();
    assert!(matches!(err, Error::Transport { attempts: 3, .. }));
}

#[tokio::test]
async fn retry_reaches_a_server_that_comes_up_late() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = IndexConfig::new(format!("http://{}", addr), TOKEN)
        .with_retry(RetryConfig::retries(20).with_backoff(Backoff::constant(Duration::from_millis(25))));
    let index = Index::new(config).unwrap();

    let late = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        let listener = TcpListener::bind(addr).await.unwrap();
        MockServer::serve(listener)
    });

    let info = index.info(None).await.unwrap();
    assert_eq!(info.vector_count, 0);
    let server = late.await.unwrap();
    assert_eq!(server.seen().len(), 1);
}

#[tokio::test]
async fn sends_bearer_content_type_and_telemetry() {
    let server = MockServer::spawn().await;
    server
        .index()
        .upsert([Vector::dense("a", vec![1.0, 0.0])], None)
        .await
        .unwrap();

    let seen = server.seen();
    let headers = &seen[0].headers;
    assert_eq!(headers["authorization"], format!("Bearer {}", TOKEN).as_str());
    assert_eq!(headers["content-type"], "application/json");
    for (name, value) in telemetry_headers() {
        assert_eq!(headers[name], value.as_str());
    }
}

#[tokio::test]
async fn telemetry_can_be_disabled() {
    let server = MockServer::spawn().await;
    let index = Index::new(server.config().with_telemetry(false)).unwrap();
    index.info(None).await.unwrap();

    let seen = server.seen();
    let headers = &seen[0].headers;
    for (name, _) in telemetry_headers() {
        assert!(headers.get(name).is_none());
    }
}

#[tokio::test]
async fn trailing_slash_in_url_is_ignored() {
    let server = MockServer::spawn().await;
    let config = IndexConfig::new(format!("{}/", server.url), TOKEN);
    Index::new(config).unwrap().info(None).await.unwrap();
    assert_eq!(server.paths(), vec!["info"]);
}

#[tokio::test]
async fn token_with_newline_builds_but_requests_fail() {
    let server = MockServer::spawn().await;
    let index = Index::new(IndexConfig::new(server.url.clone(), "tok\nen")).unwrap();

    let err = index.info(None).await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(server.seen().is_empty());
}
