//! Resumable query session over HTTP.

use quiver::{Error, QueryRequest, ResumableQueryRequest, Vector};
use serde_json::json;

use crate::common::MockServer;

#[tokio::test]
async fn resumable_query_lifecycle() {
    let server = MockServer::spawn().await;
    let index = server.index();
    index
        .upsert(
            [
                Vector::dense("a", vec![1.0, 0.0]),
                Vector::dense("b", vec![0.0, 1.0]),
                Vector::dense("c", vec![0.5, 0.5]),
            ],
            None,
        )
        .await
        .unwrap();

    let request = ResumableQueryRequest::new(QueryRequest::vector(vec![1.0, 0.0], 2), 120);
    let mut query = index.resumable_query(request, None).await.unwrap();
    assert_eq!(query.result().len(), 2);
    assert!(query.is_active());

    let more = query.fetch_next(1).await.unwrap();
    assert_eq!(more[0].id, "extra");

    assert_eq!(query.stop().await.unwrap(), "Success");
    assert_eq!(query.fetch_next(1).await.unwrap_err(), Error::SessionStopped);

    let seen = server.seen();
    let bodies: Vec<_> = seen
        .iter()
        .filter(|s| s.path.starts_with("resumable-query"))
        .map(|s| (s.path.as_str(), s.body.clone()))
        .collect();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0].0, "resumable-query");
    assert_eq!(bodies[0].1["maxIdle"], json!(120));
    assert_eq!(
        bodies[1],
        ("resumable-query-next", json!({"uuid": "wire-session", "additionalK": 1}))
    );
    assert_eq!(
        bodies[2],
        ("resumable-query-end", json!({"uuid": "wire-session"}))
    );
}
