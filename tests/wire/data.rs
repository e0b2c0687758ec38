//! Data-plane commands over HTTP.

use quiver::{FetchRequest, ResetScope, Vector};
use serde_json::json;

use crate::common::MockServer;

#[tokio::test]
async fn upsert_then_fetch_preserves_metadata() {
    let server = MockServer::spawn().await;
    let index = server.index();
    let metadata = json!({"genre": "noir", "year": 1944, "cast": ["Stanwyck", "MacMurray"]});

    let ack = index
        .upsert(
            [Vector::dense("double-indemnity", vec![0.3, 0.7]).with_metadata(metadata.clone())],
            Some("films"),
        )
        .await
        .unwrap();
    assert_eq!(ack, "Success");

    let fetched = index
        .fetch(
            FetchRequest::new(["double-indemnity", "missing"])
                .unwrap()
                .include_metadata(true),
            Some("films"),
        )
        .await
        .unwrap();

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].as_ref().unwrap().metadata, Some(metadata));
    assert!(fetched[1].is_none());
    assert_eq!(server.paths(), vec!["upsert/films", "fetch/films"]);
}

#[tokio::test]
async fn text_upsert_uses_data_endpoint() {
    let server = MockServer::spawn().await;
    let index = server.index();

    index
        .upsert([Vector::text("note", "buy milk")], None)
        .await
        .unwrap();

    let seen = server.seen();
    assert_eq!(seen[0].path, "upsert-data");
    assert_eq!(
        seen[0].body,
        json!([{"id": "note", "metadata": {"data": "buy milk"}, "data": "buy milk"}])
    );
}

#[tokio::test]
async fn reset_scopes_over_http() {
    let server = MockServer::spawn().await;
    let index = server.index();

    index
        .upsert([Vector::dense("a", vec![1.0, 0.0])], None)
        .await
        .unwrap();
    index
        .namespace("other")
        .upsert([Vector::dense("b", vec![0.0, 1.0])])
        .await
        .unwrap();

    index.reset(ResetScope::Default).await.unwrap();
    let info = index.info(None).await.unwrap();
    assert_eq!(info.namespace("").unwrap().vector_count, 0);
    assert_eq!(info.namespace("other").unwrap().vector_count, 1);

    index.reset(ResetScope::All).await.unwrap();
    let info = index.info(None).await.unwrap();
    assert_eq!(info.vector_count, 0);
    assert!(info.namespaces.values().all(|n| n.vector_count == 0));

    let paths = server.paths();
    assert!(paths.contains(&"reset".to_string()));
    assert!(paths.contains(&"reset?all".to_string()));
    assert!(server.seen().iter().filter(|s| s.path == "reset").all(|s| s.body == json!([])));
}
