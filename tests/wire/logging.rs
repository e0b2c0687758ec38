//! Structured log events emitted by the client.

use std::sync::{Arc, Mutex};

use quiver::{Index, IndexConfig};
use tracing_subscriber::layer::SubscriberExt;

struct CaptureLayer {
    targets: Arc<Mutex<Vec<String>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.targets
                .lock()
                .unwrap()
                .push(event.metadata().target().to_string());
        }
    }
}

fn warnings_while(f: impl FnOnce()) -> Vec<String> {
    let targets = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        targets: targets.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = targets.lock().unwrap().clone();
    captured
}

#[test]
fn padded_token_warns_but_still_builds() {
    let warnings = warnings_while(|| {
        let index = Index::new(IndexConfig::new("http://127.0.0.1:1", " token "));
        assert!(index.is_ok());
    });
    assert_eq!(warnings, vec!["quiver::config"]);
}

#[test]
fn clean_credentials_do_not_warn() {
    let warnings = warnings_while(|| {
        Index::new(IndexConfig::new("http://127.0.0.1:1", "token")).unwrap();
    });
    assert!(warnings.is_empty());
}
