//! Request/response envelope and the [`Requester`] seam.

use async_trait::async_trait;
use quiver_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single POST to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Path segments appended to the base URL
    pub path: Vec<String>,
    /// JSON body
    pub body: Value,
}

impl Request {
    /// A request to one endpoint.
    pub fn new(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            path: vec![endpoint.into()],
            body,
        }
    }
}

/// Decoded response envelope: `{result?, error?}`.
///
/// `aborted` is never on the wire. It marks the synthetic response produced
/// when a request's abort signal fires; `result` then holds the abort reason.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Operation result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Application error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on the synthetic response of an aborted request
    #[serde(skip)]
    pub aborted: bool,
}

impl Response {
    /// A successful response.
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Default::default()
        }
    }

    /// An application error carried in a 200 response.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// The success-shaped response an aborted request resolves with.
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self {
            result: Some(Value::String(reason.into())),
            error: None,
            aborted: true,
        }
    }

    /// Abort reason, if this response was produced by an abort.
    pub fn abort_reason(&self) -> Option<&str> {
        if self.aborted {
            self.result.as_ref().and_then(Value::as_str)
        } else {
            None
        }
    }
}

/// Anything that can carry a [`Request`] to the service.
///
/// [`HttpClient`](crate::HttpClient) is the production implementation; callers
/// may supply their own (proxies, recording, tests).
#[async_trait]
pub trait Requester: Send + Sync {
    /// Send one request and return the decoded envelope.
    async fn request(&self, req: Request) -> Result<Response>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_result_and_error() {
        let r: Response = serde_json::from_value(json!({"result": "Success"})).unwrap();
        assert_eq!(r, Response::ok(json!("Success")));
        let r: Response = serde_json::from_value(json!({"error": "bad"})).unwrap();
        assert_eq!(r.error.as_deref(), Some("bad"));
        assert!(r.result.is_none());
    }

    #[test]
    fn aborted_flag_is_not_serialized() {
        let r = Response::aborted("Timeout");
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({"result": "Timeout"}));
        assert_eq!(r.abort_reason(), Some("Timeout"));
        assert_eq!(Response::ok(json!("Timeout")).abort_reason(), None);
    }
}
