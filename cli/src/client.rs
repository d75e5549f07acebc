//! Blocking HTTP client for the API gateway.
//!
//! Every call yields an [`ApiResponse`], never an error: HTTP error
//! statuses keep their code and body, and transport failures (server
//! unreachable, timeout) are reported as status `0` with an `error` body,
//! so the caller can always print something meaningful.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{Value, json};
use thiserror::Error;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors constructing the client itself.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP status and JSON body returned for a call.
///
/// `status` is `0` when no response was received.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Constructs a client for the gateway at `base_url`, e.g.
    /// `"http://127.0.0.1:5000"`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// `POST /issue`
    pub fn issue(&self, certificate: &str) -> ApiResponse {
        self.send(
            self.client
                .post(self.endpoint("/issue"))
                .json(&json!({ "certificate": certificate })),
        )
    }

    /// `POST /verify`
    pub fn verify(&self, certificate: &str) -> ApiResponse {
        self.send(
            self.client
                .post(self.endpoint("/verify"))
                .json(&json!({ "certificate": certificate })),
        )
    }

    /// `GET /chain`
    pub fn chain(&self) -> ApiResponse {
        self.send(self.client.get(self.endpoint("/chain")))
    }

    fn endpoint(&self, path: &str) -> String {
        // Avoid accidental double slashes.
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn send(&self, request: RequestBuilder) -> ApiResponse {
        let response = match request.send() {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("request failed: {e:?}");
                return unreachable_server(&e);
            }
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(text) => ApiResponse {
                status,
                body: parse_body(&text),
            },
            Err(e) => ApiResponse {
                status,
                body: json!({ "error": format!("failed to read response body: {e}") }),
            },
        }
    }
}

fn unreachable_server(e: &reqwest::Error) -> ApiResponse {
    ApiResponse {
        status: 0,
        body: json!({ "error": format!("Could not reach server: {e}") }),
    }
}

/// Parses a response body as JSON, wrapping anything else as
/// `{"error": <raw body>}`.
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "error": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_bodies_pass_through() {
        assert_eq!(
            parse_body(r#"{"valid": true}"#),
            json!({ "valid": true })
        );
    }

    #[test]
    fn non_json_bodies_are_wrapped() {
        assert_eq!(
            parse_body("<h1>Bad Gateway</h1>"),
            json!({ "error": "<h1>Bad Gateway</h1>" })
        );
        assert_eq!(parse_body(""), json!({ "error": "" }));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = ApiClient::new("http://127.0.0.1:5000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.endpoint("/issue"), "http://127.0.0.1:5000/issue");
        assert_eq!(client.endpoint("chain"), "http://127.0.0.1:5000/chain");
    }

    #[test]
    fn unreachable_server_is_status_zero_not_a_panic() {
        // Port 9 (discard) on localhost is closed in any test environment we
        // care about; the connection is refused immediately.
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let response = client.chain();
        assert_eq!(response.status, 0);
        let message = response.body["error"].as_str().expect("error message");
        assert!(message.starts_with("Could not reach server"), "{message}");
    }
}
