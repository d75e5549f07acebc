//! Router construction.

use axum::{
    Router,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::{certificates, chain, health};
use crate::state::SharedState;

/// Builds the HTTP API over `state`.
///
/// CORS is open to any origin; preflight `OPTIONS` requests are answered
/// by the CORS layer with `204 No Content`.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/health", get(health::health))
        .route("/issue", post(certificates::issue_certificate))
        .route("/verify", post(certificates::verify_certificate))
        .route("/chain", get(chain::full_chain))
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn preflight_no_content(req: Request, next: Next) -> Response {
    let preflight = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use ledger::{SharedLedger, hash_certificate};

    use crate::routes::certificates::{ALREADY_EXISTS, FOUND, ISSUED, NOT_FOUND, TAMPERED};
    use crate::state::AppState;

    fn app_with(ledger: SharedLedger) -> Router {
        router(AppState::new(ledger))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.expect("infallible router");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    fn post_json(path: &str, body: Value) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    fn get(path: &str) -> Request<Body> {
        Request::get(path).body(Body::empty()).expect("valid request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app_with(SharedLedger::new());
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn issue_then_reissue() {
        let app = app_with(SharedLedger::new());
        let expected_hash = hash_certificate("Jane Doe, MSc").unwrap().to_string();

        let (status, body) =
            send(&app, post_json("/issue", json!({ "certificate": "Jane Doe, MSc" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], ISSUED);
        assert_eq!(body["certificate_hash"], expected_hash);
        assert_eq!(body["block_index"], 2);

        let (status, body) = send(
            &app,
            post_json("/issue", json!({ "certificate": "  Jane   Doe,\tMSc " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], ALREADY_EXISTS);
        assert_eq!(body["certificate_hash"], expected_hash);
        assert!(body.get("block_index").is_none());
    }

    #[tokio::test]
    async fn malformed_bodies_are_invalid_input() {
        let app = app_with(SharedLedger::new());
        let invalid = json!({ "error": "Certificate must be a string" });

        let bodies = [
            json!({}),
            json!({ "certificate": 42 }),
            json!({ "certificate": null }),
            json!([1, 2]),
        ];
        for body in bodies {
            let (status, resp) = send(&app, post_json("/issue", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp, invalid);
        }

        let not_json = Request::post("/verify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("certificate=abc"))
            .unwrap();
        assert_eq!(send(&app, not_json).await, (StatusCode::BAD_REQUEST, invalid.clone()));

        let no_content_type = Request::post("/issue")
            .body(Body::from(r#"{"certificate":"abc"}"#))
            .unwrap();
        assert_eq!(send(&app, no_content_type).await, (StatusCode::BAD_REQUEST, invalid));
    }

    #[tokio::test]
    async fn blank_certificate_is_rejected() {
        let app = app_with(SharedLedger::new());
        let (status, body) =
            send(&app, post_json("/issue", json!({ "certificate": " \n\t " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Certificate cannot be empty" }));

        let (_, chain) = send(&app, get("/chain")).await;
        assert_eq!(chain["length"], 1);
    }

    #[tokio::test]
    async fn blank_certificate_is_rejected_on_verify() {
        let app = app_with(SharedLedger::new());
        for blank in ["", "   ", "\u{1c}\u{1f}"] {
            let (status, body) =
                send(&app, post_json("/verify", json!({ "certificate": blank }))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Certificate cannot be empty" }));
        }
    }

    #[tokio::test]
    async fn verify_found_and_not_found() {
        let app = app_with(SharedLedger::new());
        send(&app, post_json("/issue", json!({ "certificate": "real one" }))).await;

        let (status, body) =
            send(&app, post_json("/verify", json!({ "certificate": "real   one" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "valid": true, "explanation": FOUND }));

        let (status, body) =
            send(&app, post_json("/verify", json!({ "certificate": "fake one" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "valid": false, "explanation": NOT_FOUND }));
    }

    #[tokio::test]
    async fn tampered_chain_fails_verification_with_server_error() {
        let ledger = SharedLedger::new();
        let app = app_with(ledger.clone());
        send(&app, post_json("/issue", json!({ "certificate": "original" }))).await;

        ledger.with_ledger(|l| {
            l.chain_mut()[1].certificate_hashes_mut()[0] = hash_certificate("forged").unwrap();
        });

        let (status, body) =
            send(&app, post_json("/verify", json!({ "certificate": "forged" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "valid": false, "explanation": TAMPERED }));

        let (status, chain) = send(&app, get("/chain")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chain["is_valid"], false);
    }

    #[tokio::test]
    async fn chain_lists_blocks_and_pending() {
        let ledger = SharedLedger::new();
        let app = app_with(ledger.clone());
        send(&app, post_json("/issue", json!({ "certificate": "first" }))).await;
        let queued = hash_certificate("queued").unwrap();
        ledger.add_certificate(queued);

        let (status, body) = send(&app, get("/chain")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["length"], 2);
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["pending_certificates"], json!([queued.to_string()]));

        let blocks = body["chain"].as_array().expect("chain array");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["index"], 1);
        assert_eq!(blocks[0]["certificate_hashes"], json!([]));
        assert_eq!(blocks[1]["index"], 2);
        assert_eq!(blocks[1]["previous_hash"], blocks[0]["hash"]);
        assert_eq!(
            blocks[1]["certificate_hashes"],
            json!([hash_certificate("first").unwrap().to_string()])
        );
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let app = app_with(SharedLedger::new());
        let preflight = Request::options("/issue")
            .header(header::ORIGIN, "http://example.test")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn simple_responses_carry_cors_header() {
        let app = app_with(SharedLedger::new());
        let req = Request::get("/chain")
            .header(header::ORIGIN, "http://example.test")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
