//! Redaction routes — scan, restore, assess, retained maps.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use veil_core::Error;
use veil_redact::{list_patterns, RedactionMap, RiskLevel, ScanOptions, ScanResult};

use crate::retention::RetainedMap;
use crate::state::AppState;

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/redact/scan", post(scan_text))
        .route("/redact/restore", post(restore_text))
        .route("/redact/assess", post(assess_text))
        .route("/redact/patterns", get(list_registry))
        .route("/redact/maps/{id}", delete(delete_map))
        .route("/redact/status", get(redact_status))
}

// ---------------------------------------------------------------
// Request/Response types
// ---------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRequest {
    text: String,
    include_names: Option<bool>,
    include_addresses: Option<bool>,
    #[serde(default)]
    retain: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessRequest {
    text: String,
    include_names: Option<bool>,
    include_addresses: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestoreRequest {
    redacted_text: String,
    redaction_map: Option<RedactionMap>,
    map_id: Option<String>,
    strict: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResponse {
    #[serde(flatten)]
    result: ScanResult,
    privacy_score: u8,
    risk_level: RiskLevel,
    summary: String,
    #[serde(flatten)]
    retained: Option<RetainedMap>,
}

// ---------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------

fn scan_options(state: &AppState, names: Option<bool>, addresses: Option<bool>) -> ScanOptions {
    let defaults = state.redactor.default_options();
    ScanOptions {
        include_names: names.unwrap_or(defaults.include_names),
        include_addresses: addresses.unwrap_or(defaults.include_addresses),
    }
}

/// Run CPU-bound engine work off the async workers.
async fn blocking<T, F>(work: F) -> veil_core::Result<T>
where
    F: FnOnce() -> veil_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?
}

fn error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        Error::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        Error::RestoreMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::MapNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Redaction request failed: {}", err);
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /api/redact/scan
async fn scan_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScanRequest>,
) -> impl IntoResponse {
    let options = scan_options(&state, req.include_names, req.include_addresses);
    let redactor = state.redactor.clone();
    let text = req.text;
    let result = match blocking(move || redactor.scan(&text, &options)).await {
        Ok(result) => result,
        Err(e) => return error_response(e),
    };

    let report = result.report();
    let retained = req.retain.then(|| state.maps.insert(result.redaction_map.clone()));
    if let Some(retained) = &retained {
        debug!("Retained redaction map {}", retained.map_id);
    }

    let response = ScanResponse {
        result,
        privacy_score: report.privacy_score,
        risk_level: report.risk_level,
        summary: report.summary,
        retained,
    };
    (StatusCode::OK, Json(serde_json::json!(response)))
}

/// POST /api/redact/restore
async fn restore_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RestoreRequest>,
) -> impl IntoResponse {
    let map = match (req.redaction_map, req.map_id) {
        (Some(map), _) => map,
        (None, Some(id)) => match state.maps.get(&id) {
            Some(map) => map,
            None => return error_response(Error::MapNotFound(id)),
        },
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "redactionMap or mapId is required" })),
            )
        }
    };

    let strict = req.strict.unwrap_or(state.config.engine.strict_restore);
    match state.redactor.restore_with(&req.redacted_text, &map, strict) {
        Ok(text) => (StatusCode::OK, Json(serde_json::json!({ "text": text }))),
        Err(e) => error_response(e),
    }
}

/// POST /api/redact/assess
async fn assess_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssessRequest>,
) -> impl IntoResponse {
    let options = scan_options(&state, req.include_names, req.include_addresses);
    let redactor = state.redactor.clone();
    let text = req.text;
    match blocking(move || redactor.assess(&text, &options)).await {
        Ok(report) => (StatusCode::OK, Json(serde_json::json!(report))),
        Err(e) => error_response(e),
    }
}

/// GET /api/redact/patterns
async fn list_registry() -> Json<serde_json::Value> {
    let no_names = ScanOptions {
        include_names: false,
        ..ScanOptions::default()
    };
    let no_addresses = ScanOptions {
        include_addresses: false,
        ..ScanOptions::default()
    };

    let patterns: Vec<serde_json::Value> = list_patterns()
        .iter()
        .map(|p| {
            let gated_by = if !p.category.is_enabled(&no_names) {
                Some("includeNames")
            } else if !p.category.is_enabled(&no_addresses) {
                Some("includeAddresses")
            } else {
                None
            };
            serde_json::json!({
                "category": p.category,
                "label": p.category.label(),
                "severity": p.severity,
                "validated": p.validator.is_some(),
                "gatedBy": gated_by,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": patterns.len(),
        "patterns": patterns,
    }))
}

/// DELETE /api/redact/maps/{id}
async fn delete_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.maps.remove(&id) {
        (StatusCode::OK, Json(serde_json::json!({ "success": true })))
    } else {
        error_response(Error::MapNotFound(id))
    }
}

/// GET /api/redact/status
async fn redact_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "storedMaps": state.maps.len(),
        "retentionHours": state.config.retention.retention_hours,
        "maxInputBytes": state.config.engine.max_input_bytes,
        "strictRestore": state.config.engine.strict_restore,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use veil_core::VeilConfig;

    use crate::routes::build_router;

    fn app_with(config: VeilConfig) -> Router {
        build_router(Arc::new(AppState::new(config)))
    }

    fn app() -> Router {
        app_with(VeilConfig::default())
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_scan_response_shape() {
        let app = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/redact/scan",
            Some(json!({ "text": "Email john@example.com twice: john@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redactedText"], "Email [EMAIL_1] twice: [EMAIL_1]");
        assert_eq!(body["piiDetected"], true);
        assert_eq!(body["detectionStats"]["email"], 2);
        assert_eq!(body["privacyScore"], 40);
        assert_eq!(body["riskLevel"], "high");
        assert_eq!(body["summary"], "Detected 2 email addresses.");
        assert_eq!(body["detections"][0]["startOffset"], 6);
        assert_eq!(body["redactionMap"]["entries"]["[EMAIL_1]"]["originalText"], "john@example.com");
        assert!(body.get("mapId").is_none());
    }

    #[tokio::test]
    async fn test_retained_map_restore_and_delete() {
        let app = app();
        let text = "Call 020 7946 0958 about a@x.io";
        let (_, scanned) = call(
            &app,
            "POST",
            "/api/redact/scan",
            Some(json!({ "text": text, "retain": true })),
        )
        .await;
        let map_id = scanned["mapId"].as_str().unwrap().to_string();
        assert!(scanned["expiresAt"].is_string());

        let (_, status_body) = call(&app, "GET", "/api/redact/status", None).await;
        assert_eq!(status_body["storedMaps"], 1);

        let (status, restored) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({ "redactedText": scanned["redactedText"], "mapId": map_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(restored["text"], text);

        let (status, deleted) = call(&app, "DELETE", &format!("/api/redact/maps/{}", map_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["success"], true);

        let (status, _) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({ "redactedText": scanned["redactedText"], "mapId": map_id })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_restore_with_inline_map_and_mismatch() {
        let app = app();
        let (_, scanned) = call(
            &app,
            "POST",
            "/api/redact/scan",
            Some(json!({ "text": "a@x.io and b@x.io" })),
        )
        .await;

        let (status, restored) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({
                "redactedText": scanned["redactedText"],
                "redactionMap": scanned["redactionMap"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(restored["text"], "a@x.io and b@x.io");

        let (status, body) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({
                "redactedText": "[EMAIL_9] only",
                "redactionMap": scanned["redactionMap"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("[EMAIL_9]"));

        let (status, _) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({
                "redactedText": "[EMAIL_1] only",
                "redactionMap": scanned["redactionMap"],
                "strict": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(
            &app,
            "POST",
            "/api/redact/restore",
            Some(json!({ "redactedText": "[EMAIL_1]" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_input_rejected() {
        let mut config = VeilConfig::default();
        config.engine.max_input_bytes = 16;
        let app = app_with(config);
        let (status, body) = call(
            &app,
            "POST",
            "/api/redact/scan",
            Some(json!({ "text": "this text is longer than sixteen bytes" })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_assess_and_patterns() {
        let app = app();
        let (status, report) = call(
            &app,
            "POST",
            "/api/redact/assess",
            Some(json!({ "text": "Nothing sensitive here." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["privacyScore"], 100);
        assert_eq!(report["riskLevel"], "low");
        assert_eq!(report["summary"], "No privacy risks detected.");

        let (status, listing) = call(&app, "GET", "/api/redact/patterns", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["count"], 14);
        assert_eq!(listing["patterns"][0]["label"], "EMAIL");
        assert_eq!(listing["patterns"][0]["gatedBy"], Value::Null);
        assert_eq!(listing["patterns"][9]["gatedBy"], "includeAddresses");
        assert_eq!(listing["patterns"][11]["gatedBy"], "includeNames");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
