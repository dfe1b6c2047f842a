//! REST API handlers.
//!
//! Save and poll delegate to `ConfigService`; this layer validates input and
//! maps service errors onto status codes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::warn;

use confgrid_core::{ConfigDocument, UpdatePolicy, DEFAULT_PROFILE};
use confgrid_service::{SaveOutcome, ServiceError};
use confgrid_state::is_valid_key_segment;

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> axum::response::Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
        .into_response()
}

/// Map a service error onto its HTTP status.
fn service_error_response(err: &ServiceError) -> axum::response::Response {
    match err {
        ServiceError::InvalidYaml(_) => error_response("invalid yaml", StatusCode::BAD_REQUEST),
        // 304 carries no body.
        ServiceError::AlreadyExists(_) => StatusCode::NOT_MODIFIED.into_response(),
        ServiceError::NotFound(_) => error_response(&err.to_string(), StatusCode::NOT_FOUND),
        ServiceError::Transform(_) | ServiceError::Decode(_) | ServiceError::Store(_) => {
            error_response(&err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// ── Save ───────────────────────────────────────────────────────

/// Save request body.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfigRequest {
    pub service: String,
    pub version: String,
    #[serde(default)]
    pub profile: Option<String>,
    pub namespace: String,
    pub update_policy: UpdatePolicy,
    pub yaml: String,
}

impl SaveConfigRequest {
    /// Check required fields and build the document to save.
    ///
    /// `yaml` may be blank; it saves as an empty document.
    fn into_document(self) -> Result<ConfigDocument, String> {
        for (field, value) in [
            ("service", &self.service),
            ("version", &self.version),
            ("namespace", &self.namespace),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} is required"));
            }
        }
        for (field, value) in [("service", &self.service), ("namespace", &self.namespace)] {
            if !is_valid_key_segment(value) {
                return Err(format!("{field} must not contain '/'"));
            }
        }
        let profile = match self.profile {
            Some(p) if !p.trim().is_empty() => p,
            _ => DEFAULT_PROFILE.to_string(),
        };
        Ok(ConfigDocument {
            service: self.service,
            version: self.version,
            profile,
            namespace: self.namespace,
            update_policy: self.update_policy,
            yaml: self.yaml,
        })
    }
}

/// POST /configs
pub async fn save_config(
    State(state): State<ApiState>,
    req: Result<Json<SaveConfigRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match req {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "save config rejected: unreadable body");
            return error_response("invalid save config request", StatusCode::BAD_REQUEST);
        }
    };
    let doc = match req.into_document() {
        Ok(doc) => doc,
        Err(reason) => {
            warn!(%reason, "save config rejected: invalid field");
            return error_response(&reason, StatusCode::BAD_REQUEST);
        }
    };

    let service = doc.service.clone();
    match state.service.save(doc) {
        Ok(outcome) => {
            let status = match outcome {
                SaveOutcome::Created => StatusCode::CREATED,
                SaveOutcome::Updated => StatusCode::OK,
            };
            (status, ApiResponse::ok(service)).into_response()
        }
        Err(e) => {
            if !matches!(e, ServiceError::AlreadyExists(_)) {
                warn!(%service, error = %e, "save config failed");
            }
            service_error_response(&e)
        }
    }
}

// ── Poll ───────────────────────────────────────────────────────

/// GET /{service}/{version}
pub async fn poll_config(
    State(state): State<ApiState>,
    Path((service, version)): Path<(String, String)>,
) -> impl IntoResponse {
    if service.is_empty() {
        return error_response("service is empty", StatusCode::BAD_REQUEST);
    }
    if version.is_empty() {
        return error_response("version is empty", StatusCode::BAD_REQUEST);
    }

    match state.service.poll(&service, &version) {
        Ok(env) => Json(env).into_response(),
        Err(e) => {
            warn!(%service, %version, error = %e, "poll config failed");
            service_error_response(&e)
        }
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
