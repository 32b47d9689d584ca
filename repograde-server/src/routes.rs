//! HTTP handlers for the RepoGrade server.

use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use repograde_core::AnalysisResponse;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::analysis::AnalysisService;
use crate::openapi::ApiDoc;

/// Header carrying the caller's narrative credential.
pub const API_KEY_HEADER: &str = "x-api-key";

const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Repository analysis service.
    pub analysis: AnalysisService,
}

/// Request payload for a repository analysis.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// GitHub repository URL, e.g. `https://github.com/owner/repo`.
    pub repo_url: String,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the server is accepting requests.
    pub status: String,
}

/// JSON extractor settings that report malformed bodies as [`ErrorResponse`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            message: err.to_string(),
        });
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn caller_api_key(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    params(
        ("x-api-key" = Option<String>, Header, description = "Narrative model credential")
    ),
    responses(
        (status = 200, description = "Repository analysis", body = AnalysisResponse),
        (status = 400, description = "Invalid repository URL", body = ErrorResponse),
        (status = 500, description = "Analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/analyze")]
/// Score a GitHub repository and optionally attach a narrative audit.
pub async fn analyze(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<AnalyzeRequest>,
) -> impl Responder {
    let api_key = caller_api_key(&req);
    match state.analysis.analyze(&payload.repo_url, api_key).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) if err.is_client_error() => HttpResponse::BadRequest().json(ErrorResponse {
            message: err.to_string(),
        }),
        Err(_) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: GENERIC_FAILURE.to_string(),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    ),
    tag = "system"
)]
#[get("/api/health")]
/// Report liveness.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
