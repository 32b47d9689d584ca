//! OpenAPI specification for the RepoGrade server.

use utoipa::OpenApi;

use repograde_core::{AnalysisResponse, CheckStatus, ChecklistItem};

use crate::routes::{AnalyzeRequest, ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::analyze,
        crate::routes::health,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AnalyzeRequest,
            AnalysisResponse,
            ChecklistItem,
            CheckStatus,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "analysis", description = "Repository analysis"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the RepoGrade server.
pub struct ApiDoc;
