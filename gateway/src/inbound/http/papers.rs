//! Paper search and indexing handlers.
//!
//! ```text
//! GET  /api/ai/search/papers?text=...
//! POST /api/ai/paper/add
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::NewPaper;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorResponse, PapersResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_text;

/// Query string of the search endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query; must not be blank.
    pub text: Option<String>,
}

/// Reference to another work by id.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct WorkRef {
    pub id: String,
}

/// Request payload for indexing a paper.
///
/// Absent fields default to empty values; the backend decides what it
/// accepts.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct AddPaperRequest {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[schema(example = 2017)]
    pub year: i64,
    pub best_oa_location: String,
    pub referenced_paper: Vec<WorkRef>,
    pub related_paper: Vec<WorkRef>,
}

/// Response payload for an accepted paper.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddPaperResponse {
    #[schema(example = "ok")]
    pub status: String,
}

impl From<AddPaperRequest> for NewPaper {
    fn from(request: AddPaperRequest) -> Self {
        Self {
            id: request.id,
            title: request.title,
            abstract_text: request.abstract_text,
            year: request.year,
            best_oa_location: request.best_oa_location,
            referenced_works: request
                .referenced_paper
                .into_iter()
                .map(|work| work.id)
                .collect(),
            related_works: request
                .related_paper
                .into_iter()
                .map(|work| work.id)
                .collect(),
        }
    }
}

/// Search papers by free text.
#[utoipa::path(
    get,
    path = "/api/ai/search/papers",
    params(SearchParams),
    responses(
        (status = 200, description = "Papers in backend order", body = PapersResponse),
        (status = 400, description = "Missing text", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unreachable", body = ErrorResponse),
        (status = 504, description = "Backend deadline exceeded", body = ErrorResponse)
    ),
    tags = ["papers"],
    operation_id = "searchPapers",
    security(("BearerAuth" = []))
)]
#[get("/ai/search/papers")]
pub async fn search_papers(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<PapersResponse>> {
    let text = require_text(params.into_inner().text, "text is required")?;
    let papers = state.papers.search_papers(text).await?;
    Ok(web::Json(PapersResponse::from(papers)))
}

/// Submit a paper for indexing.
#[utoipa::path(
    post,
    path = "/api/ai/paper/add",
    request_body = AddPaperRequest,
    responses(
        (status = 200, description = "Paper accepted", body = AddPaperResponse),
        (status = 400, description = "Malformed body or backend rejection", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unreachable", body = ErrorResponse)
    ),
    tags = ["papers"],
    operation_id = "addPaper",
    security(("BearerAuth" = []))
)]
#[post("/ai/paper/add")]
pub async fn add_paper(
    state: web::Data<HttpState>,
    payload: web::Json<AddPaperRequest>,
) -> ApiResult<web::Json<AddPaperResponse>> {
    state.papers.add_paper(payload.into_inner().into()).await?;
    Ok(web::Json(AddPaperResponse {
        status: "ok".to_owned(),
    }))
}

#[cfg(test)]
#[path = "papers_tests.rs"]
mod tests;
