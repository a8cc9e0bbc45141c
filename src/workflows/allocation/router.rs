use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{HostelId, StudentId, Term};
use super::repository::{HousingStore, StoreError};
use super::service::{AllocationService, AllocationServiceError};

/// Router builder exposing the allocation operation surface. Admin
/// authentication sits in front of this router and is not modeled here.
pub fn allocation_router<S>(service: Arc<AllocationService<S>>) -> Router
where
    S: HousingStore + 'static,
{
    Router::new()
        .route("/api/v1/allocations", get(list_handler::<S>))
        .route("/api/v1/allocations/run", post(run_handler::<S>))
        .route("/api/v1/allocations/preview", get(preview_handler::<S>))
        .route("/api/v1/allocations/reset", post(reset_handler::<S>))
        .route(
            "/api/v1/allocations/students/:student_id",
            get(my_allocation_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunRequest {
    pub(crate) term: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermQuery {
    pub(crate) term: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) term: Option<String>,
    pub(crate) hostel_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetRequest {
    #[serde(default)]
    pub(crate) term: Option<String>,
    #[serde(default)]
    pub(crate) confirm: bool,
}

pub(crate) async fn run_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    axum::Json(request): axum::Json<RunRequest>,
) -> Response
where
    S: HousingStore + 'static,
{
    match service.run(&Term(request.term)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Query(query): Query<TermQuery>,
) -> Response
where
    S: HousingStore + 'static,
{
    match service.preview(&Term(query.term)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    axum::Json(request): axum::Json<ResetRequest>,
) -> Response
where
    S: HousingStore + 'static,
{
    let term = request.term.map(Term);
    match service.reset(term.as_ref(), request.confirm) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn my_allocation_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Path(student_id): Path<u32>,
) -> Response
where
    S: HousingStore + 'static,
{
    match service.my_allocation(StudentId(student_id)) {
        Ok(Some(view)) => (StatusCode::OK, axum::Json(view)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no active allocation for student {student_id}"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: HousingStore + 'static,
{
    let term = query.term.map(Term);
    let hostel = query.hostel_id.map(HostelId);
    match service.list_allocations(term.as_ref(), hostel) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    let status = match &error {
        AllocationServiceError::ConfirmationRequired => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AllocationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(payload)).into_response()
}
