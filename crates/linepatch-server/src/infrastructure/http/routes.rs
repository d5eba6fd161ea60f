//! Route table and handlers of the HTTP API.
//!
//! Handlers are thin: they extract the request, move the blocking store or
//! file work onto the blocking thread pool, and wrap the result in an
//! [`ApiResponse`].  The use-case logic lives in [`crate::application`].

use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path as UrlPath, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use linepatch_core::{FileTarget, MatchResult, Template};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::dto::{
    ApiResponse, ApplyRequest, CurrentValueDto, DeletedDto, FindMatchesRequest, ValuesRequest,
};
use super::error::ApiError;
use crate::application::{
    apply_values, check_template_status, fill_current_values, precheck, ApplyOutcome,
    BatchSummary, PreCheckReport, TemplateRepository, TemplateStatus,
};
use crate::infrastructure::files::{BatchApplier, FileLocator};

/// Long-lived handles shared by every request.
#[derive(Clone)]
pub struct ApiState {
    pub templates: Arc<dyn TemplateRepository>,
    pub locator: FileLocator,
    pub applier: BatchApplier,
}

impl ApiState {
    pub fn new(templates: Arc<dyn TemplateRepository>) -> Self {
        Self {
            templates,
            locator: FileLocator::new(),
            applier: BatchApplier::new(),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Builds the API router.  Every path outside `/api` is served from
/// `static_dir`.
pub fn router(state: ApiState, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/api/templates", get(list_templates).post(create_template))
        .route(
            "/api/templates/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/api/templates/:id/status", get(template_status))
        .route("/api/templates/:id/precheck", post(precheck_template))
        .route("/api/templates/:id/apply", post(apply_template))
        .route("/api/files/find-matches", post(find_matches))
        .route("/api/files/current-value", post(current_value))
        .route("/api/apply", post(apply_modifications))
        .with_state(state);

    api.fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Runs `work` on the blocking pool and converts its error.
async fn blocking<T, E, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ── Templates ─────────────────────────────────────────────────────────────────

async fn list_templates(State(state): State<ApiState>) -> ApiResult<Vec<Template>> {
    let templates = blocking(move || state.templates.list_all()).await?;
    ok(templates)
}

/// Returns the template with every item's `currentValue` read from its first
/// target.
async fn get_template(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Template> {
    let template = blocking(move || {
        let mut template = state.templates.get(&id)?;
        fill_current_values(&mut template, &state.locator);
        Ok::<_, ApiError>(template)
    })
    .await?;
    ok(template)
}

async fn create_template(
    State(state): State<ApiState>,
    payload: Result<Json<Template>, JsonRejection>,
) -> ApiResult<Template> {
    let Json(template) = payload?;
    let saved = blocking(move || state.templates.save(template)).await?;
    ok(saved)
}

/// Saves the body under the identifier from the path, whatever id the body
/// carries.
async fn update_template(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
    payload: Result<Json<Template>, JsonRejection>,
) -> ApiResult<Template> {
    let Json(mut template) = payload?;
    template.id = id;
    let saved = blocking(move || state.templates.save(template)).await?;
    ok(saved)
}

async fn delete_template(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<DeletedDto> {
    let deleted = blocking(move || state.templates.delete(&id).map(|()| DeletedDto { id })).await?;
    ok(deleted)
}

async fn template_status(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<TemplateStatus> {
    let status = blocking(move || {
        let template = state.templates.get(&id)?;
        Ok::<_, ApiError>(check_template_status(&template, &state.locator))
    })
    .await?;
    ok(status)
}

async fn precheck_template(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> ApiResult<PreCheckReport> {
    let Json(request) = payload?;
    let report = blocking(move || {
        let template = state.templates.get(&id)?;
        Ok::<_, ApiError>(precheck(&template, &request.values, &state.locator))
    })
    .await?;
    ok(report)
}

async fn apply_template(
    State(state): State<ApiState>,
    UrlPath(id): UrlPath<String>,
    payload: Result<Json<ValuesRequest>, JsonRejection>,
) -> ApiResult<ApplyOutcome> {
    let Json(request) = payload?;
    let outcome = blocking(move || {
        let template = state.templates.get(&id)?;
        Ok::<_, ApiError>(apply_values(&template, &request.values, &state.applier)?)
    })
    .await?;
    ok(outcome)
}

// ── Files ─────────────────────────────────────────────────────────────────────

async fn find_matches(
    State(state): State<ApiState>,
    payload: Result<Json<FindMatchesRequest>, JsonRejection>,
) -> ApiResult<Vec<MatchResult>> {
    let Json(request) = payload?;
    let matches = blocking(move || {
        state
            .locator
            .find_matches(&request.file_path, &request.prefix, &request.suffix)
    })
    .await?;
    ok(matches)
}

async fn current_value(
    State(state): State<ApiState>,
    payload: Result<Json<FileTarget>, JsonRejection>,
) -> ApiResult<CurrentValueDto> {
    let Json(target) = payload?;
    let value = blocking(move || state.locator.get_value(&target)).await?;
    ok(CurrentValueDto { value })
}

async fn apply_modifications(
    State(state): State<ApiState>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<BatchSummary> {
    let Json(request) = payload?;
    let summary = blocking(move || state.applier.apply(&request.modifications)).await?;
    ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
