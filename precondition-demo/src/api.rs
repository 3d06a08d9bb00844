use axum::extract::State;
use axum::http::header::ETAG;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use precondition::pagination::{Page, PageRequest};
use precondition::report::{EmissionReport, EmissionReportPatch};
use precondition::store::Store;
use precondition::Token;

use crate::dataset::Emission;
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::headers;
use crate::state::AppState;

fn entity_tag(token: &Token) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&token.to_entity_tag()).map_err(|err| ApiError::Internal(err.into()))
}

pub(crate) async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let report = state
        .reports
        .get(&id)
        .await
        .map_err(|err| ApiError::from_get(id, err))?;

    let etag = entity_tag(report.token())?;

    if headers::if_none_match(&headers, report.token())? {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response());
    }

    Ok(([(ETAG, etag)], Json(&*report)).into_response())
}

pub(crate) async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(patch): Json<EmissionReportPatch>,
) -> Result<Response, ApiError> {
    let expected = headers::if_match(&headers)?;

    let report = state
        .reports
        .compare_and_swap(&id, expected, patch)
        .await
        .map_err(|err| ApiError::from_update(id, err))?;

    tracing::info!(id, etag = %report.token(), "report updated");

    let etag = entity_tag(report.token())?;

    Ok(([(ETAG, etag)], Json(&*report)).into_response())
}

pub(crate) async fn list_reports(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> Result<Json<Page<EmissionReport>>, ApiError> {
    let reports = state.reports.list().await?;
    let reports = reports.iter().map(|report| EmissionReport::clone(report));

    Ok(Json(Page::of(
        reports,
        request,
        state.limits,
        "/api/reports",
    )))
}

pub(crate) async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.reset_reports().await?;

    tracing::info!("reports restored to their seeded state");

    Ok(Json(json!({ "success": true })))
}

pub(crate) async fn all_emissions(State(state): State<AppState>) -> Response {
    tracing::debug!(
        records = state.emissions.len(),
        "serving the whole emissions dataset"
    );

    Json(state.emissions.as_slice()).into_response()
}

pub(crate) async fn emissions(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> Json<Page<Emission>> {
    Json(Page::of(
        state.emissions.iter().cloned(),
        request,
        state.limits,
        "/api/emissions",
    ))
}
