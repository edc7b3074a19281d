use adapt_forms::{CountResponse, Event, EventRegistration, SubmitReceipt, SubmitRequest};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::{ApiJson, AppState};
use crate::intake;

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(queries::list_events(&state.pool).await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    queries::get_event(&state.pool, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Event"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsQuery {
    #[serde(default)]
    pub count_only: bool,
}

/// `?countOnly=true` is public and feeds the "spots left" display; the full
/// list needs an admin token.
pub async fn registrations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RegistrationsQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if query.count_only {
        let count = queries::count_active_registrations(&state.pool, id).await?;
        return Ok(Json(CountResponse { count }).into_response());
    }

    state.gate.check(&headers)?;
    let registrations: Vec<EventRegistration> =
        queries::list_registrations(&state.pool, Some(id)).await?;
    Ok(Json(registrations).into_response())
}

pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<SubmitRequest>,
) -> Result<Json<SubmitReceipt>, ApiError> {
    intake::register_for_event(&state.pool, &state.notifier, id, request)
        .await
        .map(Json)
}
