//! Admin-only handlers. The `/admin` router is wrapped in
//! [`require_admin`](crate::http::auth::require_admin), so none of these check
//! credentials themselves.

use adapt_forms::schema::{check_fields, is_slug};
use adapt_forms::{
    Event, EventRegistration, EventUpdate, FormSchema, NewEvent, RegistrationUpdate, SchemaError,
    SchemaUpdate, Setting, SettingValue, Submission, SubmissionUpdate,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{queries, seed_defaults, setup_database};
use crate::error::ApiError;
use crate::http::{ApiJson, AppState};

pub async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<FormSchema>>, ApiError> {
    Ok(Json(queries::list_schemas(&state.pool).await?))
}

pub async fn upsert_form(
    State(state): State<AppState>,
    Path(form_type): Path<String>,
    ApiJson(update): ApiJson<SchemaUpdate>,
) -> Result<Json<FormSchema>, ApiError> {
    if !is_slug(&form_type) {
        return Err(SchemaError::InvalidFormType.into());
    }
    if let Some(fields) = &update.fields {
        check_fields(fields)?;
    }
    let schema = queries::upsert_schema(&state.pool, &form_type, update).await?;
    tracing::info!(form_type, enabled = schema.enabled, "form schema saved");
    Ok(Json(schema))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFilter {
    pub form_type: Option<String>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let form_type = filter.form_type.as_deref().filter(|f| !f.is_empty());
    Ok(Json(queries::list_submissions(&state.pool, form_type).await?))
}

pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<SubmissionUpdate>,
) -> Result<Json<Submission>, ApiError> {
    queries::update_submission(&state.pool, id, update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Submission"))
}

pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if queries::delete_submission(&state.pool, id).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound("Submission"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFilter {
    pub event_id: Option<i64>,
}

pub async fn list_registrations(
    State(state): State<AppState>,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Json<Vec<EventRegistration>>, ApiError> {
    Ok(Json(
        queries::list_registrations(&state.pool, filter.event_id).await?,
    ))
}

pub async fn update_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<RegistrationUpdate>,
) -> Result<Json<EventRegistration>, ApiError> {
    queries::update_registration(&state.pool, id, update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Registration"))
}

pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if queries::delete_registration(&state.pool, id).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound("Registration"))
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    if !input.has_valid_date() {
        return Err(ApiError::BadRequest("Date must be YYYY-MM-DD".to_string()));
    }
    check_fields(&input.registration_fields)?;

    let event = queries::create_event(&state.pool, input).await?;
    tracing::info!(id = event.id, title = %event.title, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<EventUpdate>,
) -> Result<Json<Event>, ApiError> {
    if let Some(fields) = &update.registration_fields {
        check_fields(fields)?;
    }
    queries::update_event(&state.pool, id, update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Event"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if queries::delete_event(&state.pool, id).await? {
        tracing::info!(id, "event deleted");
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::NotFound("Event"))
    }
}

pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(body): ApiJson<SettingValue>,
) -> Result<Json<Setting>, ApiError> {
    Ok(Json(
        queries::put_setting(&state.pool, &key, &body.value).await?,
    ))
}

/// Re-runs migrations and seeding; safe to call any number of times.
pub async fn initialize(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    setup_database(&state.pool).await?;
    let seeded = seed_defaults(&state.pool).await?;
    tracing::info!(seeded, "database initialized");
    Ok(Json(json!({ "success": true, "seeded": seeded })))
}
