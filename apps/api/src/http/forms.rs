use adapt_forms::{FormSchema, SubmitReceipt, SubmitRequest};
use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::{ApiJson, AppState};
use crate::intake;

/// Public schema read. A disabled form is reported as such, not as missing.
pub async fn get_form(
    State(state): State<AppState>,
    Path(form_type): Path<String>,
) -> Result<Json<FormSchema>, ApiError> {
    let schema = queries::get_schema(&state.pool, &form_type)
        .await?
        .ok_or(ApiError::NotFound("Form configuration"))?;
    if !schema.enabled {
        return Err(ApiError::DisabledForm);
    }
    Ok(Json(schema))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(form_type): Path<String>,
    ApiJson(request): ApiJson<SubmitRequest>,
) -> Result<Json<SubmitReceipt>, ApiError> {
    intake::submit_form(&state.pool, &state.notifier, &form_type, request)
        .await
        .map(Json)
}
