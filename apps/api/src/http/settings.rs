use adapt_forms::Setting;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::db::queries;
use crate::error::ApiError;
use crate::http::AppState;

/// Keys anyone may read.
pub const PUBLIC_SETTINGS: [&str; 1] = ["donation_url"];

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Setting>, ApiError> {
    if !PUBLIC_SETTINGS.contains(&key.as_str()) {
        state.gate.check(&headers)?;
    }
    queries::get_setting(&state.pool, &key)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Setting"))
}
