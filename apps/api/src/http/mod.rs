pub mod admin;
pub mod auth;
pub mod events;
pub mod forms;
pub mod settings;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::notify::Notifier;
pub use auth::AdminGate;

/// Shared by every handler; all parts are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub notifier: Notifier,
    pub gate: AdminGate,
}

/// JSON body whose parse failures come back as `400 {"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/forms", get(admin::list_forms))
        .route("/forms/:form_type", put(admin::upsert_form))
        .route("/submissions", get(admin::list_submissions))
        .route(
            "/submissions/:id",
            put(admin::update_submission).delete(admin::delete_submission),
        )
        .route("/registrations", get(admin::list_registrations))
        .route(
            "/registrations/:id",
            put(admin::update_registration).delete(admin::delete_registration),
        )
        .route("/events", post(admin::create_event))
        .route(
            "/events/:id",
            put(admin::update_event).delete(admin::delete_event),
        )
        .route("/settings/:key", put(admin::put_setting))
        .route("/init", post(admin::initialize))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/forms/:form_type", get(forms::get_form))
        .route("/forms/:form_type/submissions", post(forms::submit))
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        .route(
            "/events/:id/registrations",
            get(events::registrations).post(events::register),
        )
        .route("/settings/:key", get(settings::get_setting))
        .nest("/admin", admin)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
