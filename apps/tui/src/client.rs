//! Thin HTTP client for the forms service.

use std::time::Duration;

use adapt_forms::{
    CountResponse, ErrorBody, Event, EventRegistration, EventUpdate, FieldError, FormSchema,
    NewEvent, RegistrationUpdate, SchemaUpdate, Setting, SettingValue, Submission,
    SubmissionUpdate, SubmitReceipt, SubmitRequest,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status and an error body.
    #[error("{}", .body.error)]
    Api { status: u16, body: ErrorBody },

    /// Connection, timeout or decoding failure.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("An admin token is required for this action")]
    MissingToken,
}

impl ClientError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::MissingToken => None,
        }
    }

    /// Per-field errors the service reported, if any.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Api { body, .. } => &body.field_errors,
            Self::Http(_) | Self::MissingToken => &[],
        }
    }

    /// True when the request never got an answer from the service.
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. } | Self::MissingToken)
    }
}

/// Answer to `POST /admin/init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InitReport {
    pub success: bool,
    #[serde(default)]
    pub seeded: u64,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("adapt-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: config.admin_token.clone(),
        })
    }

    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        self.http.request(method, self.url(path))
    }

    fn admin(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    // =========================================================================
    // Public surface
    // =========================================================================

    pub async fn get_form(&self, form_type: &str) -> Result<FormSchema> {
        let response = self
            .request(Method::GET, &format!("/forms/{form_type}"))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn submit_form(
        &self,
        form_type: &str,
        request: &SubmitRequest,
    ) -> Result<SubmitReceipt> {
        let response = self
            .request(Method::POST, &format!("/forms/{form_type}/submissions"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let response = self.request(Method::GET, "/events").send().await?;
        decode(response).await
    }

    pub async fn get_event(&self, id: i64) -> Result<Event> {
        let response = self
            .request(Method::GET, &format!("/events/{id}"))
            .send()
            .await?;
        decode(response).await
    }

    /// Active (non-cancelled) registrations for an event.
    pub async fn registration_count(&self, event_id: i64) -> Result<i64> {
        let response = self
            .request(Method::GET, &format!("/events/{event_id}/registrations"))
            .query(&[("countOnly", "true")])
            .send()
            .await?;
        let count: CountResponse = decode(response).await?;
        Ok(count.count)
    }

    pub async fn register(&self, event_id: i64, request: &SubmitRequest) -> Result<SubmitReceipt> {
        let response = self
            .request(Method::POST, &format!("/events/{event_id}/registrations"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    // =========================================================================
    // Admin surface
    // =========================================================================

    pub async fn list_schemas(&self) -> Result<Vec<FormSchema>> {
        let response = self.admin(Method::GET, "/admin/forms")?.send().await?;
        decode(response).await
    }

    pub async fn upsert_schema(&self, form_type: &str, update: &SchemaUpdate) -> Result<FormSchema> {
        self.send_json(Method::PUT, &format!("/admin/forms/{form_type}"), update)
            .await
    }

    pub async fn list_submissions(&self, form_type: Option<&str>) -> Result<Vec<Submission>> {
        let mut request = self.admin(Method::GET, "/admin/submissions")?;
        if let Some(form_type) = form_type {
            request = request.query(&[("formType", form_type)]);
        }
        decode(request.send().await?).await
    }

    pub async fn update_submission(
        &self,
        id: i64,
        update: &SubmissionUpdate,
    ) -> Result<Submission> {
        self.send_json(Method::PUT, &format!("/admin/submissions/{id}"), update)
            .await
    }

    pub async fn delete_submission(&self, id: i64) -> Result<()> {
        self.delete(&format!("/admin/submissions/{id}")).await
    }

    pub async fn list_registrations(&self, event_id: Option<i64>) -> Result<Vec<EventRegistration>> {
        let mut request = self.admin(Method::GET, "/admin/registrations")?;
        if let Some(event_id) = event_id {
            request = request.query(&[("eventId", event_id)]);
        }
        decode(request.send().await?).await
    }

    pub async fn update_registration(
        &self,
        id: i64,
        update: &RegistrationUpdate,
    ) -> Result<EventRegistration> {
        self.send_json(Method::PUT, &format!("/admin/registrations/{id}"), update)
            .await
    }

    pub async fn delete_registration(&self, id: i64) -> Result<()> {
        self.delete(&format!("/admin/registrations/{id}")).await
    }

    pub async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        self.send_json(Method::POST, "/admin/events", event).await
    }

    pub async fn update_event(&self, id: i64, update: &EventUpdate) -> Result<Event> {
        self.send_json(Method::PUT, &format!("/admin/events/{id}"), update)
            .await
    }

    pub async fn delete_event(&self, id: i64) -> Result<()> {
        self.delete(&format!("/admin/events/{id}")).await
    }

    /// Reads a setting with the admin token, so non-public keys work too.
    pub async fn get_setting(&self, key: &str) -> Result<Setting> {
        let response = self
            .admin(Method::GET, &format!("/settings/{key}"))?
            .send()
            .await?;
        decode(response).await
    }

    pub async fn put_setting(&self, key: &str, value: &str) -> Result<Setting> {
        let body = SettingValue {
            value: value.to_string(),
        };
        self.send_json(Method::PUT, &format!("/admin/settings/{key}"), &body)
            .await
    }

    /// Re-runs migrations and seeding on the service.
    pub async fn initialize(&self) -> Result<InitReport> {
        let response = self.admin(Method::POST, "/admin/init")?.send().await?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.admin(method, path)?.json(body).send().await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.admin(Method::DELETE, path)?.send().await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        body: error_body(status, &text),
    })
}

/// Parses an error body, falling back to the status reason when the service
/// (or something in front of it) answered with something else.
fn error_body(status: StatusCode, text: &str) -> ErrorBody {
    serde_json::from_str(text).unwrap_or_else(|_| ErrorBody {
        error: status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
        field_errors: Vec::new(),
    })
}
