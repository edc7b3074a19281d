//! Stored records and the request/response bodies exchanged over HTTP.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EventCategory, RegistrationStatus, RegistrationType, SubmissionStatus};
use crate::schema::{
    default_registration_fields, EventRegistrationSchema, FormField, FormSchema,
    DEFAULT_SUCCESS_MESSAGE,
};
use crate::validation::{FieldError, FormData};

/// Form type under which event registrations are reported and mailed.
pub const EVENT_REGISTRATION_FORM: &str = "event_registration";

/// A stored form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub form_type: String,
    pub data: FormData,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored event sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    pub id: i64,
    pub event_id: i64,
    pub data: FormData,
    pub status: RegistrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub registration_type: RegistrationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default)]
    pub registration_fields: Vec<FormField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_registrations: Option<i64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Event {
    pub const fn accepts_registrations(&self) -> bool {
        matches!(self.registration_type, RegistrationType::Internal)
    }

    /// The event's own fields, or name/email/phone when it defines none.
    pub fn effective_registration_fields(&self) -> Vec<FormField> {
        if self.registration_fields.is_empty() {
            default_registration_fields()
        } else {
            self.registration_fields.clone()
        }
    }

    /// Form used to sign up, present only for internal registration.
    pub fn registration_schema(&self) -> Option<EventRegistrationSchema> {
        if !self.accepts_registrations() {
            return None;
        }
        Some(EventRegistrationSchema {
            event_id: self.id,
            schema: FormSchema {
                form_type: EVENT_REGISTRATION_FORM.to_string(),
                title: format!("Register for {}", self.title),
                description: format!("{} at {}", self.display_date(), self.time),
                fields: self.effective_registration_fields(),
                submit_button_text: "Register".to_string(),
                success_message: self.registered_message(),
                enabled: true,
                updated_at: None,
            },
            max_registrations: self.max_registrations,
        })
    }

    pub fn registered_message(&self) -> String {
        format!("You're registered for {}! We'll see you there.", self.title)
    }

    /// `Saturday, January 18, 2025`, or the stored text if it is not a date.
    pub fn display_date(&self) -> String {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_or_else(
            |_| self.date.clone(),
            |date| date.format("%A, %B %-d, %Y").to_string(),
        )
    }

    pub fn apply(&mut self, update: EventUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = non_empty(image_url);
        }
        if let Some(registration_type) = update.registration_type {
            self.registration_type = registration_type;
        }
        if let Some(url) = update.registration_url {
            self.registration_url = non_empty(url);
        }
        if let Some(fields) = update.registration_fields {
            self.registration_fields = fields;
        }
        if let Some(max) = update.max_registrations {
            self.max_registrations = (max > 0).then_some(max);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Body of `POST /admin/events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub registration_type: RegistrationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default)]
    pub registration_fields: Vec<FormField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_registrations: Option<i64>,
}

impl NewEvent {
    /// Names of the required attributes left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("date", &self.date),
            ("time", &self.time),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn has_valid_date(&self) -> bool {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_ok()
    }
}

/// Partial event update; `None` leaves an attribute unchanged. An empty
/// string clears the optional URLs and a non-positive capacity removes the
/// limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_type: Option<RegistrationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_fields: Option<Vec<FormField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_registrations: Option<i64>,
}

/// Triage update for a submission or registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub type SubmissionUpdate = StatusUpdate<SubmissionStatus>;
pub type RegistrationUpdate = StatusUpdate<RegistrationStatus>;

/// Public submit body. `honeypot` mirrors a visually hidden input that
/// people never fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub data: FormData,
    #[serde(default, alias = "_honeypot", skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<String>,
}

impl SubmitRequest {
    pub fn new(data: FormData) -> Self {
        Self {
            data,
            honeypot: Some(String::new()),
        }
    }

    pub fn is_spam(&self) -> bool {
        self.honeypot
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub success: bool,
    pub message: String,
    /// Reference number shown to the submitter; `0` means "none".
    pub submission_id: i64,
}

impl SubmitReceipt {
    pub fn accepted(message: impl Into<String>, submission_id: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            submission_id,
        }
    }

    /// What a tripped honeypot gets back: indistinguishable in shape, never stored.
    pub fn decoy(message: Option<&str>) -> Self {
        Self::accepted(message.unwrap_or(DEFAULT_SUCCESS_MESSAGE), 0)
    }

    pub const fn has_reference(&self) -> bool {
        self.submission_id > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValue {
    pub value: String,
}
