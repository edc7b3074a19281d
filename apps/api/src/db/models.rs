use adapt_forms::{
    Event, EventCategory, EventRegistration, FormSchema, RegistrationStatus, RegistrationType,
    Setting, Submission, SubmissionStatus,
};
use sqlx::FromRow;

/// A `form_configs` row; `fields` holds the JSON field list.
#[derive(Debug, FromRow, Clone)]
pub struct FormConfigRecord {
    pub form_type: String,
    pub title: String,
    pub description: String,
    pub fields: String,
    pub submit_button_text: String,
    pub success_message: String,
    pub enabled: bool,
    pub updated_at: String,
}

impl TryFrom<FormConfigRecord> for FormSchema {
    type Error = serde_json::Error;

    fn try_from(record: FormConfigRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            form_type: record.form_type,
            title: record.title,
            description: record.description,
            fields: serde_json::from_str(&record.fields)?,
            submit_button_text: record.submit_button_text,
            success_message: record.success_message,
            enabled: record.enabled,
            updated_at: Some(record.updated_at),
        })
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct SubmissionRecord {
    pub id: i64,
    pub form_type: String,
    pub data: String,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<SubmissionRecord> for Submission {
    type Error = serde_json::Error;

    fn try_from(record: SubmissionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            form_type: record.form_type,
            data: serde_json::from_str(&record.data)?,
            status: record.status,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct RegistrationRecord {
    pub id: i64,
    pub event_id: i64,
    pub data: String,
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<RegistrationRecord> for EventRegistration {
    type Error = serde_json::Error;

    fn try_from(record: RegistrationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            event_id: record.event_id,
            data: serde_json::from_str(&record.data)?,
            status: record.status,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub category: EventCategory,
    pub image_url: Option<String>,
    pub registration_type: RegistrationType,
    pub registration_url: Option<String>,
    pub registration_fields: Option<String>,
    pub max_registrations: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<EventRecord> for Event {
    type Error = serde_json::Error;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let registration_fields = match record.registration_fields.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json)?,
        };
        Ok(Self {
            id: record.id,
            title: record.title,
            date: record.date,
            time: record.time,
            location: record.location,
            description: record.description,
            category: record.category,
            image_url: record.image_url,
            registration_type: record.registration_type,
            registration_url: record.registration_url,
            registration_fields,
            max_registrations: record.max_registrations,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

impl From<SettingRecord> for Setting {
    fn from(record: SettingRecord) -> Self {
        Self {
            key: record.key,
            value: record.value,
            updated_at: Some(record.updated_at),
        }
    }
}
