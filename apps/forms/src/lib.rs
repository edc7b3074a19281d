//! Shared form model for the adapt server and terminal client.
//!
//! Both sides validate with the same [`validate`] so the feedback a visitor
//! sees locally matches what the server enforces.

pub mod domain;
pub mod export;
pub mod records;
pub mod schema;
pub mod validation;

pub use domain::{EventCategory, FieldType, RegistrationStatus, RegistrationType, SubmissionStatus};
pub use records::{
    CountResponse, ErrorBody, Event, EventRegistration, EventUpdate, NewEvent, RegistrationUpdate,
    Setting, SettingValue, StatusUpdate, Submission, SubmissionUpdate, SubmitReceipt,
    SubmitRequest, EVENT_REGISTRATION_FORM,
};
pub use schema::{EventRegistrationSchema, FormField, FormSchema, SchemaError, SchemaUpdate};
pub use validation::{format_phone, validate, FieldError, FormData};
