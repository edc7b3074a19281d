//! Lifecycle of one open form.
//!
//! `Loading → {LoadFailed, Ready}` and `Ready → Submitting → {Submitted, Ready}`.
//! Every change goes through [`FormSession::process`]; anything else is a
//! [`TransitionError`]. The session never performs I/O; the event loop watches
//! for [`FormPhase::Submitting`] and reports the outcome back as an event.

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

use adapt_forms::{
    validate, FieldError, FormData, FormField, FormSchema, SubmitReceipt, SubmitRequest,
};
use thiserror::Error;

pub const LOAD_FAILED: &str = "Failed to load form";
pub const SUBMIT_FAILED: &str = "Failed to submit form";
pub const EVENT_FULL: &str = "This event has reached maximum capacity";

/// What the session was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Form(String),
    Event(i64),
}

impl fmt::Display for FormTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(form_type) => write!(f, "form {form_type}"),
            Self::Event(id) => write!(f, "event #{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Loading,
    LoadFailed,
    Ready,
    Submitting,
    Submitted,
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::LoadFailed => write!(f, "LoadFailed"),
            Self::Ready => write!(f, "Ready"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Submitted => write!(f, "Submitted"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    Loaded {
        schema: FormSchema,
        spots_left: Option<i64>,
    },
    LoadFailed(String),
    Edit {
        field: String,
        value: String,
    },
    Submit,
    Accepted(SubmitReceipt),
    Rejected {
        message: String,
        field_errors: Vec<FieldError>,
    },
    NetworkFailed,
}

impl fmt::Display for FormEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { schema, .. } => write!(f, "Loaded({})", schema.form_type),
            Self::LoadFailed(detail) => write!(f, "LoadFailed({detail})"),
            Self::Edit { field, .. } => write!(f, "Edit({field})"),
            Self::Submit => write!(f, "Submit"),
            Self::Accepted(receipt) => write!(f, "Accepted({})", receipt.submission_id),
            Self::Rejected { message, .. } => write!(f, "Rejected({message})"),
            Self::NetworkFailed => write!(f, "NetworkFailed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid transition from {from} with event {event}")]
pub struct TransitionError {
    pub from: FormPhase,
    pub event: String,
}

/// Everything the renderer shows besides the phase itself.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub schema: Option<FormSchema>,
    pub values: FormData,
    pub errors: BTreeMap<String, String>,
    pub banner: Option<String>,
    pub detail: Option<String>,
    pub receipt: Option<SubmitReceipt>,
    pub spots_left: Option<i64>,
}

impl FormState {
    fn fields(&self) -> &[FormField] {
        self.schema.as_ref().map_or(&[], |schema| &schema.fields)
    }
}

struct NextPhase(FormPhase);

impl FormPhase {
    const fn next_phase(self) -> NextPhase {
        NextPhase(self)
    }
}

impl TryFrom<(FormPhase, FormEvent, &mut FormState)> for NextPhase {
    type Error = TransitionError;

    fn try_from(value: (FormPhase, FormEvent, &mut FormState)) -> Result<Self, Self::Error> {
        let (current, event, state) = value;

        match (current, event) {
            (FormPhase::Loading, FormEvent::Loaded { schema, spots_left }) => {
                state.values = schema
                    .fields
                    .iter()
                    .map(|field| (field.id.clone(), field.initial_value()))
                    .collect();
                state.schema = Some(schema);
                state.spots_left = spots_left;
                Ok(FormPhase::Ready.next_phase())
            }
            (FormPhase::Loading, FormEvent::LoadFailed(detail)) => {
                state.banner = Some(LOAD_FAILED.to_string());
                state.detail = Some(detail);
                Ok(FormPhase::LoadFailed.next_phase())
            }
            (FormPhase::Ready, FormEvent::Edit { field, value }) => {
                // Undeclared ids are ignored; only declared fields are ever sent.
                if state.fields().iter().any(|declared| declared.id == field) {
                    state.errors.remove(&field);
                    state.values.insert(field, value);
                }
                Ok(FormPhase::Ready.next_phase())
            }
            (FormPhase::Ready, FormEvent::Submit) => {
                if state.spots_left == Some(0) {
                    state.banner = Some(EVENT_FULL.to_string());
                    return Ok(FormPhase::Ready.next_phase());
                }
                let errors = validate(state.fields(), &state.values);
                if errors.is_empty() {
                    state.errors.clear();
                    state.banner = None;
                    Ok(FormPhase::Submitting.next_phase())
                } else {
                    state.errors = collect_errors(errors);
                    Ok(FormPhase::Ready.next_phase())
                }
            }
            (FormPhase::Submitting, FormEvent::Accepted(receipt)) => {
                state.receipt = Some(receipt);
                state.banner = None;
                Ok(FormPhase::Submitted.next_phase())
            }
            (
                FormPhase::Submitting,
                FormEvent::Rejected {
                    message,
                    field_errors,
                },
            ) => {
                state.banner = Some(message);
                state.errors = collect_errors(field_errors);
                Ok(FormPhase::Ready.next_phase())
            }
            (FormPhase::Submitting, FormEvent::NetworkFailed) => {
                state.banner = Some(SUBMIT_FAILED.to_string());
                Ok(FormPhase::Ready.next_phase())
            }
            (from, event) => Err(TransitionError {
                from,
                event: event.to_string(),
            }),
        }
    }
}

/// First message per field, in the order reported.
fn collect_errors(errors: Vec<FieldError>) -> BTreeMap<String, String> {
    let mut by_field = BTreeMap::new();
    for error in errors {
        by_field.entry(error.field).or_insert(error.message);
    }
    by_field
}

#[derive(Debug, Clone)]
pub struct FormSession {
    target: FormTarget,
    phase: FormPhase,
    state: FormState,
    focus: usize,
    option_cursor: usize,
}

impl FormSession {
    pub fn open(target: FormTarget) -> Self {
        Self {
            target,
            phase: FormPhase::Loading,
            state: FormState::default(),
            focus: 0,
            option_cursor: 0,
        }
    }

    /// Starts a fresh `Loading` cycle for the same target, discarding values,
    /// errors and any previous outcome.
    pub fn reopen(&mut self) {
        *self = Self::open(self.target.clone());
    }

    pub fn process(&mut self, event: FormEvent) -> Result<FormPhase, TransitionError> {
        let next = NextPhase::try_from((self.phase, event, &mut self.state))?;
        if next.0 != self.phase {
            tracing::debug!(form = %self.target, from = %self.phase, to = %next.0, "form transition");
        }
        self.phase = next.0;
        Ok(self.phase)
    }

    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    pub const fn target(&self) -> &FormTarget {
        &self.target
    }

    pub const fn schema(&self) -> Option<&FormSchema> {
        self.state.schema.as_ref()
    }

    pub fn fields(&self) -> &[FormField] {
        self.state.fields()
    }

    pub fn value(&self, field_id: &str) -> &str {
        self.state.values.get(field_id).map_or("", String::as_str)
    }

    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.state.errors.get(field_id).map(String::as_str)
    }

    pub fn banner(&self) -> Option<&str> {
        self.state.banner.as_deref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.state.detail.as_deref()
    }

    pub const fn spots_left(&self) -> Option<i64> {
        self.state.spots_left
    }

    pub const fn receipt(&self) -> Option<&SubmitReceipt> {
        self.state.receipt.as_ref()
    }

    /// "Reference #N" for a stored submission; decoys and unnumbered receipts get nothing.
    pub fn reference_line(&self) -> Option<String> {
        self.receipt()
            .filter(|receipt| receipt.has_reference())
            .map(|receipt| format!("Reference #{}", receipt.submission_id))
    }

    /// Body for the submit request, with only declared fields and the empty
    /// honeypot a person leaves behind.
    pub fn submit_request(&self) -> SubmitRequest {
        let data = self
            .fields()
            .iter()
            .map(|field| (field.id.clone(), self.value(&field.id).to_string()))
            .collect();
        SubmitRequest::new(data)
    }

    // Focus covers every field plus the submit button after the last one.

    pub const fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_slots(&self) -> usize {
        self.fields().len() + 1
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields().get(self.focus)
    }

    pub fn on_submit_button(&self) -> bool {
        self.focus >= self.fields().len()
    }

    pub fn set_focus(&mut self, focus: usize) {
        self.focus = focus.min(self.focus_slots().saturating_sub(1));
        self.option_cursor = 0;
    }

    pub const fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn move_option_cursor(&mut self, forward: bool) {
        let len = self.focused_field().map_or(0, |field| field.option_list().len());
        if len == 0 {
            self.option_cursor = 0;
        } else if forward {
            self.option_cursor = (self.option_cursor + 1) % len;
        } else {
            self.option_cursor = (self.option_cursor + len - 1) % len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapt_forms::schema::default_schemas;
    use pretty_assertions::assert_eq;

    fn contact_session() -> FormSession {
        let schema = default_schemas()
            .into_iter()
            .find(|schema| schema.form_type == "contact")
            .unwrap();
        let mut session = FormSession::open(FormTarget::Form("contact".to_string()));
        session
            .process(FormEvent::Loaded {
                schema,
                spots_left: None,
            })
            .unwrap();
        session
    }

    fn edit(session: &mut FormSession, field: &str, value: &str) {
        session
            .process(FormEvent::Edit {
                field: field.to_string(),
                value: value.to_string(),
            })
            .unwrap();
    }

    fn fill_contact(session: &mut FormSession) {
        edit(session, "name", "Jane Doe");
        edit(session, "email", "jane@example.com");
        edit(session, "subject", "Programs");
        edit(session, "message", "Hello there");
    }

    #[test]
    fn load_binds_initial_values() {
        let session = contact_session();
        assert_eq!(session.phase(), FormPhase::Ready);
        assert_eq!(session.value("name"), "");
        assert!(session.banner().is_none());
    }

    #[test]
    fn load_failure_shows_generic_banner() {
        let mut session = FormSession::open(FormTarget::Form("missing".to_string()));
        let phase = session
            .process(FormEvent::LoadFailed("Form configuration not found".to_string()))
            .unwrap();
        assert_eq!(phase, FormPhase::LoadFailed);
        assert_eq!(session.banner(), Some(LOAD_FAILED));
        assert_eq!(session.detail(), Some("Form configuration not found"));
    }

    #[test]
    fn local_errors_block_the_request() {
        let mut session = contact_session();
        edit(&mut session, "email", "not-an-email");

        let phase = session.process(FormEvent::Submit).unwrap();

        assert_eq!(phase, FormPhase::Ready);
        assert_eq!(session.error("name"), Some("Your Name is required"));
        assert_eq!(
            session.error("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn editing_clears_only_that_fields_error() {
        let mut session = contact_session();
        session.process(FormEvent::Submit).unwrap();
        assert!(session.error("name").is_some());
        assert!(session.error("email").is_some());

        edit(&mut session, "name", "J");

        assert_eq!(session.error("name"), None);
        assert!(session.error("email").is_some());
    }

    #[test]
    fn accepted_submission_shows_reference() {
        let mut session = contact_session();
        fill_contact(&mut session);
        assert_eq!(session.process(FormEvent::Submit).unwrap(), FormPhase::Submitting);

        session
            .process(FormEvent::Accepted(SubmitReceipt::accepted("Thanks!", 12)))
            .unwrap();

        assert_eq!(session.phase(), FormPhase::Submitted);
        assert_eq!(session.reference_line().as_deref(), Some("Reference #12"));
    }

    #[test]
    fn zero_reference_is_not_shown() {
        let mut session = contact_session();
        fill_contact(&mut session);
        session.process(FormEvent::Submit).unwrap();
        session
            .process(FormEvent::Accepted(SubmitReceipt::decoy(None)))
            .unwrap();
        assert_eq!(session.reference_line(), None);
    }

    #[test]
    fn server_rejection_becomes_banner_and_field_errors() {
        let mut session = contact_session();
        fill_contact(&mut session);
        session.process(FormEvent::Submit).unwrap();

        session
            .process(FormEvent::Rejected {
                message: "Validation failed".to_string(),
                field_errors: vec![FieldError {
                    field: "email".to_string(),
                    message: "Please enter a valid email address".to_string(),
                }],
            })
            .unwrap();

        assert_eq!(session.phase(), FormPhase::Ready);
        assert_eq!(session.banner(), Some("Validation failed"));
        assert!(session.error("email").is_some());
        assert_eq!(session.value("name"), "Jane Doe");
    }

    #[test]
    fn network_failure_keeps_values() {
        let mut session = contact_session();
        fill_contact(&mut session);
        session.process(FormEvent::Submit).unwrap();
        session.process(FormEvent::NetworkFailed).unwrap();
        assert_eq!(session.banner(), Some(SUBMIT_FAILED));
        assert_eq!(session.value("message"), "Hello there");
    }

    #[test]
    fn edits_while_submitting_are_rejected() {
        let mut session = contact_session();
        fill_contact(&mut session);
        session.process(FormEvent::Submit).unwrap();

        let error = session
            .process(FormEvent::Edit {
                field: "name".to_string(),
                value: "x".to_string(),
            })
            .unwrap_err();

        assert_eq!(error.from, FormPhase::Submitting);
        assert_eq!(
            error.to_string(),
            "Invalid transition from Submitting with event Edit(name)"
        );
    }

    #[test]
    fn reopen_starts_a_fresh_cycle() {
        let mut session = contact_session();
        fill_contact(&mut session);
        session.process(FormEvent::Submit).unwrap();
        session
            .process(FormEvent::Accepted(SubmitReceipt::accepted("Thanks!", 3)))
            .unwrap();

        session.reopen();

        assert_eq!(session.phase(), FormPhase::Loading);
        assert_eq!(session.value("name"), "");
        assert!(session.receipt().is_none());
    }

    #[test]
    fn full_event_blocks_submit() {
        let mut session = FormSession::open(FormTarget::Event(1));
        let schema = FormSchema {
            fields: adapt_forms::schema::default_registration_fields(),
            ..FormSchema::blank("event_registration")
        };
        session
            .process(FormEvent::Loaded {
                schema,
                spots_left: Some(0),
            })
            .unwrap();
        edit(&mut session, "name", "Sam");
        edit(&mut session, "email", "sam@example.com");

        assert_eq!(session.process(FormEvent::Submit).unwrap(), FormPhase::Ready);
        assert_eq!(session.banner(), Some(EVENT_FULL));
    }

    #[test]
    fn submit_request_only_carries_declared_fields() {
        let mut session = contact_session();
        fill_contact(&mut session);
        edit(&mut session, "injected", "nope");
        let request = session.submit_request();
        assert!(!request.data.contains_key("injected"));
        assert_eq!(request.data.get("name").map(String::as_str), Some("Jane Doe"));
        assert_eq!(request.honeypot.as_deref(), Some(""));
        assert!(!request.is_spam());
    }
}
