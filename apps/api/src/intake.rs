//! Public submission paths: the honeypot, schema and capacity checks that run
//! before anything is stored.

use adapt_forms::{validate, FormData, FormField, SubmitReceipt, SubmitRequest};
use sqlx::SqlitePool;

use crate::db::queries;
use crate::error::ApiError;
use crate::notify::{Notice, Notifier};

pub const REGISTRATION_DECOY_MESSAGE: &str = "Thank you for registering!";

/// Drops keys no field declares.
fn declared_only(fields: &[FormField], mut data: FormData) -> FormData {
    data.retain(|key, _| fields.iter().any(|field| &field.id == key));
    data
}

/// Stores a submission for `form_type`.
///
/// Order: honeypot, schema lookup, enabled flag, validation, insert, mail.
pub async fn submit_form(
    pool: &SqlitePool,
    notifier: &Notifier,
    form_type: &str,
    request: SubmitRequest,
) -> Result<SubmitReceipt, ApiError> {
    if request.is_spam() {
        tracing::info!(form_type, "honeypot tripped, discarding submission");
        // Same message a real submission would get; lookup failures are ignored.
        let schema = queries::get_schema(pool, form_type).await.ok().flatten();
        return Ok(SubmitReceipt::decoy(
            schema.as_ref().map(|s| s.success_message.as_str()),
        ));
    }

    let schema = queries::get_schema(pool, form_type)
        .await?
        .ok_or(ApiError::NotFound("Form configuration"))?;
    if !schema.enabled {
        return Err(ApiError::DisabledForm);
    }

    let errors = validate(&schema.fields, &request.data);
    if !errors.is_empty() {
        tracing::debug!(form_type, count = errors.len(), "submission failed validation");
        return Err(ApiError::Validation(errors));
    }

    let data = declared_only(&schema.fields, request.data);
    let id = queries::create_submission(pool, form_type, &data).await?;
    tracing::info!(form_type, id, "submission stored");

    drop(notifier.dispatch(Notice {
        form_type: form_type.to_string(),
        title: schema.title,
        reference: id,
        data,
        success_message: schema.success_message.clone(),
    }));

    Ok(SubmitReceipt::accepted(schema.success_message, id))
}

/// Registers for an internal-registration event.
///
/// The capacity check and the insert are separate statements, so concurrent
/// registrations for the last spot can both succeed.
pub async fn register_for_event(
    pool: &SqlitePool,
    notifier: &Notifier,
    event_id: i64,
    request: SubmitRequest,
) -> Result<SubmitReceipt, ApiError> {
    if request.is_spam() {
        tracing::info!(event_id, "honeypot tripped, discarding registration");
        return Ok(SubmitReceipt::decoy(Some(REGISTRATION_DECOY_MESSAGE)));
    }

    let event = queries::get_event(pool, event_id)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;
    let schema = event
        .registration_schema()
        .ok_or(ApiError::RegistrationClosed)?;

    if let Some(max) = schema.max_registrations {
        let taken = queries::count_active_registrations(pool, event_id).await?;
        if taken >= max {
            tracing::info!(event_id, taken, max, "registration refused, event full");
            return Err(ApiError::CapacityExceeded);
        }
    }

    let fields = &schema.schema.fields;
    let errors = validate(fields, &request.data);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let data = declared_only(fields, request.data);
    let id = queries::create_registration(pool, event_id, &data).await?;
    tracing::info!(event_id, id, "registration stored");

    let message = event.registered_message();
    drop(notifier.dispatch(Notice {
        form_type: schema.schema.form_type.clone(),
        title: event.title.clone(),
        reference: id,
        data,
        success_message: format!(
            "You're registered for {} on {} at {}.",
            event.title,
            event.display_date(),
            event.time
        ),
    }));

    Ok(SubmitReceipt::accepted(message, id))
}
