use adapt_forms::{
    Event, EventRegistration, EventUpdate, FormData, FormSchema, NewEvent, RegistrationStatus,
    RegistrationUpdate, SchemaUpdate, Setting, Submission, SubmissionStatus, SubmissionUpdate,
};
use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::{
    EventRecord, FormConfigRecord, RegistrationRecord, SettingRecord, SubmissionRecord,
};
use crate::db::{now, StoreError};

const FORM_COLUMNS: &str = "form_type, title, description, fields, submit_button_text, \
                            success_message, enabled, updated_at";
const SUBMISSION_COLUMNS: &str = "id, form_type, data, status, notes, created_at, updated_at";
const REGISTRATION_COLUMNS: &str = "id, event_id, data, status, notes, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, title, date, time, location, description, category, image_url, \
                             registration_type, registration_url, registration_fields, \
                             max_registrations, created_at, updated_at";

/// List reads against a database that was never initialized come back empty
/// instead of failing.
fn recover_missing_table<T>(
    result: Result<Vec<T>, sqlx::Error>,
    table: &str,
) -> Result<Vec<T>, sqlx::Error> {
    match result {
        Err(sqlx::Error::Database(err)) if err.message().contains("no such table") => {
            tracing::warn!(table, "table missing, returning empty list");
            Ok(Vec::new())
        }
        other => other,
    }
}

fn convert_all<R, T>(records: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = serde_json::Error>,
{
    records
        .into_iter()
        .map(|record| T::try_from(record).map_err(StoreError::from))
        .collect()
}

// Schema store

pub async fn get_schema(
    pool: &SqlitePool,
    form_type: &str,
) -> Result<Option<FormSchema>, StoreError> {
    let record = query_as::<_, FormConfigRecord>(&format!(
        "SELECT {FORM_COLUMNS} FROM form_configs WHERE form_type = ?"
    ))
    .bind(form_type)
    .fetch_optional(pool)
    .await?;

    record.map(FormSchema::try_from).transpose().map_err(Into::into)
}

pub async fn list_schemas(pool: &SqlitePool) -> Result<Vec<FormSchema>, StoreError> {
    let records = recover_missing_table(
        query_as::<_, FormConfigRecord>(&format!(
            "SELECT {FORM_COLUMNS} FROM form_configs ORDER BY form_type"
        ))
        .fetch_all(pool)
        .await,
        "form_configs",
    )?;
    convert_all(records)
}

/// Applies `update` to the stored schema, creating it from defaults when the
/// form type is new. Attributes left out of `update` keep their value.
pub async fn upsert_schema(
    pool: &SqlitePool,
    form_type: &str,
    update: SchemaUpdate,
) -> Result<FormSchema, StoreError> {
    let mut schema = get_schema(pool, form_type)
        .await?
        .unwrap_or_else(|| FormSchema::blank(form_type));
    schema.apply(update);
    let timestamp = now();

    query(
        "INSERT INTO form_configs
            (form_type, title, description, fields, submit_button_text, success_message, enabled, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(form_type) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            fields = excluded.fields,
            submit_button_text = excluded.submit_button_text,
            success_message = excluded.success_message,
            enabled = excluded.enabled,
            updated_at = excluded.updated_at",
    )
    .bind(&schema.form_type)
    .bind(&schema.title)
    .bind(&schema.description)
    .bind(serde_json::to_string(&schema.fields)?)
    .bind(&schema.submit_button_text)
    .bind(&schema.success_message)
    .bind(schema.enabled)
    .bind(&timestamp)
    .execute(pool)
    .await?;

    schema.updated_at = Some(timestamp);
    Ok(schema)
}

// Submission store

pub async fn create_submission(
    pool: &SqlitePool,
    form_type: &str,
    data: &FormData,
) -> Result<i64, StoreError> {
    let timestamp = now();
    let result = query(
        "INSERT INTO form_submissions (form_type, data, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(form_type)
    .bind(serde_json::to_string(data)?)
    .bind(SubmissionStatus::New)
    .bind(&timestamp)
    .bind(&timestamp)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_submission(pool: &SqlitePool, id: i64) -> Result<Option<Submission>, StoreError> {
    let record = query_as::<_, SubmissionRecord>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM form_submissions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    record.map(Submission::try_from).transpose().map_err(Into::into)
}

/// Most recent first, optionally narrowed to one form type.
pub async fn list_submissions(
    pool: &SqlitePool,
    form_type: Option<&str>,
) -> Result<Vec<Submission>, StoreError> {
    let result = match form_type {
        Some(form_type) => {
            query_as::<_, SubmissionRecord>(&format!(
                "SELECT {SUBMISSION_COLUMNS} FROM form_submissions
                 WHERE form_type = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(form_type)
            .fetch_all(pool)
            .await
        }
        None => {
            query_as::<_, SubmissionRecord>(&format!(
                "SELECT {SUBMISSION_COLUMNS} FROM form_submissions ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await
        }
    };
    convert_all(recover_missing_table(result, "form_submissions")?)
}

/// Sets status and/or notes. `None` when the submission does not exist.
pub async fn update_submission(
    pool: &SqlitePool,
    id: i64,
    update: SubmissionUpdate,
) -> Result<Option<Submission>, StoreError> {
    let Some(current) = get_submission(pool, id).await? else {
        return Ok(None);
    };

    query("UPDATE form_submissions SET status = ?, notes = ?, updated_at = ? WHERE id = ?")
        .bind(update.status.unwrap_or(current.status))
        .bind(update.notes.or(current.notes))
        .bind(now())
        .bind(id)
        .execute(pool)
        .await?;

    get_submission(pool, id).await
}

pub async fn delete_submission(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let result = query("DELETE FROM form_submissions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn create_registration(
    pool: &SqlitePool,
    event_id: i64,
    data: &FormData,
) -> Result<i64, StoreError> {
    let timestamp = now();
    let result = query(
        "INSERT INTO event_registrations (event_id, data, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(event_id)
    .bind(serde_json::to_string(data)?)
    .bind(RegistrationStatus::Confirmed)
    .bind(&timestamp)
    .bind(&timestamp)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_registration(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<EventRegistration>, StoreError> {
    let record = query_as::<_, RegistrationRecord>(&format!(
        "SELECT {REGISTRATION_COLUMNS} FROM event_registrations WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    record
        .map(EventRegistration::try_from)
        .transpose()
        .map_err(Into::into)
}

pub async fn list_registrations(
    pool: &SqlitePool,
    event_id: Option<i64>,
) -> Result<Vec<EventRegistration>, StoreError> {
    let result = match event_id {
        Some(event_id) => {
            query_as::<_, RegistrationRecord>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM event_registrations
                 WHERE event_id = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(event_id)
            .fetch_all(pool)
            .await
        }
        None => {
            query_as::<_, RegistrationRecord>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM event_registrations ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await
        }
    };
    convert_all(recover_missing_table(result, "event_registrations")?)
}

pub async fn update_registration(
    pool: &SqlitePool,
    id: i64,
    update: RegistrationUpdate,
) -> Result<Option<EventRegistration>, StoreError> {
    let Some(current) = get_registration(pool, id).await? else {
        return Ok(None);
    };

    query("UPDATE event_registrations SET status = ?, notes = ?, updated_at = ? WHERE id = ?")
        .bind(update.status.unwrap_or(current.status))
        .bind(update.notes.or(current.notes))
        .bind(now())
        .bind(id)
        .execute(pool)
        .await?;

    get_registration(pool, id).await
}

pub async fn delete_registration(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let result = query("DELETE FROM event_registrations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Registrations that hold a spot: everything not cancelled.
pub async fn count_active_registrations(
    pool: &SqlitePool,
    event_id: i64,
) -> Result<i64, StoreError> {
    let count = query_scalar(
        "SELECT COUNT(*) FROM event_registrations WHERE event_id = ? AND status != ?",
    )
    .bind(event_id)
    .bind(RegistrationStatus::Cancelled)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

// Events

/// Ordered by date ascending.
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>, StoreError> {
    let records = recover_missing_table(
        query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, time ASC, id ASC"
        ))
        .fetch_all(pool)
        .await,
        "events",
    )?;
    convert_all(records)
}

pub async fn get_event(pool: &SqlitePool, id: i64) -> Result<Option<Event>, StoreError> {
    let record = query_as::<_, EventRecord>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    record.map(Event::try_from).transpose().map_err(Into::into)
}

fn fields_column(event: &Event) -> Result<Option<String>, serde_json::Error> {
    if event.registration_fields.is_empty() {
        Ok(None)
    } else {
        serde_json::to_string(&event.registration_fields).map(Some)
    }
}

pub async fn create_event(pool: &SqlitePool, input: NewEvent) -> Result<Event, StoreError> {
    let timestamp = now();
    let mut event = Event {
        id: 0,
        title: input.title,
        date: input.date,
        time: input.time,
        location: input.location,
        description: input.description,
        category: input.category,
        image_url: input.image_url.filter(|url| !url.trim().is_empty()),
        registration_type: input.registration_type,
        registration_url: input.registration_url.filter(|url| !url.trim().is_empty()),
        registration_fields: input.registration_fields,
        max_registrations: input.max_registrations.filter(|max| *max > 0),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };

    let result = query(
        "INSERT INTO events
            (title, date, time, location, description, category, image_url, registration_type,
             registration_url, registration_fields, max_registrations, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&event.title)
    .bind(&event.date)
    .bind(&event.time)
    .bind(&event.location)
    .bind(&event.description)
    .bind(event.category)
    .bind(&event.image_url)
    .bind(event.registration_type)
    .bind(&event.registration_url)
    .bind(fields_column(&event)?)
    .bind(event.max_registrations)
    .bind(&event.created_at)
    .bind(&event.updated_at)
    .execute(pool)
    .await?;

    event.id = result.last_insert_rowid();
    Ok(event)
}

/// Partial update; `None` when the event does not exist.
pub async fn update_event(
    pool: &SqlitePool,
    id: i64,
    update: EventUpdate,
) -> Result<Option<Event>, StoreError> {
    let Some(mut event) = get_event(pool, id).await? else {
        return Ok(None);
    };
    event.apply(update);
    event.updated_at = now();

    query(
        "UPDATE events SET
            title = ?, date = ?, time = ?, location = ?, description = ?, category = ?,
            image_url = ?, registration_type = ?, registration_url = ?, registration_fields = ?,
            max_registrations = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&event.title)
    .bind(&event.date)
    .bind(&event.time)
    .bind(&event.location)
    .bind(&event.description)
    .bind(event.category)
    .bind(&event.image_url)
    .bind(event.registration_type)
    .bind(&event.registration_url)
    .bind(fields_column(&event)?)
    .bind(event.max_registrations)
    .bind(&event.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(Some(event))
}

/// Removes the event together with its registrations.
pub async fn delete_event(pool: &SqlitePool, id: i64) -> Result<bool, StoreError> {
    let mut tx = pool.begin().await?;
    query("DELETE FROM event_registrations WHERE event_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

// Settings

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<Setting>, StoreError> {
    let record = query_as::<_, SettingRecord>(
        "SELECT key, value, updated_at FROM settings WHERE key = ?",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(record.map(Setting::from))
}

pub async fn put_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<Setting, StoreError> {
    let timestamp = now();
    query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(&timestamp)
    .execute(pool)
    .await?;

    Ok(Setting {
        key: key.to_string(),
        value: value.to_string(),
        updated_at: Some(timestamp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use adapt_forms::{FieldType, FormField, RegistrationType};
    use pretty_assertions::assert_eq;

    fn data(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn new_event(title: &str, date: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            date: date.to_string(),
            time: "10:00 AM".to_string(),
            location: "Rec Center".to_string(),
            description: "Open session".to_string(),
            registration_type: RegistrationType::Internal,
            ..NewEvent::default()
        }
    }

    #[tokio::test]
    async fn seeded_contact_schema_is_readable() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;

        let schema = get_schema(&pool, "contact").await?.ok_or("missing")?;
        assert!(schema.enabled);
        assert!(schema.field("email").is_some());
        assert!(get_schema(&pool, "nope").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn upsert_changes_only_supplied_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let before = get_schema(&pool, "volunteer").await?.ok_or("missing")?;

        let after = upsert_schema(
            &pool,
            "volunteer",
            SchemaUpdate {
                enabled: Some(false),
                ..SchemaUpdate::default()
            },
        )
        .await?;

        assert!(!after.enabled);
        assert_eq!(after.title, before.title);
        assert_eq!(after.fields, before.fields);
        assert_eq!(after.success_message, before.success_message);

        let stored = get_schema(&pool, "volunteer").await?.ok_or("missing")?;
        assert!(!stored.enabled);
        assert_eq!(stored.fields, before.fields);

        Ok(())
    }

    #[tokio::test]
    async fn upsert_creates_unknown_form_types() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;

        let created = upsert_schema(
            &pool,
            "newsletter",
            SchemaUpdate {
                fields: Some(vec![FormField::new("email", FieldType::Email, "Email").required()]),
                ..SchemaUpdate::default()
            },
        )
        .await?;

        assert_eq!(created.title, "newsletter");
        assert_eq!(created.submit_button_text, "Submit");
        assert!(created.enabled);
        assert_eq!(list_schemas(&pool).await?.len(), 7);

        Ok(())
    }

    #[tokio::test]
    async fn submissions_list_most_recent_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let first = create_submission(&pool, "contact", &data(&[("name", "A")])).await?;
        let second = create_submission(&pool, "volunteer", &data(&[("name", "B")])).await?;
        let third = create_submission(&pool, "contact", &data(&[("name", "C")])).await?;

        let all: Vec<i64> = list_submissions(&pool, None)
            .await?
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec![third, second, first]);

        let contact = list_submissions(&pool, Some("contact")).await?;
        assert_eq!(contact.len(), 2);
        assert!(contact.iter().all(|s| s.status == SubmissionStatus::New));

        Ok(())
    }

    #[tokio::test]
    async fn triage_update_is_partial() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let id = create_submission(&pool, "contact", &data(&[("name", "A")])).await?;

        let updated = update_submission(
            &pool,
            id,
            SubmissionUpdate {
                status: Some(SubmissionStatus::Read),
                notes: None,
            },
        )
        .await?
        .ok_or("missing")?;
        assert_eq!(updated.status, SubmissionStatus::Read);
        assert_eq!(updated.notes, None);

        let noted = update_submission(
            &pool,
            id,
            SubmissionUpdate {
                status: None,
                notes: Some("called back".to_string()),
            },
        )
        .await?
        .ok_or("missing")?;
        assert_eq!(noted.status, SubmissionStatus::Read);
        assert_eq!(noted.notes.as_deref(), Some("called back"));

        assert!(update_submission(&pool, 999, SubmissionUpdate::default())
            .await?
            .is_none());
        assert!(delete_submission(&pool, id).await?);
        assert!(!delete_submission(&pool, id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_registrations_free_their_spot() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let event = create_event(&pool, new_event("Swim", "2025-03-01")).await?;
        let a = create_registration(&pool, event.id, &data(&[("name", "A")])).await?;
        create_registration(&pool, event.id, &data(&[("name", "B")])).await?;
        assert_eq!(count_active_registrations(&pool, event.id).await?, 2);

        update_registration(
            &pool,
            a,
            RegistrationUpdate {
                status: Some(RegistrationStatus::Cancelled),
                notes: None,
            },
        )
        .await?;
        assert_eq!(count_active_registrations(&pool, event.id).await?, 1);
        assert_eq!(list_registrations(&pool, Some(event.id)).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn events_are_ordered_by_date_and_update_partially(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let late = create_event(&pool, new_event("Late", "2025-06-01")).await?;
        let early = create_event(&pool, new_event("Early", "2025-01-01")).await?;

        let titles: Vec<String> = list_events(&pool).await?.into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Early".to_string(), "Late".to_string()]);

        let updated = update_event(
            &pool,
            late.id,
            EventUpdate {
                max_registrations: Some(5),
                ..EventUpdate::default()
            },
        )
        .await?
        .ok_or("missing")?;
        assert_eq!(updated.max_registrations, Some(5));
        assert_eq!(updated.title, "Late");

        create_registration(&pool, early.id, &data(&[("name", "A")])).await?;
        assert!(delete_event(&pool, early.id).await?);
        assert!(get_event(&pool, early.id).await?.is_none());
        assert!(list_registrations(&pool, Some(early.id)).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn registration_fields_round_trip_through_storage(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let mut input = new_event("Clinic", "2025-04-01");
        input.registration_fields = vec![
            FormField::new("name", FieldType::Text, "Name").required(),
            FormField::new("chair", FieldType::Select, "Chair size").options(&["S", "M", "L"]),
        ];
        let created = create_event(&pool, input).await?;

        let stored = get_event(&pool, created.id).await?.ok_or("missing")?;
        assert_eq!(stored.registration_fields, created.registration_fields);

        Ok(())
    }

    #[tokio::test]
    async fn lists_recover_when_tables_are_missing() -> Result<(), Box<dyn std::error::Error>> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        assert!(list_submissions(&pool, None).await?.is_empty());
        assert!(list_events(&pool).await?.is_empty());
        assert!(list_schemas(&pool).await?.is_empty());
        assert!(list_registrations(&pool, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn settings_upsert() -> Result<(), Box<dyn std::error::Error>> {
        let pool = create_memory_pool().await?;
        let seeded = get_setting(&pool, "donation_url").await?.ok_or("missing")?;
        assert_eq!(seeded.value, "");

        put_setting(&pool, "donation_url", "https://give.example.org").await?;
        let stored = get_setting(&pool, "donation_url").await?.ok_or("missing")?;
        assert_eq!(stored.value, "https://give.example.org");

        Ok(())
    }
}
