//! Network and file work queued by the input layer as a [`PendingAction`].

use std::fs;
use std::path::{Path, PathBuf};

use adapt_forms::export::to_csv;
use adapt_forms::{FormSchema, RegistrationUpdate, SchemaUpdate, Setting, SubmissionUpdate};
use chrono::Local;
use color_eyre::eyre::{eyre, Result};

use crate::app::editor::{EditorSave, EditorState, DONATION_URL_KEY};
use crate::app::state::{App, AppScreen, PendingAction};
use crate::client::ApiClient;
use crate::form::{FormEvent, FormPhase, FormTarget};

pub async fn perform(app: &mut App, action: PendingAction) -> Result<()> {
    let client = app.client.clone();

    match action {
        PendingAction::LoadForm => load_form(app, &client).await,
        PendingAction::SubmitForm => submit_form(app, &client).await,
        PendingAction::LoadEvents => {
            app.events = client.list_events().await?;
            app.status_message = format!("{} upcoming events", app.events.len());
        }
        PendingAction::LoadSchemas => {
            app.schemas = client.list_schemas().await?;
            app.form_types = app
                .schemas
                .iter()
                .filter(|schema| schema.enabled)
                .map(|schema| schema.form_type.clone())
                .collect();
            app.status_message = format!("{} form schemas", app.schemas.len());
        }
        PendingAction::LoadSubmissions => {
            app.submissions = client
                .list_submissions(app.submission_filter.as_deref())
                .await?;
            app.status_message = format!("{} submissions", app.submissions.len());
        }
        PendingAction::LoadRegistrations => {
            if app.events.is_empty() {
                // Titles only; the table still works without them.
                match client.list_events().await {
                    Ok(events) => app.events = events,
                    Err(error) => tracing::warn!(%error, "could not load event titles"),
                }
            }
            app.registrations = client.list_registrations(app.registration_event).await?;
            app.status_message = format!("{} registrations", app.registrations.len());
        }
        PendingAction::CycleSubmissionStatus => {
            let Some(current) = app.selected_submission() else {
                return Ok(());
            };
            let (id, status) = (current.id, current.status.next());
            let update = SubmissionUpdate {
                status: Some(status),
                notes: None,
            };
            let updated = client.update_submission(id, &update).await?;
            replace_by_id(&mut app.submissions, updated, |s| s.id);
            app.status_message = format!("Submission #{id} marked {}", status.label());
        }
        PendingAction::SaveSubmissionNotes => {
            let Some(id) = app.selected_submission().map(|s| s.id) else {
                return Ok(());
            };
            let notes = app.notes_input.take().unwrap_or_default();
            let update = SubmissionUpdate {
                status: None,
                notes: Some(notes),
            };
            let updated = client.update_submission(id, &update).await?;
            replace_by_id(&mut app.submissions, updated, |s| s.id);
            app.status_message = format!("Notes saved for submission #{id}");
        }
        PendingAction::DeleteSubmission => {
            let Some(id) = app.selected_submission().map(|s| s.id) else {
                return Ok(());
            };
            client.delete_submission(id).await?;
            app.submissions.retain(|s| s.id != id);
            if app.screen == AppScreen::SubmissionDetail {
                app.screen = AppScreen::Submissions;
            }
            app.status_message = format!("Submission #{id} deleted");
        }
        PendingAction::CycleRegistrationStatus => {
            let Some(current) = app.selected_registration() else {
                return Ok(());
            };
            let (id, status) = (current.id, current.status.next());
            let update = RegistrationUpdate {
                status: Some(status),
                notes: None,
            };
            let updated = client.update_registration(id, &update).await?;
            replace_by_id(&mut app.registrations, updated, |r| r.id);
            app.status_message = format!("Registration #{id} marked {}", status.label());
        }
        PendingAction::DeleteRegistration => {
            let Some(id) = app.selected_registration().map(|r| r.id) else {
                return Ok(());
            };
            client.delete_registration(id).await?;
            app.registrations.retain(|r| r.id != id);
            app.status_message = format!("Registration #{id} deleted");
        }
        PendingAction::ToggleSchema => {
            let Some(schema) = app.selected_schema() else {
                return Ok(());
            };
            let form_type = schema.form_type.clone();
            let update = SchemaUpdate {
                enabled: Some(!schema.enabled),
                ..SchemaUpdate::default()
            };
            let updated = client.upsert_schema(&form_type, &update).await?;
            let state = if updated.enabled { "enabled" } else { "disabled" };
            replace_by_key(&mut app.schemas, updated);
            app.status_message = format!("Form {form_type} {state}");
        }
        PendingAction::ExportSubmissions => {
            let rows: Vec<_> = app
                .visible_submissions()
                .into_iter()
                .filter_map(|index| app.submissions.get(index).cloned())
                .collect();
            let path = write_export(&app.config.export_dir, "submissions", &to_csv(&rows))?;
            app.status_message = format!("Exported {} rows to {}", rows.len(), path.display());
        }
        PendingAction::ExportRegistrations => {
            let path = write_export(
                &app.config.export_dir,
                "registrations",
                &to_csv(&app.registrations),
            )?;
            app.status_message = format!(
                "Exported {} rows to {}",
                app.registrations.len(),
                path.display()
            );
        }
        PendingAction::SaveEditor => save_editor(app, &client).await?,
        PendingAction::DeleteEvent => {
            let Some(id) = app.selected_event().map(|e| e.id) else {
                return Ok(());
            };
            client.delete_event(id).await?;
            app.events.retain(|e| e.id != id);
            app.status_message = format!("Event #{id} deleted");
        }
        PendingAction::EditDonationUrl => {
            let setting = match client.get_setting(DONATION_URL_KEY).await {
                Ok(setting) => setting,
                Err(error) if error.status() == Some(404) => Setting {
                    key: DONATION_URL_KEY.to_string(),
                    value: String::new(),
                    updated_at: None,
                },
                Err(error) => return Err(error.into()),
            };
            app.open_editor(EditorState::for_setting(&setting), AppScreen::Home);
        }
        PendingAction::InitializeDatabase => {
            let report = client.initialize().await?;
            app.status_message = format!(
                "Database initialized, {} default rows added",
                report.seeded
            );
        }
    }

    app.clamp_selections();
    Ok(())
}

/// Sends the open editor's contents. On failure the editor stays open so the
/// edit is not lost.
async fn save_editor(app: &mut App, client: &ApiClient) -> Result<()> {
    let Some(editor) = app.editor.as_ref() else {
        return Ok(());
    };
    let request = match editor.save_request() {
        Ok(request) => request,
        Err(message) => {
            app.status_message = message;
            return Ok(());
        }
    };

    app.status_message = match request {
        EditorSave::CreateEvent(event) => {
            let created = client.create_event(&event).await?;
            tracing::info!(id = created.id, "event created");
            app.events = client.list_events().await?;
            if let Some(index) = app.events.iter().position(|e| e.id == created.id) {
                app.events_index = index;
            }
            format!("Event \"{}\" created", created.title)
        }
        EditorSave::UpdateEvent(id, update) => {
            let updated = client.update_event(id, &update).await?;
            let title = updated.title.clone();
            replace_by_id(&mut app.events, updated, |e| e.id);
            format!("Event \"{title}\" saved")
        }
        EditorSave::UpdateSchema(form_type, update) => {
            let updated = client.upsert_schema(&form_type, &update).await?;
            replace_by_key(&mut app.schemas, updated);
            format!("Form {form_type} saved")
        }
        EditorSave::PutSetting(key, value) => {
            client.put_setting(&key, &value).await?;
            format!("Setting {key} saved")
        }
        EditorSave::RegistrationNotes(id, update) => {
            let updated = client.update_registration(id, &update).await?;
            replace_by_id(&mut app.registrations, updated, |r| r.id);
            format!("Notes saved for registration #{id}")
        }
    };
    app.close_editor();
    Ok(())
}

async fn load_form(app: &mut App, client: &ApiClient) {
    let Some(target) = app.form.as_ref().map(|session| session.target().clone()) else {
        return;
    };
    let event = match fetch_form(client, &target).await {
        Ok((schema, spots_left)) => FormEvent::Loaded { schema, spots_left },
        Err(error) => {
            tracing::warn!(%error, form = %target, "form load failed");
            FormEvent::LoadFailed(error.to_string())
        }
    };
    apply_form_event(app, event);
}

/// Schema for the target plus, for capped events, the spots still open.
async fn fetch_form(client: &ApiClient, target: &FormTarget) -> Result<(FormSchema, Option<i64>)> {
    match target {
        FormTarget::Form(form_type) => Ok((client.get_form(form_type).await?, None)),
        FormTarget::Event(id) => {
            let event = client.get_event(*id).await?;
            let registration = event
                .registration_schema()
                .ok_or_else(|| eyre!("This event does not accept online registrations"))?;
            let spots_left = match registration.max_registrations {
                Some(max) => Some((max - client.registration_count(*id).await?).max(0)),
                None => None,
            };
            Ok((registration.schema, spots_left))
        }
    }
}

async fn submit_form(app: &mut App, client: &ApiClient) {
    let Some(session) = app.form.as_ref() else {
        return;
    };
    if session.phase() != FormPhase::Submitting {
        return;
    }
    let request = session.submit_request();
    let target = session.target().clone();

    let result = match &target {
        FormTarget::Form(form_type) => client.submit_form(form_type, &request).await,
        FormTarget::Event(id) => client.register(*id, &request).await,
    };
    let event = match result {
        Ok(receipt) => {
            tracing::info!(form = %target, reference = receipt.submission_id, "form submitted");
            FormEvent::Accepted(receipt)
        }
        Err(error) if error.is_network() => {
            tracing::warn!(%error, form = %target, "submit failed");
            FormEvent::NetworkFailed
        }
        Err(error) => FormEvent::Rejected {
            message: error.to_string(),
            field_errors: error.field_errors().to_vec(),
        },
    };
    apply_form_event(app, event);
}

fn apply_form_event(app: &mut App, event: FormEvent) {
    if let Some(session) = app.form.as_mut() {
        if let Err(error) = session.process(event) {
            tracing::warn!(%error, "ignored form event");
        }
    }
}

fn replace_by_id<T, F>(items: &mut [T], updated: T, id: F)
where
    F: Fn(&T) -> i64,
{
    let target = id(&updated);
    if let Some(slot) = items.iter_mut().find(|item| id(item) == target) {
        *slot = updated;
    }
}

fn replace_by_key(schemas: &mut [FormSchema], updated: FormSchema) {
    if let Some(slot) = schemas
        .iter_mut()
        .find(|schema| schema.form_type == updated.form_type)
    {
        *slot = updated;
    }
}

/// Writes `csv` under `dir` as `<kind>-<timestamp>.csv`.
pub fn write_export(dir: &Path, kind: &str, csv: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{kind}-{stamp}.csv"));
    fs::write(&path, csv)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;

    #[test]
    fn export_lands_in_the_configured_directory() {
        let dir = std::env::temp_dir().join(format!("adapt-export-{}", std::process::id()));
        let path = write_export(&dir, "submissions", "id\r\n1\r\n").unwrap();

        assert!(path.starts_with(&dir));
        assert!(path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("submissions-") && name.ends_with(".csv")));
        assert_eq!(fs::read_to_string(&path).unwrap(), "id\r\n1\r\n");
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn submit_is_a_no_op_unless_submitting() {
        let mut app = test_app(None);
        app.open_form(FormTarget::Form("contact".to_string()), AppScreen::Forms);
        let client = app.client.clone();

        submit_form(&mut app, &client).await;

        let session = app.form.as_ref().unwrap();
        assert_eq!(session.phase(), FormPhase::Loading);
    }

    #[tokio::test]
    async fn incomplete_event_is_not_sent() {
        let mut app = test_app(Some("secret"));
        app.open_editor(EditorState::for_new_event(), AppScreen::Events);

        perform(&mut app, PendingAction::SaveEditor).await.unwrap();

        assert_eq!(app.screen, AppScreen::Editor);
        assert!(app.status_message.starts_with("Missing required fields"));
    }

    #[tokio::test]
    async fn failed_save_keeps_the_editor_open() {
        let mut app = test_app(Some("secret"));
        let setting = Setting {
            key: DONATION_URL_KEY.to_string(),
            value: "https://give.example".to_string(),
            updated_at: None,
        };
        app.open_editor(EditorState::for_setting(&setting), AppScreen::Home);

        let result = perform(&mut app, PendingAction::SaveEditor).await;

        assert!(result.is_err());
        assert_eq!(app.screen, AppScreen::Editor);
        assert!(app.editor.is_some());
    }

    #[tokio::test]
    async fn unreachable_service_fails_the_load() {
        let mut app = test_app(None);
        app.open_form(FormTarget::Form("contact".to_string()), AppScreen::Forms);

        perform(&mut app, PendingAction::LoadForm).await.unwrap();

        let session = app.form.as_ref().unwrap();
        assert_eq!(session.phase(), FormPhase::LoadFailed);
        assert_eq!(session.banner(), Some(crate::form::session::LOAD_FAILED));
    }
}
