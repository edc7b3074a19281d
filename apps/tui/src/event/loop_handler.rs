use std::collections::BTreeMap;
use std::time::Duration;

use adapt_forms::export::to_csv;
use adapt_forms::{Event as CalendarEvent, Submission};
use color_eyre::eyre::{eyre, Result};
use crossterm::event::{self, Event, KeyEventKind};
use serde::Serialize;

use crate::app::{actions, handle_input, App, PendingAction};
use crate::cli::{CliArgs, ExportKind};
use crate::client::{ApiClient, ClientError};
use crate::terminal::Tui;
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);
const RECENT_LIMIT: usize = 5;

/// Run the main application event loop
pub async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal
            .draw(|f| ui::ui(app, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        // The frame above already shows "Working..." for a queued action.
        if let Some(action) = app.pending {
            if let Err(error) = actions::perform(app, action).await {
                report_action_error(app, action, &error);
            }
            app.pending = None;
            continue;
        }

        if !matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            continue;
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => handle_input(app, key.code),
            Ok(Event::Resize(_, _)) => {
                if terminal.draw(|f| ui::ui(app, f)).is_err() {
                    // Non-fatal; the next iteration redraws.
                }
            }
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "failed to read terminal event"),
        }
    }
    Ok(())
}

fn report_action_error(app: &mut App, action: PendingAction, error: &color_eyre::Report) {
    tracing::error!(?action, error = %error, "action failed");
    let unauthorized = error
        .downcast_ref::<ClientError>()
        .is_some_and(ClientError::is_unauthorized);
    app.status_message = if unauthorized {
        "Admin token rejected; check ADMIN_TOKEN or --token".to_string()
    } else {
        format!("Error: {error}")
    };
}

/// Run without a UI: CSV export to stdout, or submission stats.
pub async fn run_headless(client: &ApiClient, args: &CliArgs) -> Result<()> {
    match args.export {
        Some(ExportKind::Submissions) => {
            let rows = client.list_submissions(args.form_type.as_deref()).await?;
            print!("{}", to_csv(&rows));
        }
        Some(ExportKind::Registrations) => {
            let rows = client.list_registrations(args.event_id).await?;
            print!("{}", to_csv(&rows));
        }
        None => {
            let events = client.list_events().await?;
            let submissions = if client.has_token() {
                Some(client.list_submissions(None).await?)
            } else {
                None
            };
            let stats = build_headless_stats(&events, submissions.as_deref());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                render_headless_stats(&stats);
            }
        }
    }
    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nAdapt Forms Stats");
    println!("=================");
    println!("Upcoming events: {}", stats.upcoming_events);
    println!("Events taking registrations: {}", stats.open_registrations);

    let Some(submissions) = &stats.submissions else {
        println!("\n(Set ADMIN_TOKEN to include submission stats.)");
        return;
    };

    println!("Total submissions: {}", submissions.total);

    println!("\nSubmissions by Form:");
    for (form_type, count) in &submissions.by_form_type {
        println!("- {form_type}: {count}");
    }

    println!("\nSubmissions by Status:");
    for (status, count) in &submissions.by_status {
        println!("- {status}: {count}");
    }

    println!("\nRecent Submissions:");
    for recent in &submissions.recent {
        println!(
            "- #{} | {} | {} | {}",
            recent.id, recent.form_type, recent.status, recent.created_at
        );
    }
}

fn build_headless_stats(
    events: &[CalendarEvent],
    submissions: Option<&[Submission]>,
) -> HeadlessStats {
    let submissions = submissions.map(|submissions| {
        let mut by_form_type: BTreeMap<String, i64> = BTreeMap::new();
        let mut by_status: BTreeMap<String, i64> = BTreeMap::new();
        for submission in submissions {
            *by_form_type.entry(submission.form_type.clone()).or_default() += 1;
            *by_status
                .entry(submission.status.as_str().to_string())
                .or_default() += 1;
        }

        // Lists come back newest first.
        let recent = submissions
            .iter()
            .take(RECENT_LIMIT)
            .map(|submission| HeadlessSubmission {
                id: submission.id,
                form_type: submission.form_type.clone(),
                status: submission.status.as_str().to_string(),
                created_at: submission.created_at.clone(),
            })
            .collect();

        SubmissionStats {
            total: submissions.len(),
            by_form_type: by_form_type.into_iter().collect(),
            by_status: by_status.into_iter().collect(),
            recent,
        }
    });

    HeadlessStats {
        upcoming_events: events.len(),
        open_registrations: events
            .iter()
            .filter(|event| event.accepts_registrations())
            .count(),
        submissions,
    }
}

#[derive(Debug, Serialize)]
struct HeadlessStats {
    upcoming_events: usize,
    open_registrations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    submissions: Option<SubmissionStats>,
}

#[derive(Debug, Serialize)]
struct SubmissionStats {
    total: usize,
    by_form_type: Vec<(String, i64)>,
    by_status: Vec<(String, i64)>,
    recent: Vec<HeadlessSubmission>,
}

#[derive(Debug, Serialize)]
struct HeadlessSubmission {
    id: i64,
    form_type: String,
    status: String,
    created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapt_forms::{FormData, SubmissionStatus};
    use pretty_assertions::assert_eq;

    fn submission(id: i64, form_type: &str, status: SubmissionStatus) -> Submission {
        Submission {
            id,
            form_type: form_type.to_string(),
            data: FormData::new(),
            status,
            notes: None,
            created_at: format!("2026-10-0{id}T09:00:00.000Z"),
            updated_at: String::new(),
        }
    }

    #[test]
    fn stats_group_by_form_and_status() {
        let submissions = vec![
            submission(3, "contact", SubmissionStatus::New),
            submission(2, "volunteer", SubmissionStatus::Read),
            submission(1, "contact", SubmissionStatus::New),
        ];

        let stats = build_headless_stats(&[], Some(&submissions));
        let submissions = stats.submissions.unwrap();

        assert_eq!(submissions.total, 3);
        assert_eq!(
            submissions.by_form_type,
            vec![("contact".to_string(), 2), ("volunteer".to_string(), 1)]
        );
        assert_eq!(
            submissions.by_status,
            vec![("new".to_string(), 2), ("read".to_string(), 1)]
        );
        assert_eq!(submissions.recent.first().map(|r| r.id), Some(3));
    }

    #[test]
    fn public_stats_omit_submissions() {
        let stats = build_headless_stats(&[], None);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("submissions").is_none());
        assert_eq!(json["upcoming_events"], 0);
    }
}
