//! Best-effort mail sent after a submission or registration is stored.
//!
//! Nothing here can fail a request: dispatch runs on a detached task and
//! every error ends up in the log.

use std::fmt::Write as _;
use std::sync::Arc;

use adapt_forms::validation::is_valid_email;
use adapt_forms::FormData;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::MailConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMail {
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError>;
}

/// Posts messages to the Resend HTTP API.
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl ResendTransport {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    #[serde(flatten)]
    mail: &'a OutboundMail,
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&ResendPayload {
                from: &self.from,
                mail,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// What was stored, enough to describe it in mail.
#[derive(Debug, Clone)]
pub struct Notice {
    pub form_type: String,
    /// Human name of the form or event.
    pub title: String,
    pub reference: i64,
    pub data: FormData,
    /// Text shown to the submitter on success.
    pub success_message: String,
}

#[derive(Clone)]
pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
    admin_recipients: Vec<String>,
    site_url: String,
}

impl Notifier {
    pub fn disabled() -> Self {
        Self {
            transport: None,
            admin_recipients: Vec::new(),
            site_url: String::new(),
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        let transport = config.api_key.clone().map(|key| {
            Arc::new(ResendTransport::new(key, config.from.clone())) as Arc<dyn MailTransport>
        });
        if transport.is_none() {
            tracing::info!("RESEND_API_KEY not set, notification mail is disabled");
        }
        Self {
            transport,
            admin_recipients: config.admin_recipients.clone(),
            site_url: config.site_url.clone(),
        }
    }

    pub fn with_transport(transport: Arc<dyn MailTransport>, admin_recipients: Vec<String>) -> Self {
        Self {
            transport: Some(transport),
            admin_recipients,
            site_url: crate::config::DEFAULT_SITE_URL.to_string(),
        }
    }

    /// Sends the admin alert and submitter confirmation on a detached task.
    ///
    /// The returned handle only matters to tests; request handlers drop it.
    pub fn dispatch(&self, notice: Notice) -> JoinHandle<()> {
        let mut outbox = Vec::new();
        if !self.admin_recipients.is_empty() {
            outbox.push(admin_mail(&notice, &self.admin_recipients));
        }
        if let Some(mail) = confirmation_mail(&notice, &self.site_url) {
            outbox.push(mail);
        }

        let transport = self.transport.clone();
        tokio::spawn(async move {
            let Some(transport) = transport else {
                tracing::debug!(reference = notice.reference, "mail not configured, skipping");
                return;
            };
            for mail in outbox {
                match transport.send(&mail).await {
                    Ok(()) => tracing::info!(
                        reference = notice.reference,
                        subject = %mail.subject,
                        "notification sent"
                    ),
                    Err(err) => tracing::warn!(
                        reference = notice.reference,
                        error = %err,
                        "notification failed"
                    ),
                }
            }
        })
    }
}

fn submitter_name(data: &FormData) -> Option<&str> {
    ["name", "contact_name", "referrer_name"]
        .iter()
        .find_map(|key| data.get(*key))
        .map(String::as_str)
        .filter(|name| !name.trim().is_empty())
}

/// `estimated_cost` reads as `Estimated Cost`.
fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn admin_mail(notice: &Notice, recipients: &[String]) -> OutboundMail {
    let who = submitter_name(&notice.data).unwrap_or("Unknown");
    let email = notice.data.get("email").filter(|e| is_valid_email(e));

    let mut text = format!(
        "New {} submission #{} from {} ({}).\n\n",
        notice.title,
        notice.reference,
        who,
        email.map_or("no email provided", String::as_str)
    );
    for (key, value) in &notice.data {
        let _ = writeln!(text, "{}: {}", humanize(key), value);
    }

    OutboundMail {
        to: recipients.to_vec(),
        subject: format!("New {} Submission from {}", notice.title, who),
        text,
        reply_to: email.cloned(),
    }
}

/// Confirmation to the submitter, when the record carries a usable address.
pub fn confirmation_mail(notice: &Notice, site_url: &str) -> Option<OutboundMail> {
    let email = notice.data.get("email").filter(|e| is_valid_email(e))?;
    let name = submitter_name(&notice.data).unwrap_or("there");

    let text = format!(
        "Hi {name},\n\n{}\n\nWhat's next?\n{}\n\nYour reference number is #{}. Please keep it for your records.\n\nQuestions? Reply to this email or visit {site_url}.\n",
        notice.success_message,
        next_steps(&notice.form_type),
        notice.reference,
    );

    Some(OutboundMail {
        to: vec![email.clone()],
        subject: format!("Thank you for contacting us: {}", notice.title),
        text,
        reply_to: None,
    })
}

pub fn next_steps(form_type: &str) -> &'static str {
    match form_type {
        "contact" => "Our team will review your message and get back to you within 2 business days.",
        "volunteer" => "We'll review your application and reach out to discuss next steps.",
        "corporate_sponsorship" => "A member of our partnerships team will contact you within 2 business days to discuss sponsorship opportunities.",
        "equipment_donation" => "We'll review your donation and contact you to arrange pickup or drop-off.",
        "grant_application" => "Our grants committee reviews applications monthly and will contact you with a decision.",
        "patient_referral" => "We'll reach out to the patient within one week.",
        "event_registration" => "We'll send a reminder before the event. Reply to this email if your plans change.",
        _ => "We'll be in touch soon!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        async fn send(&self, _mail: &OutboundMail) -> Result<(), MailError> {
            Err(MailError::Rejected {
                status: 500,
                body: "down".to_string(),
            })
        }
    }

    fn notice(pairs: &[(&str, &str)]) -> Notice {
        Notice {
            form_type: "contact".to_string(),
            title: "Contact Us".to_string(),
            reference: 42,
            data: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            success_message: "Thanks!".to_string(),
        }
    }

    #[tokio::test]
    async fn dispatch_sends_admin_and_confirmation() -> Result<(), Box<dyn std::error::Error>> {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::with_transport(transport.clone(), vec!["staff@x.org".to_string()]);

        notifier
            .dispatch(notice(&[("name", "Ann"), ("email", "ann@x.org")]))
            .await?;

        let sent = transport.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["staff@x.org".to_string()]);
        assert_eq!(sent[0].subject, "New Contact Us Submission from Ann");
        assert_eq!(sent[0].reply_to.as_deref(), Some("ann@x.org"));
        assert_eq!(sent[1].to, vec!["ann@x.org".to_string()]);
        assert!(sent[1].text.contains("#42"));
        Ok(())
    }

    #[tokio::test]
    async fn no_confirmation_without_an_email() -> Result<(), Box<dyn std::error::Error>> {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::with_transport(transport.clone(), Vec::new());

        notifier.dispatch(notice(&[("name", "Ann")])).await?;

        assert!(transport.sent.lock().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn transport_failures_stay_inside_the_task() {
        let notifier =
            Notifier::with_transport(Arc::new(FailingTransport), vec!["staff@x.org".to_string()]);
        let outcome = notifier.dispatch(notice(&[("email", "ann@x.org")])).await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn disabled_notifier_is_a_no_op() {
        let outcome = Notifier::disabled()
            .dispatch(notice(&[("email", "ann@x.org")]))
            .await;
        assert!(outcome.is_ok());
    }

    #[test]
    fn keys_are_humanized_for_admins() {
        assert_eq!(humanize("estimated_cost"), "Estimated Cost");
        assert_eq!(humanize("email"), "Email");
        let mail = admin_mail(&notice(&[("patient_name", "Bo")]), &["a@x.org".to_string()]);
        assert!(mail.text.contains("Patient Name: Bo"));
        assert!(mail.subject.ends_with("from Unknown"));
    }
}
