use anyhow::Context;
use aviso_domain::Reminder;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Structured payload handed to the mail relay for one reminder occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEmail {
    pub to: String,
    pub subject: String,
    pub recipient_name: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: i64,
    pub dose: Option<String>,
    pub dose_unit: Option<String>,
    pub doses_left: i64,
}

impl ReminderEmail {
    pub fn new(to: String, reminder: &Reminder) -> Self {
        Self {
            to,
            subject: format!("Reminder: {}", reminder.title),
            recipient_name: reminder.recipient_name.clone(),
            category: reminder.category.clone(),
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            due_at: reminder.due_at,
            dose: reminder.dose.clone(),
            dose_unit: reminder.dose_unit.clone(),
            doses_left: reminder.doses_left,
        }
    }
}

/// Notification gateway. Takes a recipient and a structured payload,
/// delivery mechanics live behind it.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()>;
}

/// Delivers reminder emails by posting them to the configured mail relay
/// endpoint.
pub struct MailRelayService {
    client: Client,
    url: String,
    api_key: String,
}

impl MailRelayService {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl IMailer for MailRelayService {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .header("aviso-mailer-key", &self.api_key)
            .json(email)
            .send()
            .await
            .context("Mail relay request failed")?
            .error_for_status()
            .context("Mail relay rejected the email")?;
        Ok(())
    }
}

/// Records emails instead of delivering them. Used by tests, which can also
/// make it fail on demand to exercise the delivery failure path.
pub struct InMemoryMailer {
    sent: Mutex<Vec<ReminderEmail>>,
    failing: AtomicBool,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn outbox(&self) -> Vec<ReminderEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("Mailer is configured to fail");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
