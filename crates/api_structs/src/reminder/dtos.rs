use aviso_domain::Reminder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: i64,
    pub frequency: Option<String>,
    pub interval_minutes: Option<i64>,
    pub dose: Option<String>,
    pub dose_unit: Option<String>,
    pub doses_left: i64,
    pub recipient_name: String,
    pub completed: bool,
    pub sent: bool,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.as_string(),
            user_id: reminder.user_id.as_string(),
            category: reminder.category,
            title: reminder.title,
            description: reminder.description,
            due_at: reminder.due_at,
            frequency: reminder.frequency,
            interval_minutes: reminder.interval_minutes,
            dose: reminder.dose,
            dose_unit: reminder.dose_unit,
            doses_left: reminder.doses_left,
            recipient_name: reminder.recipient_name,
            completed: reminder.completed,
            sent: reminder.sent,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}
