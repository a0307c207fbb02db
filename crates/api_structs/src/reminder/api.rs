use crate::dtos::ReminderDTO;
use aviso_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub category: String,
        pub title: String,
        pub description: Option<String>,
        /// Defaults to the current time when omitted
        pub due_at: Option<i64>,
        pub frequency: Option<String>,
        pub interval_minutes: Option<i64>,
        pub dose: Option<String>,
        pub dose_unit: Option<String>,
        pub doses_left: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_user_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub category: Option<String>,
        pub title: Option<String>,
        pub description: Option<String>,
        pub due_at: Option<i64>,
        pub frequency: Option<String>,
        pub interval_minutes: Option<i64>,
        pub dose: Option<String>,
        pub dose_unit: Option<String>,
        pub doses_left: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod set_reminder_completed {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub completed: bool,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod process_due_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of reminders delivered in this window
        pub sent: usize,
    }

    impl APIResponse {
        pub fn new(sent: usize) -> Self {
            Self { sent }
        }
    }
}
