use crate::shared::entity::{Entity, ID};

/// A one-shot durable job that delivers one `Reminder` occurrence at
/// `run_at`. Every pending occurrence has exactly one job; the job is
/// removed when it runs and a new one is scheduled if the reminder
/// advances.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    pub id: ID,
    pub reminder_id: ID,
    /// Delivery time in unix millis, notification lead already applied
    pub run_at: i64,
}

impl ScheduledJob {
    pub fn new(reminder_id: ID, run_at: i64) -> Self {
        Self {
            id: Default::default(),
            reminder_id,
            run_at,
        }
    }
}

impl Entity for ScheduledJob {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
