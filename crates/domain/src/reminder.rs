use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Check-up reminders notify ahead of the stored due time so that the
/// recipient can actually make the appointment.
pub const CONTROL_CATEGORY: &str = "control";
pub const CONTROL_LEAD_TIME_MILLIS: i64 = 60 * 60 * 1000;

/// A timed reminder owned by a `User`. `due_at` always holds the next
/// pending occurrence; the engine advances it after each delivery until the
/// doses run out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    pub user_id: ID,
    /// Free-form category. `"control"` gets a one hour notification lead,
    /// everything else fires at `due_at`.
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    /// Next pending occurrence in unix millis. Past occurrences are never
    /// reused.
    pub due_at: i64,
    /// Recurrence descriptor for display purposes
    pub frequency: Option<String>,
    /// Gap between occurrences while doses remain
    pub interval_minutes: Option<i64>,
    pub dose: Option<String>,
    pub dose_unit: Option<String>,
    /// Remaining countable occurrences, decremented on each delivery
    pub doses_left: i64,
    /// Snapshot of the owner's display name taken at creation time. Not
    /// re-synced when the profile changes later.
    pub recipient_name: String,
    /// Terminal flag, a completed reminder is never processed again
    pub completed: bool,
    /// Per-occurrence claim flag. Flipped to true when an occurrence is
    /// claimed for delivery and back to false when the reminder advances to
    /// a new occurrence.
    pub sent: bool,
    pub created: i64,
    pub updated: i64,
}

/// What `register_send` did to the reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Doses remain, `due_at` was advanced by the configured interval and
    /// the occurrence claim was released for the next round.
    Rescheduled { next_due_at: i64 },
    /// The reminder reached its terminal state.
    Completed,
}

impl Reminder {
    /// Notification lead subtracted from `due_at` to get the actual
    /// delivery time.
    pub fn lead_time_millis(&self) -> i64 {
        if self.category == CONTROL_CATEGORY {
            CONTROL_LEAD_TIME_MILLIS
        } else {
            0
        }
    }

    /// The wall-clock time at which the pending occurrence should be
    /// delivered.
    pub fn notify_at(&self) -> i64 {
        self.due_at - self.lead_time_millis()
    }

    /// Post-send state transition for a delivered occurrence. Expects the
    /// occurrence to already be claimed (`sent == true`).
    ///
    /// Decrements the remaining doses and either advances `due_at` to the
    /// next occurrence or completes the reminder. A reminder with doses
    /// remaining but no configured interval has nowhere to advance to and is
    /// completed as well, rather than left claimed forever.
    pub fn register_send(&mut self) -> SendOutcome {
        self.sent = true;
        if self.doses_left > 0 {
            self.doses_left -= 1;
            if self.doses_left > 0 {
                if let Some(interval_minutes) = self.interval_minutes {
                    self.due_at += interval_minutes * 60 * 1000;
                    self.sent = false;
                    return SendOutcome::Rescheduled {
                        next_due_at: self.due_at,
                    };
                }
            }
        }
        self.completed = true;
        SendOutcome::Completed
    }
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
