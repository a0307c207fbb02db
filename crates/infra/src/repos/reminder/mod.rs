mod inmemory;
mod postgres;

use aviso_domain::{Reminder, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use crate::repos::shared::query_structs::DueWindow;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    async fn find_by_user_and_id(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder>;
    /// Pending reminders whose notification time falls inside the window.
    /// Applies the category lead time, so a `"control"` reminder is
    /// selected one hour before its stored due time.
    async fn find_due(&self, window: &DueWindow) -> Vec<Reminder>;
    /// Atomically claims the pending occurrence by flipping `sent` from
    /// false to true. Returns whether this caller won the claim; a claimed
    /// or completed reminder returns false.
    async fn try_claim(&self, reminder_id: &ID) -> bool;
    /// Gives a claimed occurrence back, e.g. when delivery failed.
    async fn release_claim(&self, reminder_id: &ID) -> anyhow::Result<()>;
    async fn delete(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviso_domain::CONTROL_LEAD_TIME_MILLIS;

    fn reminder_factory(category: &str, due_at: i64) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: Default::default(),
            category: category.into(),
            title: "Vitamin D".into(),
            description: None,
            due_at,
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: 1,
            recipient_name: "Patient".into(),
            completed: false,
            sent: false,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn selects_generic_reminders_inside_window() {
        let repo = InMemoryReminderRepo::new();
        let due = reminder_factory("medication", 1000);
        let too_late = reminder_factory("medication", 61_000);
        repo.insert(&due).await.unwrap();
        repo.insert(&too_late).await.unwrap();

        let found = repo
            .find_due(&DueWindow {
                start: 1000,
                end: 61_000,
            })
            .await;
        assert_eq!(found, vec![due]);
    }

    #[tokio::test]
    async fn selects_control_reminders_with_lead_time() {
        let repo = InMemoryReminderRepo::new();
        let now = 1000 * 60 * 60 * 24;
        let control = reminder_factory("control", now + CONTROL_LEAD_TIME_MILLIS);
        // Due now, but its notification already fired an hour ago
        let control_due_now = reminder_factory("control", now);
        repo.insert(&control).await.unwrap();
        repo.insert(&control_due_now).await.unwrap();

        let found = repo
            .find_due(&DueWindow {
                start: now,
                end: now + 60_000,
            })
            .await;
        assert_eq!(found, vec![control]);
    }

    #[tokio::test]
    async fn skips_sent_and_completed_reminders() {
        let repo = InMemoryReminderRepo::new();
        let mut sent = reminder_factory("medication", 1000);
        sent.sent = true;
        let mut completed = reminder_factory("medication", 1000);
        completed.completed = true;
        repo.insert(&sent).await.unwrap();
        repo.insert(&completed).await.unwrap();

        let found = repo
            .find_due(&DueWindow {
                start: 0,
                end: 60_000,
            })
            .await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn claim_is_won_only_once() {
        let repo = InMemoryReminderRepo::new();
        let reminder = reminder_factory("medication", 1000);
        repo.insert(&reminder).await.unwrap();

        assert!(repo.try_claim(&reminder.id).await);
        assert!(!repo.try_claim(&reminder.id).await);

        repo.release_claim(&reminder.id).await.unwrap();
        assert!(repo.try_claim(&reminder.id).await);
    }

    #[tokio::test]
    async fn completed_reminders_cannot_be_claimed() {
        let repo = InMemoryReminderRepo::new();
        let mut reminder = reminder_factory("medication", 1000);
        reminder.completed = true;
        repo.insert(&reminder).await.unwrap();

        assert!(!repo.try_claim(&reminder.id).await);
    }

    #[tokio::test]
    async fn delete_is_scoped_by_owner() {
        let repo = InMemoryReminderRepo::new();
        let reminder = reminder_factory("medication", 1000);
        repo.insert(&reminder).await.unwrap();

        let other_user = ID::new();
        assert!(repo.delete(&reminder.id, &other_user).await.is_none());
        assert!(repo.find(&reminder.id).await.is_some());

        assert!(repo.delete(&reminder.id, &reminder.user_id).await.is_some());
        assert!(repo.find(&reminder.id).await.is_none());
    }
}
