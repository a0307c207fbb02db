use super::IReminderRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::DueWindow};
use aviso_domain::{Reminder, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        find_by(&self.reminders, |r| r.user_id == *user_id)
    }

    async fn find_by_user_and_id(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| {
            r.id == *reminder_id && r.user_id == *user_id
        });
        if reminders.is_empty() {
            return None;
        }
        Some(reminders.remove(0))
    }

    async fn find_due(&self, window: &DueWindow) -> Vec<Reminder> {
        find_by(&self.reminders, |r| {
            let notify_at = r.notify_at();
            !r.completed && !r.sent && notify_at >= window.start && notify_at < window.end
        })
    }

    async fn try_claim(&self, reminder_id: &ID) -> bool {
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.id == *reminder_id {
                if reminder.sent || reminder.completed {
                    return false;
                }
                reminder.sent = true;
                return true;
            }
        }
        false
    }

    async fn release_claim(&self, reminder_id: &ID) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        for reminder in reminders.iter_mut() {
            if reminder.id == *reminder_id && !reminder.completed {
                reminder.sent = false;
            }
        }
        Ok(())
    }

    async fn delete(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder> {
        let mut deleted = find_and_delete_by(&self.reminders, |r| {
            r.id == *reminder_id && r.user_id == *user_id
        });
        if deleted.is_empty() {
            return None;
        }
        Some(deleted.remove(0))
    }
}
