use super::IReminderRepo;
use crate::repos::shared::query_structs::DueWindow;
use aviso_domain::{Reminder, CONTROL_CATEGORY, CONTROL_LEAD_TIME_MILLIS, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    category: String,
    title: String,
    description: Option<String>,
    due_at: i64,
    frequency: Option<String>,
    interval_minutes: Option<i64>,
    dose: Option<String>,
    dose_unit: Option<String>,
    doses_left: i64,
    recipient_name: String,
    completed: bool,
    sent: bool,
    created: i64,
    updated: i64,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        Self {
            id: raw.reminder_uid.into(),
            user_id: raw.user_uid.into(),
            category: raw.category,
            title: raw.title,
            description: raw.description,
            due_at: raw.due_at,
            frequency: raw.frequency,
            interval_minutes: raw.interval_minutes,
            dose: raw.dose,
            dose_unit: raw.dose_unit,
            doses_left: raw.doses_left,
            recipient_name: raw.recipient_name,
            completed: raw.completed,
            sent: raw.sent,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, category, title, description, due_at, frequency,
             interval_minutes, dose, dose_unit, doses_left, recipient_name, completed,
             sent, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(&reminder.category)
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(reminder.due_at)
        .bind(&reminder.frequency)
        .bind(reminder.interval_minutes)
        .bind(&reminder.dose)
        .bind(&reminder.dose_unit)
        .bind(reminder.doses_left)
        .bind(&reminder.recipient_name)
        .bind(reminder.completed)
        .bind(reminder.sent)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET category = $2,
            title = $3,
            description = $4,
            due_at = $5,
            frequency = $6,
            interval_minutes = $7,
            dose = $8,
            dose_unit = $9,
            doses_left = $10,
            recipient_name = $11,
            completed = $12,
            sent = $13,
            updated = $14
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.category)
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(reminder.due_at)
        .bind(&reminder.frequency)
        .bind(reminder.interval_minutes)
        .bind(&reminder.dose)
        .bind(&reminder.dose_unit)
        .bind(reminder.doses_left)
        .bind(&reminder.recipient_name)
        .bind(reminder.completed)
        .bind(reminder.sent)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default()
        .map(|raw| raw.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1
            ORDER BY r.due_at
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }

    async fn find_by_user_and_id(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1 AND r.user_uid = $2
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default()
        .map(|raw| raw.into())
    }

    async fn find_due(&self, window: &DueWindow) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.completed = FALSE AND r.sent = FALSE AND (
                (r.category = $5 AND r.due_at >= $1 AND r.due_at < $2)
                OR
                (r.category <> $5 AND r.due_at >= $3 AND r.due_at < $4)
            )
            ORDER BY r.due_at
            "#,
        )
        .bind(window.start + CONTROL_LEAD_TIME_MILLIS)
        .bind(window.end + CONTROL_LEAD_TIME_MILLIS)
        .bind(window.start)
        .bind(window.end)
        .bind(CONTROL_CATEGORY)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }

    async fn try_claim(&self, reminder_id: &ID) -> bool {
        match sqlx::query(
            r#"
            UPDATE reminders
            SET sent = TRUE
            WHERE reminder_uid = $1 AND sent = FALSE AND completed = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await
        {
            Ok(res) => res.rows_affected() == 1,
            Err(e) => {
                error!("Unable to claim reminder: {}. Err: {:?}", reminder_id, e);
                false
            }
        }
    }

    async fn release_claim(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET sent = FALSE
            WHERE reminder_uid = $1 AND completed = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, reminder_id: &ID, user_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1 AND r.user_uid = $2
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_default()
        .map(|raw| raw.into())
    }
}
