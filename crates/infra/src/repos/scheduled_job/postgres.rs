use super::IScheduledJobRepo;
use crate::repos::shared::repo::DeleteResult;
use aviso_domain::{ScheduledJob, ID};
use serde_json::json;
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresScheduledJobRepo {
    pool: PgPool,
}

impl PostgresScheduledJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledJobRaw {
    job_uid: Uuid,
    reminder_uid: Uuid,
    run_at: i64,
    #[allow(dead_code)]
    payload: serde_json::Value,
}

impl From<ScheduledJobRaw> for ScheduledJob {
    fn from(raw: ScheduledJobRaw) -> Self {
        Self {
            id: raw.job_uid.into(),
            reminder_id: raw.reminder_uid.into(),
            run_at: raw.run_at,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledJobRepo for PostgresScheduledJobRepo {
    async fn insert(&self, job: &ScheduledJob) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_jobs
            (job_uid, reminder_uid, run_at, payload)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(job.id.inner_ref())
        .bind(job.reminder_id.inner_ref())
        .bind(job.run_at)
        .bind(json!({ "reminderId": job.reminder_id.as_string() }))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_all_before(&self, before: i64) -> Vec<ScheduledJob> {
        let mut jobs: Vec<ScheduledJob> = sqlx::query_as::<_, ScheduledJobRaw>(
            r#"
            DELETE FROM scheduled_jobs AS j
            WHERE j.run_at <= $1
            RETURNING *
            "#,
        )
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect();
        jobs.sort_by_key(|j| j.run_at);
        jobs
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        // Historical jobs may reference the reminder only through the
        // stringified id in the payload, so match both representations.
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_jobs AS j
            WHERE j.reminder_uid = $1 OR j.payload->>'reminderId' = $2
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(reminder_id.as_string())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledJob> {
        sqlx::query_as::<_, ScheduledJobRaw>(
            r#"
            SELECT * FROM scheduled_jobs AS j
            WHERE j.reminder_uid = $1 OR j.payload->>'reminderId' = $2
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(reminder_id.as_string())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }
}
