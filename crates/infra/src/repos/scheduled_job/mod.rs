mod inmemory;
mod postgres;

use aviso_domain::{ScheduledJob, ID};
pub use inmemory::InMemoryScheduledJobRepo;
pub use postgres::PostgresScheduledJobRepo;

use crate::repos::shared::repo::DeleteResult;

#[async_trait::async_trait]
pub trait IScheduledJobRepo: Send + Sync {
    async fn insert(&self, job: &ScheduledJob) -> anyhow::Result<()>;
    /// Pops every job due at or before `before`. Deleting and returning in
    /// one step is what makes each job run at most once.
    async fn delete_all_before(&self, before: i64) -> Vec<ScheduledJob>;
    /// Cancels all jobs for a reminder, matching the id both as the raw
    /// key and as the stringified value in the job payload.
    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult>;
    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledJob>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pops_due_jobs_exactly_once() {
        let repo = InMemoryScheduledJobRepo::new();
        let due = ScheduledJob::new(ID::new(), 1000);
        let upcoming = ScheduledJob::new(ID::new(), 5000);
        repo.insert(&due).await.unwrap();
        repo.insert(&upcoming).await.unwrap();

        let popped = repo.delete_all_before(1000).await;
        assert_eq!(popped, vec![due]);

        assert!(repo.delete_all_before(1000).await.is_empty());
        assert_eq!(repo.delete_all_before(5000).await, vec![upcoming]);
    }

    #[tokio::test]
    async fn cancels_all_jobs_for_a_reminder() {
        let repo = InMemoryScheduledJobRepo::new();
        let reminder_id = ID::new();
        repo.insert(&ScheduledJob::new(reminder_id.clone(), 1000))
            .await
            .unwrap();
        repo.insert(&ScheduledJob::new(reminder_id.clone(), 2000))
            .await
            .unwrap();
        let other = ScheduledJob::new(ID::new(), 3000);
        repo.insert(&other).await.unwrap();

        let res = repo.delete_by_reminder(&reminder_id).await.unwrap();
        assert_eq!(res.deleted_count, 2);
        assert!(repo.find_by_reminder(&reminder_id).await.is_empty());
        assert_eq!(repo.find_by_reminder(&other.reminder_id).await.len(), 1);
    }
}
