use super::IScheduledJobRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use aviso_domain::{ScheduledJob, ID};
use std::sync::Mutex;

pub struct InMemoryScheduledJobRepo {
    jobs: Mutex<Vec<ScheduledJob>>,
}

impl InMemoryScheduledJobRepo {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledJobRepo for InMemoryScheduledJobRepo {
    async fn insert(&self, job: &ScheduledJob) -> anyhow::Result<()> {
        insert(job, &self.jobs);
        Ok(())
    }

    async fn delete_all_before(&self, before: i64) -> Vec<ScheduledJob> {
        let mut popped = find_and_delete_by(&self.jobs, |j| j.run_at <= before);
        popped.sort_by_key(|j| j.run_at);
        popped
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.jobs, |j| j.reminder_id == *reminder_id))
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<ScheduledJob> {
        find_by(&self.jobs, |j| j.reminder_id == *reminder_id)
    }
}
