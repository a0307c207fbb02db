use crate::error::AvisoError;
use crate::reminder::delivery::{deliver_due_reminder, DeliveryOutcome};
use crate::shared::usecase::UseCase;
use aviso_domain::ScheduledJob;
use aviso_infra::AvisoContext;
use tracing::error;

/// Delay before a popped job whose delivery failed is run again. Popping
/// consumed the job, so without the requeue the occurrence would never
/// fire on this path again.
const JOB_RETRY_DELAY_MILLIS: i64 = 1000 * 60;

/// Pops every delivery job whose run time has arrived and delivers the
/// reminder it points at. Jobs are deleted as they are popped so a job runs
/// at most once, even with several executors over the same database.
#[derive(Debug)]
pub struct ExecuteScheduledJobsUseCase;

#[derive(Debug)]
pub struct ExecutedJobs {
    pub sent: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for AvisoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ExecuteScheduledJobsUseCase {
    type Response = ExecutedJobs;

    type Error = UseCaseError;

    const NAME: &'static str = "ExecuteScheduledJobs";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let jobs = ctx.repos.scheduled_jobs.delete_all_before(now).await;

        let mut sent = 0;
        for job in jobs {
            let reminder = match ctx.repos.reminders.find(&job.reminder_id).await {
                Some(reminder) if !reminder.completed => reminder,
                // Deleted or completed since the job was scheduled
                _ => continue,
            };

            // The reminder already advanced past the occurrence this job
            // was scheduled for, e.g. because the window scan delivered it
            // first. Running the job now would fire the next occurrence a
            // full interval early.
            if job.run_at < reminder.notify_at() {
                continue;
            }

            match deliver_due_reminder(reminder, ctx).await {
                Ok(DeliveryOutcome::Delivered) => sent += 1,
                Ok(DeliveryOutcome::Failed) | Ok(DeliveryOutcome::SkippedNoRecipient) => {
                    let retry =
                        ScheduledJob::new(job.reminder_id.clone(), now + JOB_RETRY_DELAY_MILLIS);
                    if let Err(e) = ctx.repos.scheduled_jobs.insert(&retry).await {
                        error!(
                            "Unable to requeue delivery job for reminder: {}. Err: {:?}",
                            job.reminder_id, e
                        );
                    }
                }
                Ok(DeliveryOutcome::SkippedAlreadyClaimed) => {}
                Err(e) => {
                    error!(
                        "Unable to execute delivery job: {}. Err: {:?}",
                        job.id, e
                    );
                    return Err(UseCaseError::StorageError);
                }
            }
        }

        Ok(ExecutedJobs { sent })
    }
}
