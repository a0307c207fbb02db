use super::create_reminder::CreateReminderUseCase;
use crate::shared::usecase::Subscriber;
use aviso_domain::{Reminder, ScheduledJob};
use aviso_infra::AvisoContext;
use tracing::error;

/// Registers the durable delivery job for a newly created `Reminder`.
pub struct ScheduleDeliveryJobOnReminderCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateReminderUseCase> for ScheduleDeliveryJobOnReminderCreated {
    async fn notify(&self, reminder: &Reminder, ctx: &AvisoContext) {
        let job = ScheduledJob::new(reminder.id.clone(), reminder.notify_at());
        if ctx.repos.scheduled_jobs.insert(&job).await.is_err() {
            error!(
                "Unable to schedule delivery job for reminder: {}",
                reminder.id
            );
        }
    }
}
