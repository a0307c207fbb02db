use aviso_domain::{Reminder, ScheduledJob, SendOutcome};
use aviso_infra::{AvisoContext, ReminderEmail};
use tracing::{error, warn};

/// What happened to one due reminder occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeliveryOutcome {
    Delivered,
    /// The owner has no resolvable email address. The occurrence was not
    /// claimed and stays pending.
    SkippedNoRecipient,
    /// Another path claimed this occurrence first.
    SkippedAlreadyClaimed,
    /// The notification gateway failed. The claim was released and the
    /// occurrence stays pending.
    Failed,
}

/// Delivers one due reminder occurrence and applies the post-send
/// transition. Shared by the job executor and the window-scan reconciler;
/// the claim makes it safe for both to race over the same reminder.
///
/// Returns `Err` only on persistence failures, which the caller surfaces as
/// a batch error. Everything else is a per-item outcome.
pub(crate) async fn deliver_due_reminder(
    mut reminder: Reminder,
    ctx: &AvisoContext,
) -> anyhow::Result<DeliveryOutcome> {
    let email = match ctx
        .repos
        .users
        .find(&reminder.user_id)
        .await
        .and_then(|user| user.contact_email())
    {
        Some(email) => email,
        None => {
            warn!(
                "No valid recipient email for reminder: {}. Skipping it.",
                reminder.id
            );
            return Ok(DeliveryOutcome::SkippedNoRecipient);
        }
    };

    // Claim the occurrence before sending so that an overlapping scan or the
    // job executor cannot send it twice.
    if !ctx.repos.reminders.try_claim(&reminder.id).await {
        return Ok(DeliveryOutcome::SkippedAlreadyClaimed);
    }

    let mail = ReminderEmail::new(email, &reminder);
    if let Err(e) = ctx.mailer.send(&mail).await {
        error!("Unable to deliver reminder: {}. Err: {:?}", reminder.id, e);
        if let Err(e) = ctx.repos.reminders.release_claim(&reminder.id).await {
            error!(
                "Unable to release claim for reminder: {}. Err: {:?}",
                reminder.id, e
            );
        }
        return Ok(DeliveryOutcome::Failed);
    }

    let outcome = reminder.register_send();
    reminder.updated = ctx.sys.get_timestamp_millis();
    ctx.repos.reminders.save(&reminder).await?;

    if let SendOutcome::Rescheduled { .. } = outcome {
        // The durable job queue stays the timing authority for the next
        // occurrence. Replace instead of append: a leftover job for the
        // occurrence just delivered must not fire the new one early.
        if let Err(e) = ctx.repos.scheduled_jobs.delete_by_reminder(&reminder.id).await {
            error!(
                "Unable to cancel outdated delivery jobs for reminder: {}. Err: {:?}",
                reminder.id, e
            );
        }
        let job = ScheduledJob::new(reminder.id.clone(), reminder.notify_at());
        if let Err(e) = ctx.repos.scheduled_jobs.insert(&job).await {
            error!(
                "Unable to schedule the next delivery job for reminder: {}. Err: {:?}",
                reminder.id, e
            );
        }
    }

    Ok(DeliveryOutcome::Delivered)
}
