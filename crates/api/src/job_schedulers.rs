use crate::reminder::execute_scheduled_jobs::ExecuteScheduledJobsUseCase;
use crate::reminder::process_due_reminders::ProcessDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use aviso_infra::AvisoContext;
use std::time::Duration;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Drains the durable delivery job queue. This is the primary delivery path,
/// each job fires one reminder occurrence at its notification time.
pub fn start_scheduled_jobs_executor(ctx: AvisoContext) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_secs(30));
        loop {
            interval.tick().await;

            let _ = execute(ExecuteScheduledJobsUseCase, &ctx).await;
        }
    });
}

/// Minutely window scan over `due_at`, aligned to the start of the minute.
/// Catches occurrences whose delivery job was lost or never written.
pub fn start_due_reminders_reconciler(ctx: AvisoContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;

            let usecase = ProcessDueRemindersUseCase {
                window_millis: 1000 * 60,
            };
            let _ = execute(usecase, &ctx).await;
        }
    });
}
