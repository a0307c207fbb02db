mod create_reminder;
mod delete_reminder;
mod delivery;
pub mod execute_scheduled_jobs;
mod get_reminder;
mod get_user_reminders;
pub mod process_due_reminders;
mod set_reminder_completed;
mod subscribers;
mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use get_user_reminders::get_user_reminders_controller;
use process_due_reminders::process_due_reminders_controller;
use set_reminder_completed::set_reminder_completed_controller;
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/reminders",
        web::post().to(create_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminders",
        web::get().to(get_user_reminders_controller),
    );

    cfg.route(
        "/user/{user_id}/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
    cfg.route(
        "/user/{user_id}/reminders/{reminder_id}/completed",
        web::post().to(set_reminder_completed_controller),
    );

    // Hit by an external cron-style trigger, and also run internally by the
    // minutely reconciler loop
    cfg.route(
        "/reminders/process-due",
        web::post().to(process_due_reminders_controller),
    );
}
