use crate::error::AvisoError;
use crate::reminder::delivery::{deliver_due_reminder, DeliveryOutcome};
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::process_due_reminders::*;
use aviso_infra::{AvisoContext, DueWindow};
use tracing::error;

pub async fn process_due_reminders_controller(
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let usecase = ProcessDueRemindersUseCase {
        window_millis: 1000 * 60,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.sent)))
        .map_err(AvisoError::from)
}

/// Scans for reminders whose notification time falls inside the next window
/// and delivers them. The durable job queue normally gets there first, so
/// this is the safety net that catches anything it dropped.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase {
    pub window_millis: i64,
}

#[derive(Debug)]
pub struct ProcessedReminders {
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
impl UseCase for ProcessDueRemindersUseCase {
    type Response = ProcessedReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let window = DueWindow {
            start: now,
            end: now + self.window_millis,
        };

        let due = ctx.repos.reminders.find_due(&window).await;

        let mut sent = 0;
        for reminder in due {
            match deliver_due_reminder(reminder, ctx).await {
                Ok(DeliveryOutcome::Delivered) => sent += 1,
                Ok(_) => {}
                Err(e) => {
                    error!("Unable to process due reminders. Err: {:?}", e);
                    return Err(UseCaseError::StorageError);
                }
            }
        }

        Ok(ProcessedReminders { sent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use aviso_domain::{Reminder, User, CONTROL_LEAD_TIME_MILLIS};
    use aviso_infra::{ISys, InMemoryMailer};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    const NOW: i64 = 1_700_000_000_000;

    struct TestApp {
        ctx: AvisoContext,
        mailer: Arc<InMemoryMailer>,
    }

    impl TestApp {
        fn new() -> Self {
            let mut ctx = AvisoContext::create_inmemory();
            let mailer = Arc::new(InMemoryMailer::new());
            ctx.sys = Arc::new(StaticTimeSys(NOW));
            ctx.mailer = mailer.clone();
            Self { ctx, mailer }
        }

        fn set_now(&mut self, now: i64) {
            self.ctx.sys = Arc::new(StaticTimeSys(now));
        }

        async fn insert_user(&self, login: &str) -> User {
            let user = User::new(login.into());
            self.ctx.repos.users.insert(&user).await.unwrap();
            user
        }

        async fn insert_reminder(
            &self,
            user: &User,
            category: &str,
            due_at: i64,
            interval_minutes: Option<i64>,
            doses_left: Option<i64>,
        ) -> Reminder {
            let usecase = CreateReminderUseCase {
                user_id: user.id.clone(),
                category: category.into(),
                title: "Ibuprofen".into(),
                description: None,
                due_at: Some(due_at),
                frequency: None,
                interval_minutes,
                dose: Some("200".into()),
                dose_unit: Some("mg".into()),
                doses_left,
            };
            execute(usecase, &self.ctx).await.expect("To create reminder")
        }

        async fn scan(&self) -> ProcessedReminders {
            let usecase = ProcessDueRemindersUseCase {
                window_millis: 1000 * 60,
            };
            execute(usecase, &self.ctx)
                .await
                .expect("To process due reminders")
        }
    }

    #[actix_web::test]
    async fn sends_reminders_due_in_the_next_minute() {
        let app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        app.insert_reminder(&user, "medication", NOW, None, Some(1))
            .await;
        app.insert_reminder(&user, "medication", NOW + 1000 * 59, None, Some(1))
            .await;
        // Outside the window, both sides
        app.insert_reminder(&user, "medication", NOW + 1000 * 60, None, Some(1))
            .await;
        app.insert_reminder(&user, "medication", NOW - 1, None, Some(1))
            .await;

        let res = app.scan().await;

        assert_eq!(res.sent, 2);
        assert_eq!(app.mailer.outbox().len(), 2);
    }

    #[actix_web::test]
    async fn control_reminders_are_sent_one_hour_ahead() {
        let app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        let control = app
            .insert_reminder(
                &user,
                "control",
                NOW + CONTROL_LEAD_TIME_MILLIS,
                None,
                Some(1),
            )
            .await;
        // Due now but control, so its notification fired an hour ago
        app.insert_reminder(&user, "control", NOW, None, Some(1))
            .await;

        let res = app.scan().await;

        assert_eq!(res.sent, 1);
        let outbox = app.mailer.outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].due_at, control.due_at);
    }

    #[actix_web::test]
    async fn scanning_twice_sends_once() {
        let app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        app.insert_reminder(&user, "medication", NOW, None, Some(1))
            .await;

        let first = app.scan().await;
        let second = app.scan().await;

        assert_eq!(first.sent, 1);
        assert_eq!(second.sent, 0);
        assert_eq!(app.mailer.outbox().len(), 1);
    }

    #[actix_web::test]
    async fn skips_owner_without_valid_email() {
        let app = TestApp::new();
        // An owner whose address stopped being usable after their reminders
        // were created
        let user = app.insert_user("notanemail").await;
        let reminder = Reminder {
            id: Default::default(),
            user_id: user.id.clone(),
            category: "medication".into(),
            title: "Ibuprofen".into(),
            description: None,
            due_at: NOW,
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: 1,
            recipient_name: "Patient".into(),
            completed: false,
            sent: false,
            created: NOW,
            updated: NOW,
        };
        app.ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = app.scan().await;

        assert_eq!(res.sent, 0);
        assert!(app.mailer.outbox().is_empty());
        let stored = app.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored, reminder);
    }

    #[actix_web::test]
    async fn gateway_failure_leaves_reminder_pending() {
        let app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        let reminder = app
            .insert_reminder(&user, "medication", NOW, None, Some(1))
            .await;

        app.mailer.set_failing(true);
        let res = app.scan().await;
        assert_eq!(res.sent, 0);
        let stored = app.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(!stored.sent);
        assert!(!stored.completed);

        // The next scan picks it up again
        app.mailer.set_failing(false);
        let res = app.scan().await;
        assert_eq!(res.sent, 1);
        assert_eq!(app.mailer.outbox().len(), 1);
    }

    #[actix_web::test]
    async fn recurring_reminder_runs_through_all_doses() {
        let mut app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        let reminder = app
            .insert_reminder(&user, "medication", NOW, Some(30), Some(3))
            .await;

        for occurrence in 0..3 {
            app.set_now(NOW + occurrence * 30 * 60 * 1000);
            let res = app.scan().await;
            assert_eq!(res.sent, 1);
        }

        assert_eq!(app.mailer.outbox().len(), 3);
        let stored = app.ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.completed);
        assert_eq!(stored.doses_left, 0);
        assert_eq!(stored.due_at, NOW + 2 * 30 * 60 * 1000);
    }

    #[actix_web::test]
    async fn completed_reminders_are_never_selected() {
        let app = TestApp::new();
        let user = app.insert_user("user@example.com").await;
        let mut reminder = app
            .insert_reminder(&user, "medication", NOW, None, Some(1))
            .await;
        reminder.completed = true;
        app.ctx.repos.reminders.save(&reminder).await.unwrap();

        let res = app.scan().await;
        assert_eq!(res.sent, 0);
        assert!(app.mailer.outbox().is_empty());
    }
}
