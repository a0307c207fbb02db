use crate::error::AvisoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::set_reminder_completed::*;
use aviso_domain::{Reminder, ID};
use aviso_infra::AvisoContext;

pub async fn set_reminder_completed_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let usecase = SetReminderCompletedUseCase {
        user_id: path_params.user_id.clone(),
        reminder_id: path_params.reminder_id.clone(),
        completed: body.completed,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct SetReminderCompletedUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub completed: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for AvisoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetReminderCompletedUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "SetReminderCompleted";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx
            .repos
            .reminders
            .find_by_user_and_id(&self.reminder_id, &self.user_id)
            .await
        {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        reminder.completed = self.completed;
        reminder.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if reminder.completed {
            ctx.repos
                .scheduled_jobs
                .delete_by_reminder(&reminder.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use aviso_domain::User;

    async fn setup() -> (AvisoContext, Reminder) {
        let ctx = AvisoContext::create_inmemory();
        let user = User::new("user@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateReminderUseCase {
            user_id: user.id.clone(),
            category: "appointment".into(),
            title: "Dentist".into(),
            description: None,
            due_at: Some(1000 * 60 * 60),
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: None,
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");
        (ctx, reminder)
    }

    #[actix_web::test]
    async fn marking_completed_cancels_pending_jobs() {
        let (ctx, reminder) = setup().await;

        let usecase = SetReminderCompletedUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            completed: true,
        };
        let updated = execute(usecase, &ctx).await.expect("To update reminder");

        assert!(updated.completed);
        assert!(ctx
            .repos
            .scheduled_jobs
            .find_by_reminder(&reminder.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn can_reopen_a_completed_reminder() {
        let (ctx, reminder) = setup().await;

        let usecase = SetReminderCompletedUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            completed: true,
        };
        execute(usecase, &ctx).await.expect("To complete reminder");

        let usecase = SetReminderCompletedUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            completed: false,
        };
        let updated = execute(usecase, &ctx).await.expect("To reopen reminder");
        assert!(!updated.completed);
    }

    #[actix_web::test]
    async fn unknown_reminder_is_rejected() {
        let (ctx, reminder) = setup().await;

        let reminder_id = ID::new();
        let usecase = SetReminderCompletedUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder_id.clone(),
            completed: true,
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(reminder_id));
    }
}
