use crate::error::AvisoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::delete_reminder::*;
use aviso_domain::{Reminder, ID};
use aviso_infra::AvisoContext;

pub async fn delete_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let usecase = DeleteReminderUseCase {
        user_id: path_params.user_id.clone(),
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
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
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx
            .repos
            .reminders
            .delete(&self.reminder_id, &self.user_id)
            .await
        {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        ctx.repos
            .scheduled_jobs
            .delete_by_reminder(&reminder.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use aviso_domain::User;

    #[actix_web::test]
    async fn deletes_reminder_and_cancels_pending_jobs() {
        let ctx = AvisoContext::create_inmemory();
        let user = User::new("user@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateReminderUseCase {
            user_id: user.id.clone(),
            category: "medication".into(),
            title: "Ibuprofen".into(),
            description: None,
            due_at: Some(1000 * 60 * 60),
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: None,
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");
        assert_eq!(
            ctx.repos
                .scheduled_jobs
                .find_by_reminder(&reminder.id)
                .await
                .len(),
            1
        );

        let usecase = DeleteReminderUseCase {
            user_id: user.id.clone(),
            reminder_id: reminder.id.clone(),
        };
        let deleted = execute(usecase, &ctx).await.expect("To delete reminder");

        assert_eq!(deleted.id, reminder.id);
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_none());
        assert!(ctx
            .repos
            .scheduled_jobs
            .find_by_reminder(&reminder.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn cannot_delete_another_users_reminder() {
        let ctx = AvisoContext::create_inmemory();
        let user = User::new("user@example.com".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateReminderUseCase {
            user_id: user.id.clone(),
            category: "medication".into(),
            title: "Ibuprofen".into(),
            description: None,
            due_at: Some(1000 * 60 * 60),
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: None,
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");

        let usecase = DeleteReminderUseCase {
            user_id: ID::new(),
            reminder_id: reminder.id.clone(),
        };
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(reminder.id.clone()));
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_some());
    }
}
