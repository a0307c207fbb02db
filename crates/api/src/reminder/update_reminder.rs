use crate::error::AvisoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::update_reminder::*;
use aviso_domain::{Reminder, ScheduledJob, ID};
use aviso_infra::AvisoContext;

pub async fn update_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let body = body.0;
    let usecase = UpdateReminderUseCase {
        user_id: path_params.user_id.clone(),
        reminder_id: path_params.reminder_id.clone(),
        category: body.category,
        title: body.title,
        description: body.description,
        due_at: body.due_at,
        frequency: body.frequency,
        interval_minutes: body.interval_minutes,
        dose: body.dose,
        dose_unit: body.dose_unit,
        doses_left: body.doses_left,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<i64>,
    pub frequency: Option<String>,
    pub interval_minutes: Option<i64>,
    pub dose: Option<String>,
    pub dose_unit: Option<String>,
    pub doses_left: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    AlreadySent,
    InvalidInterval,
    StorageError,
}

impl From<UseCaseError> for AvisoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::AlreadySent => Self::Conflict(
                "The reminder occurrence was already sent and can no longer be modified".into(),
            ),
            UseCaseError::InvalidInterval => {
                Self::BadClientData("The reminder interval must be a positive number of minutes".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

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

        if reminder.sent {
            return Err(UseCaseError::AlreadySent);
        }

        if matches!(self.interval_minutes, Some(interval) if interval <= 0) {
            return Err(UseCaseError::InvalidInterval);
        }

        let old_notify_at = reminder.notify_at();

        if let Some(category) = &self.category {
            reminder.category = category.clone();
        }
        if let Some(title) = &self.title {
            reminder.title = title.clone();
        }
        if let Some(description) = &self.description {
            reminder.description = Some(description.clone());
        }
        if let Some(due_at) = self.due_at {
            reminder.due_at = due_at;
        }
        if let Some(frequency) = &self.frequency {
            reminder.frequency = Some(frequency.clone());
        }
        if let Some(interval_minutes) = self.interval_minutes {
            reminder.interval_minutes = Some(interval_minutes);
        }
        if let Some(dose) = &self.dose {
            reminder.dose = Some(dose.clone());
        }
        if let Some(dose_unit) = &self.dose_unit {
            reminder.dose_unit = Some(dose_unit.clone());
        }
        if let Some(doses_left) = self.doses_left {
            reminder.doses_left = doses_left;
        }
        reminder.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // A moved notification time invalidates the pending delivery job
        if reminder.notify_at() != old_notify_at {
            ctx.repos
                .scheduled_jobs
                .delete_by_reminder(&reminder.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            let job = ScheduledJob::new(reminder.id.clone(), reminder.notify_at());
            ctx.repos
                .scheduled_jobs
                .insert(&job)
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
            category: "medication".into(),
            title: "Ibuprofen".into(),
            description: None,
            due_at: Some(1000 * 60 * 60),
            frequency: None,
            interval_minutes: Some(30),
            dose: None,
            dose_unit: None,
            doses_left: Some(3),
        };
        let reminder = execute(usecase, &ctx).await.expect("To create reminder");
        (ctx, reminder)
    }

    fn usecase_factory(reminder: &Reminder) -> UpdateReminderUseCase {
        UpdateReminderUseCase {
            user_id: reminder.user_id.clone(),
            reminder_id: reminder.id.clone(),
            category: None,
            title: None,
            description: None,
            due_at: None,
            frequency: None,
            interval_minutes: None,
            dose: None,
            dose_unit: None,
            doses_left: None,
        }
    }

    #[actix_web::test]
    async fn updates_fields() {
        let (ctx, reminder) = setup().await;

        let mut usecase = usecase_factory(&reminder);
        usecase.title = Some("Paracetamol".into());
        usecase.doses_left = Some(5);
        let updated = execute(usecase, &ctx).await.expect("To update reminder");

        assert_eq!(updated.title, "Paracetamol");
        assert_eq!(updated.doses_left, 5);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await,
            Some(updated)
        );
    }

    #[actix_web::test]
    async fn reschedules_delivery_job_when_due_time_moves() {
        let (ctx, reminder) = setup().await;

        let mut usecase = usecase_factory(&reminder);
        usecase.due_at = Some(reminder.due_at + 1000 * 60 * 15);
        let updated = execute(usecase, &ctx).await.expect("To update reminder");

        let jobs = ctx.repos.scheduled_jobs.find_by_reminder(&reminder.id).await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].run_at, updated.notify_at());
    }

    #[actix_web::test]
    async fn rejects_updates_once_occurrence_is_sent() {
        let (ctx, mut reminder) = setup().await;
        reminder.sent = true;
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let mut usecase = usecase_factory(&reminder);
        usecase.title = Some("Paracetamol".into());
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::AlreadySent);
    }

    #[actix_web::test]
    async fn is_scoped_by_owner() {
        let (ctx, reminder) = setup().await;

        let mut usecase = usecase_factory(&reminder);
        usecase.user_id = ID::new();
        usecase.title = Some("Paracetamol".into());
        let res = execute(usecase, &ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::NotFound(reminder.id));
    }
}
