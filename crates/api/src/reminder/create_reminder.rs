use super::subscribers::ScheduleDeliveryJobOnReminderCreated;
use crate::error::AvisoError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::create_reminder::*;
use aviso_domain::{Reminder, ID};
use aviso_infra::AvisoContext;

pub async fn create_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id: path_params.user_id.clone(),
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
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to the current time when not given
    pub due_at: Option<i64>,
    pub frequency: Option<String>,
    pub interval_minutes: Option<i64>,
    pub dose: Option<String>,
    pub dose_unit: Option<String>,
    pub doses_left: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
    NoRecipientEmail,
    InvalidInterval,
    StorageError,
}

impl From<UseCaseError> for AvisoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::NoRecipientEmail => Self::BadClientData(
                "The user has no valid email address to deliver reminders to".into(),
            ),
            UseCaseError::InvalidInterval => {
                Self::BadClientData("The reminder interval must be a positive number of minutes".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        let user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
        };

        // Reject upfront rather than creating a reminder that can never be
        // delivered
        if user.contact_email().is_none() {
            return Err(UseCaseError::NoRecipientEmail);
        }

        if matches!(self.interval_minutes, Some(interval) if interval <= 0) {
            return Err(UseCaseError::InvalidInterval);
        }

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder {
            id: Default::default(),
            user_id: user.id.clone(),
            category: self.category.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            due_at: self.due_at.unwrap_or(now),
            frequency: self.frequency.clone(),
            interval_minutes: self.interval_minutes,
            dose: self.dose.clone(),
            dose_unit: self.dose_unit.clone(),
            doses_left: self.doses_left.unwrap_or(0),
            // Snapshot taken at creation time, never re-synced
            recipient_name: user.display_name.clone().unwrap_or_else(|| "Patient".into()),
            completed: false,
            sent: false,
            created: now,
            updated: now,
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleDeliveryJobOnReminderCreated)]
    }
}
