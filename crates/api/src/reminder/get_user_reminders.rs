use crate::error::AvisoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::get_user_reminders::*;
use aviso_domain::{Reminder, ID};
use aviso_infra::AvisoContext;

pub async fn get_user_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let usecase = GetUserRemindersUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct GetUserRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for AvisoError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUserReminders";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.find_by_user(&self.user_id).await)
    }
}
