use crate::error::AvisoError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use aviso_api_structs::create_user::*;
use aviso_domain::User;
use aviso_infra::AvisoContext;

pub async fn create_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<AvisoContext>,
) -> Result<HttpResponse, AvisoError> {
    let body = body.0;
    let usecase = CreateUserUseCase {
        login: body.login,
        preferred_email: body.preferred_email,
        display_name: body.display_name,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(AvisoError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub login: String,
    pub preferred_email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidLogin,
    StorageError,
}

impl From<UseCaseError> for AvisoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidLogin => {
                Self::BadClientData("The login identifier cannot be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &AvisoContext) -> Result<Self::Response, Self::Error> {
        if self.login.trim().is_empty() {
            return Err(UseCaseError::InvalidLogin);
        }

        let mut user = User::new(self.login.clone());
        user.preferred_email = self.preferred_email.clone();
        user.display_name = self.display_name.clone();

        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn creates_user() {
        let ctx = AvisoContext::create_inmemory();
        let usecase = CreateUserUseCase {
            login: "user@example.com".into(),
            preferred_email: None,
            display_name: Some("Ada".into()),
        };

        let user = execute(usecase, &ctx).await.expect("To create user");
        assert_eq!(ctx.repos.users.find(&user.id).await, Some(user));
    }

    #[actix_web::test]
    async fn rejects_empty_login() {
        let ctx = AvisoContext::create_inmemory();
        let usecase = CreateUserUseCase {
            login: "  ".into(),
            preferred_email: None,
            display_name: None,
        };

        assert!(execute(usecase, &ctx).await.is_err());
    }
}
