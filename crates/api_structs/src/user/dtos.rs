use aviso_domain::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: String,
    pub login: String,
    pub preferred_email: Option<String>,
    pub display_name: Option<String>,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id.as_string(),
            login: user.login,
            preferred_email: user.preferred_email,
            display_name: user.display_name,
        }
    }
}
