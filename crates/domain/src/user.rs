use crate::shared::email::looks_like_email;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The owner of `Reminder`s. Profile storage is managed elsewhere, this is
/// only the shape the reminder engine needs to resolve a recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    /// Login identifier. Used as the recipient address fallback when it is
    /// shaped like an email address.
    pub login: String,
    pub preferred_email: Option<String>,
    pub display_name: Option<String>,
}

impl User {
    pub fn new(login: String) -> Self {
        Self {
            id: Default::default(),
            login,
            preferred_email: None,
            display_name: None,
        }
    }

    /// The email address reminder notifications should be delivered to, if
    /// any: the preferred profile email when set, otherwise the login
    /// identifier when it is shaped like an email address.
    pub fn contact_email(&self) -> Option<String> {
        if let Some(email) = self
            .preferred_email
            .as_ref()
            .filter(|email| !email.is_empty())
        {
            return Some(email.clone());
        }
        if looks_like_email(&self.login) {
            return Some(self.login.clone());
        }
        None
    }
}

impl Entity for User {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
