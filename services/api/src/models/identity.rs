//! Events delivered by the identity provider webhook

use serde::Deserialize;

use super::user::{NewUser, UpdateUser};

/// User lifecycle event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum IdentityEvent {
    #[serde(rename = "user.created")]
    UserCreated(IdentityUser),
    #[serde(rename = "user.updated")]
    UserUpdated(IdentityUser),
    #[serde(rename = "user.deleted")]
    UserDeleted(DeletedIdentity),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// User payload as sent by the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub image_url: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedIdentity {
    pub id: String,
}

impl IdentityUser {
    fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn primary_email(&self) -> String {
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
            .unwrap_or_default()
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            clerk_id: self.id.clone(),
            name: self.display_name(),
            username: self.username.clone().unwrap_or_default(),
            email: self.primary_email(),
            picture: self.image_url.clone(),
            bio: None,
            location: None,
            portfolio_website: None,
        }
    }

    pub fn to_update(&self) -> UpdateUser {
        let name = self.display_name();
        let email = self.primary_email();
        UpdateUser {
            name: (!name.is_empty()).then_some(name),
            username: self.username.clone(),
            email: (!email.is_empty()).then_some(email),
            picture: (!self.image_url.is_empty()).then(|| self.image_url.clone()),
            ..Default::default()
        }
    }
}
