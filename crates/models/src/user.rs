use crate::address::{Address, UpdateAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

/// Row of the tenant `users` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub email: Option<String>,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// User joined with its address, as returned by the profile endpoints
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: i32,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub address: Option<Address>,
}

impl UserProfile {
    pub fn new(user: User, address: Option<Address>) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at,
            address,
        }
    }
}

/// Partial update of a user and their address. Absent or empty fields are
/// left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    pub password: Option<String>,

    #[serde(alias = "firstName")]
    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[serde(alias = "lastName")]
    #[validate(length(max = 50))]
    pub last_name: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub address: UpdateAddress,
}

impl UpdateUser {
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Forms send `""` for fields the user left blank
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("user"), Role::User);
        assert_eq!(Role::from("anything"), Role::User);
    }

    #[test]
    fn test_update_user_accepts_frontend_field_names() {
        let update: UpdateUser = serde_json::from_value(serde_json::json!({
            "email": "ana@example.com",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "address": "Calle 1",
            "postcode": "28001",
            "country": "ES"
        }))
        .unwrap();

        assert_eq!(update.first_name.as_deref(), Some("Ana"));
        assert_eq!(update.last_name.as_deref(), Some("Ruiz"));
        assert_eq!(update.address.address.as_deref(), Some("Calle 1"));
        assert_eq!(update.address.postal_code.as_deref(), Some("28001"));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_user_rejects_bad_email() {
        let update = UpdateUser {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_blank_profile_form_validates() {
        let update: UpdateUser = serde_json::from_value(serde_json::json!({
            "user_id": 7,
            "email": "",
            "phone": "",
            "first_name": "Ana",
            "last_name": "",
            "password": "",
            "address": "",
            "city": "",
            "state": "",
            "postal_code": "",
            "country": ""
        }))
        .unwrap();

        assert_eq!(update.email, None);
        assert!(update.validate().is_ok());
        assert_eq!(update.password(), None);
        assert!(update.address.is_empty());
    }

    #[test]
    fn test_signup_without_email_validates() {
        let user: NewUser = serde_json::from_value(serde_json::json!({
            "username": "ana",
            "password": "secret123",
            "email": ""
        }))
        .unwrap();

        assert_eq!(user.email, None);
        assert!(user.validate().is_ok());

        let user: NewUser = serde_json::from_value(serde_json::json!({
            "username": "ana",
            "password": "secret123"
        }))
        .unwrap();
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_empty_password_is_ignored() {
        let update = UpdateUser {
            password: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update.password(), None);
    }
}
