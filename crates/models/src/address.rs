use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Row of the tenant `user_addresses` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    #[serde(skip_serializing)]
    pub address_id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAddress {
    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 50))]
    pub city: Option<String>,

    #[validate(length(max = 50))]
    pub state: Option<String>,

    #[serde(alias = "postcode", alias = "postalCode")]
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(length(max = 50))]
    pub country: Option<String>,
}

impl UpdateAddress {
    /// True when no field carries a non-empty value
    pub fn is_empty(&self) -> bool {
        [
            &self.address,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, str::is_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(UpdateAddress::default().is_empty());

        let blank = UpdateAddress {
            city: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.is_empty());

        let city = UpdateAddress {
            city: Some("Sevilla".to_string()),
            ..Default::default()
        };
        assert!(!city.is_empty());
    }
}
