use super::non_empty;
use crate::error::{DatabaseError, Result};
use consign_models::{Address, UpdateAddress};
use sqlx::MySqlPool;

pub struct AddressRepository {
    pool: MySqlPool,
}

impl AddressRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT * FROM user_addresses WHERE user_id = ? ORDER BY address_id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    /// Update the user's address, or create it on first save.
    ///
    /// Fields left empty keep their stored value on update and are stored as
    /// empty strings on insert.
    pub async fn upsert(&self, user_id: i32, update: &UpdateAddress) -> Result<Address> {
        if self.find_by_user(user_id).await?.is_some() {
            sqlx::query(
                r#"
                UPDATE user_addresses SET
                    address = COALESCE(?, address),
                    city = COALESCE(?, city),
                    state = COALESCE(?, state),
                    postal_code = COALESCE(?, postal_code),
                    country = COALESCE(?, country)
                WHERE user_id = ?
                "#,
            )
            .bind(non_empty(&update.address))
            .bind(non_empty(&update.city))
            .bind(non_empty(&update.state))
            .bind(non_empty(&update.postal_code))
            .bind(non_empty(&update.country))
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO user_addresses (user_id, address, city, state, postal_code, country)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(non_empty(&update.address).unwrap_or_default())
            .bind(non_empty(&update.city).unwrap_or_default())
            .bind(non_empty(&update.state).unwrap_or_default())
            .bind(non_empty(&update.postal_code).unwrap_or_default())
            .bind(non_empty(&update.country).unwrap_or_default())
            .execute(&self.pool)
            .await?;
        }

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Address for user", &user_id.to_string()))
    }
}
