use super::{inserted_id, non_empty};
use crate::error::{DatabaseError, Result};
use crate::repositories::addresses::AddressRepository;
use consign_models::user::{NewUser, Role, UpdateUser, UserProfile};
use consign_models::User;
use sqlx::{MySql, MySqlPool, QueryBuilder};

pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the tenant database
    pub async fn create(
        &self,
        new_user: &NewUser,
        password_hash: &str,
        role: Role,
        tenant_id: &str,
    ) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, phone, role, tenant_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.username)
        .bind(non_empty(&new_user.email))
        .bind(password_hash)
        .bind(non_empty(&new_user.phone))
        .bind(role.as_str())
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, "User", "that username or email"))?;

        self.find_by_id(inserted_id(&result)?).await
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", &id.to_string()))?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// User with their address merged in
    pub async fn profile(&self, id: i32) -> Result<UserProfile> {
        let user = self.find_by_id(id).await?;
        let address = AddressRepository::new(self.pool.clone())
            .find_by_user(id)
            .await?;

        Ok(UserProfile::new(user, address))
    }

    /// Apply the user-table part of `update`. `password_hash` replaces the
    /// stored hash when given.
    pub async fn update(
        &self,
        id: i32,
        update: &UpdateUser,
        password_hash: Option<&str>,
    ) -> Result<User> {
        let mut query_builder: QueryBuilder<MySql> =
            QueryBuilder::new("UPDATE users SET updated_at = CURRENT_TIMESTAMP");

        let mut has_updates = false;

        if let Some(email) = non_empty(&update.email) {
            query_builder.push(", email = ");
            query_builder.push_bind(email);
            has_updates = true;
        }

        if let Some(phone) = non_empty(&update.phone) {
            query_builder.push(", phone = ");
            query_builder.push_bind(phone);
            has_updates = true;
        }

        if let Some(hash) = password_hash {
            query_builder.push(", password_hash = ");
            query_builder.push_bind(hash);
            has_updates = true;
        }

        if let Some(first_name) = non_empty(&update.first_name) {
            query_builder.push(", first_name = ");
            query_builder.push_bind(first_name);
            has_updates = true;
        }

        if let Some(last_name) = non_empty(&update.last_name) {
            query_builder.push(", last_name = ");
            query_builder.push_bind(last_name);
            has_updates = true;
        }

        if !has_updates {
            return self.find_by_id(id).await;
        }

        query_builder.push(" WHERE user_id = ");
        query_builder.push_bind(id);

        query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, "User", "that email"))?;

        self.find_by_id(id).await
    }
}
