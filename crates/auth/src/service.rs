use crate::error::{AuthError, Result};
use crate::jwt::JwtService;
use crate::password::PasswordHasher;
use consign_database::{AddressRepository, UserRepository};
use consign_models::{NewUser, Role, TenantId, UpdateUser, User, UserProfile};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
    pub role: Role,
    pub tenant_id: String,
}

/// Account operations against a tenant's database.
///
/// The service holds no pool; callers pass the pool resolved for the
/// request's tenant.
#[derive(Clone)]
pub struct AuthService {
    pub jwt: JwtService,
}

impl AuthService {
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt }
    }

    /// Register a new user with the `user` role
    pub async fn register(
        &self,
        pool: &MySqlPool,
        tenant: &TenantId,
        request: NewUser,
    ) -> Result<User> {
        request.validate()?;

        let users = UserRepository::new(pool.clone());
        if users.find_by_username(&request.username).await?.is_some() {
            return Err(AuthError::AlreadyExists(format!(
                "User '{}' already exists",
                request.username
            )));
        }

        let password_hash = PasswordHasher::hash(&request.password)?;
        let user = users
            .create(&request, &password_hash, Role::User, tenant.as_str())
            .await?;

        tracing::info!("Registered user {} in tenant {}", user.username, tenant);
        Ok(user)
    }

    /// Check credentials and issue a token scoped to `tenant`
    pub async fn login(
        &self,
        pool: &MySqlPool,
        tenant: &TenantId,
        request: LoginRequest,
    ) -> Result<AuthResponse> {
        let user = UserRepository::new(pool.clone())
            .find_by_username(&request.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordHasher::verify(&request.password, &user.password_hash)? {
            tracing::warn!("Failed login for {} in tenant {}", request.username, tenant);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .jwt
            .generate_token(user.user_id, &user.username, user.role(), tenant)?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id,
            username: user.username.clone(),
            role: user.role(),
            tenant_id: tenant.to_string(),
        })
    }

    /// Apply a profile update: user fields, password and address
    pub async fn update_user(
        &self,
        pool: &MySqlPool,
        user_id: i32,
        update: UpdateUser,
    ) -> Result<UserProfile> {
        update.validate()?;

        let password_hash = match update.password() {
            Some(password) => Some(PasswordHasher::hash(password)?),
            None => None,
        };

        let users = UserRepository::new(pool.clone());
        users
            .update(user_id, &update, password_hash.as_deref())
            .await?;

        if !update.address.is_empty() {
            AddressRepository::new(pool.clone())
                .upsert(user_id, &update.address)
                .await?;
        }

        Ok(users.profile(user_id).await?)
    }
}
