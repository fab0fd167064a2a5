use crate::error::{AuthError, Result};
use chrono::{Duration, Utc};
use consign_models::{Role, TenantId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime: seven days
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24 * 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,       // User ID within the tenant database
    pub username: String,
    pub role: Role,
    pub tenant_id: String, // Tenant the user signed in to
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("Subject is not a user id".to_string()))
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    token_exp_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            token_exp_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }

    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.token_exp_hours = hours;
        self
    }

    /// Issue a token binding the user to `tenant`
    pub fn generate_token(
        &self,
        user_id: i32,
        username: &str,
        role: Role,
        tenant: &TenantId,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_exp_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            tenant_id: tenant.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let jwt = JwtService::new("test-secret-key-min-32-characters-long");
        let tenant = TenantId::parse("shopA").unwrap();

        let token = jwt
            .generate_token(42, "ana", Role::User, &tenant)
            .expect("Failed to generate token");

        let claims = jwt.validate_token(&token).expect("Failed to validate token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "ana");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.tenant_id, "shopA");
        assert_eq!(claims.exp - claims.iat, DEFAULT_EXPIRATION_HOURS * 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("test-secret-key-min-32-characters-long");
        let verifier = JwtService::new("another-secret-key-min-32-characters");

        let token = issuer
            .generate_token(1, "ana", Role::Admin, &TenantId::primary())
            .unwrap();

        assert!(matches!(
            verifier.validate_token(&token),
            Err(AuthError::JwtError(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new("test-secret-key-min-32-characters-long").with_expiration_hours(-2);

        let token = jwt
            .generate_token(1, "ana", Role::User, &TenantId::primary())
            .unwrap();

        assert!(matches!(jwt.validate_token(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token() {
        let jwt = JwtService::new("test-secret-key-min-32-characters-long");
        assert!(jwt.validate_token("not.a.token").is_err());
    }
}
