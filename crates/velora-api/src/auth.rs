//! JWT authentication module.
//!
//! Handles token generation and validation for both the storefront and
//! the admin dashboard, plus the argon2 helpers guarding the admin
//! password.
//!
//! ## Roles
//! A single [`JwtManager`] signs both kinds of token; the `role` claim
//! ("customer" or "admin") tells them apart, and admin-only services
//! check it before doing anything.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// The two token roles.
pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_ADMIN: &str = "admin";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer id, or the admin email)
    pub sub: String,

    /// Display name
    pub name: String,

    /// "customer" or "admin"
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for the given subject and role.
    pub fn generate_token(&self, sub: &str, name: &str, role: &str) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: sub.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }

    /// Validate a token and require the admin role.
    pub fn validate_admin_token(&self, token: &str) -> ApiResult<Claims> {
        let claims = self.validate_token(token)?;

        if claims.role != ROLE_ADMIN {
            return Err(ApiError::unauthorized("Admin access required"));
        }

        Ok(claims)
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Extract bearer token from an authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager
            .generate_token("cust-001", "Mai Chan", ROLE_CUSTOMER)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "cust-001");
        assert_eq!(claims.name, "Mai Chan");
        assert_eq!(claims.role, ROLE_CUSTOMER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_customer_token_is_not_admin() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager
            .generate_token("cust-001", "Mai Chan", ROLE_CUSTOMER)
            .unwrap();
        assert!(manager.validate_admin_token(&token).is_err());

        let token = manager
            .generate_token("admin@velora.shop", "Admin", ROLE_ADMIN)
            .unwrap();
        assert!(manager.validate_admin_token(&token).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        let other = JwtManager::new("other-secret".to_string(), 3600);

        let token = manager
            .generate_token("cust-001", "Mai Chan", ROLE_CUSTOMER)
            .unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("admin123", "not-a-hash"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
