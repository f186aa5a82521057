//! # Auth Service
//!
//! Two separate sign-in surfaces: customers on the storefront and the
//! single admin account on the dashboard. Each gets its own JWT (role
//! claim differs) and its own session slot, so an admin browsing the
//! shop does not clobber their dashboard session.
//!
//! This is a demo storefront: seeded customers have no stored password,
//! so any non-empty password signs them in. The admin account does check
//! its password, hashed with Argon2 at startup.

use serde::Deserialize;
use tracing::{info, warn};
use ts_rs::TS;

use velora_core::CustomerStatus;
use velora_store::Store;

use crate::auth::{hash_password, verify_password, JwtManager, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::config::ApiConfig;
use crate::dto::{AuthResponse, UserDto};
use crate::error::{ApiError, ApiResult};
use crate::session::{
    SessionStore, KEY_ADMIN_TOKEN, KEY_ADMIN_USER, KEY_TOKEN, KEY_USER,
};

/// Sign-in form, shared by both surfaces.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-in, sign-out and session inspection.
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    session: SessionStore,
    jwt: JwtManager,
    admin_email: String,
    admin_password_hash: String,
}

impl AuthService {
    pub fn new(store: Store, session: SessionStore, config: &ApiConfig) -> ApiResult<Self> {
        let admin_password_hash = hash_password(&config.admin_password)?;

        Ok(AuthService {
            store,
            session,
            jwt: JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs),
            admin_email: config.admin_email.clone(),
            admin_password_hash,
        })
    }

    // =========================================================================
    // Customer
    // =========================================================================

    pub async fn sign_in(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        velora_core::validation::validate_email(&credentials.email)?;
        let email = credentials.email.trim();
        if credentials.password.trim().is_empty() {
            return Err(ApiError::validation("Password is required"));
        }

        let customer = self
            .store
            .customers()
            .find_by_email(email)
            .await
            .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;
        if customer.status != CustomerStatus::Active {
            warn!(email = %email, "Sign-in attempt on deactivated account");
            return Err(ApiError::unauthorized("This account has been deactivated"));
        }

        let token = self
            .jwt
            .generate_token(&customer.id, &customer.name, ROLE_CUSTOMER)?;

        let user = UserDto {
            id: customer.id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            skin_type: Some(customer.skin_type),
        };
        self.session.set(KEY_TOKEN, &token);
        self.session.set_json(KEY_USER, &user);
        info!(customer_id = %customer.id, "Customer signed in");

        Ok(AuthResponse { token, user })
    }

    /// Clears the customer session. Favorites survive, the way a browser
    /// keeps its local storage across logins.
    pub fn sign_out(&self) {
        self.session.clear_customer();
        info!("Customer signed out");
    }

    /// The signed-in customer, if the stored token still verifies.
    pub fn current_user(&self) -> Option<UserDto> {
        let token = self.session.get(KEY_TOKEN)?;
        if self.jwt.validate_token(&token).is_err() {
            self.session.clear_customer();
            return None;
        }
        self.session.get_json(KEY_USER)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    pub async fn admin_sign_in(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let email_ok = credentials.email.trim().eq_ignore_ascii_case(&self.admin_email);
        let password_ok = verify_password(&credentials.password, &self.admin_password_hash);
        if !email_ok || !password_ok {
            warn!("Failed admin sign-in attempt");
            return Err(ApiError::unauthorized("Invalid admin credentials"));
        }

        let token = self.jwt.generate_token("admin", "Administrator", ROLE_ADMIN)?;

        let user = UserDto {
            id: "admin".to_string(),
            name: "Administrator".to_string(),
            email: self.admin_email.clone(),
            skin_type: None,
        };
        self.session.set(KEY_ADMIN_TOKEN, &token);
        self.session.set_json(KEY_ADMIN_USER, &user);
        info!("Admin signed in");

        Ok(AuthResponse { token, user })
    }

    pub fn admin_sign_out(&self) {
        self.session.clear_admin();
        info!("Admin signed out");
    }

    pub fn current_admin(&self) -> Option<UserDto> {
        let token = self.session.get(KEY_ADMIN_TOKEN)?;
        if self.jwt.validate_admin_token(&token).is_err() {
            self.session.clear_admin();
            return None;
        }
        self.session.get_json(KEY_ADMIN_USER)
    }

    /// Guard for admin-only operations.
    pub fn require_admin(&self) -> ApiResult<UserDto> {
        self.current_admin()
            .ok_or_else(|| ApiError::unauthorized("Admin sign-in required"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use velora_store::StoreConfig;

    fn service() -> AuthService {
        let config = ApiConfig::default();
        AuthService::new(
            Store::new(StoreConfig::for_tests()),
            SessionStore::new(),
            &config,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_customer_sign_in_and_out() {
        let svc = service();
        let response = svc
            .sign_in(&Credentials {
                email: "mai.chan@example.com".to_string(),
                password: "anything".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.name, "Mai Chan");
        assert!(!response.token.is_empty());
        assert_eq!(svc.current_user().unwrap().name, "Mai Chan");

        svc.sign_out();
        assert!(svc.current_user().is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_is_unauthorized_not_not_found() {
        let svc = service();
        let err = svc
            .sign_in(&Credentials {
                email: "stranger@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_email_validated_then_trimmed_for_lookup() {
        let svc = service();
        let err = svc
            .sign_in(&Credentials {
                email: "not-an-email".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let response = svc
            .sign_in(&Credentials {
                email: "  mai.chan@example.com  ".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "mai.chan@example.com");
    }

    #[tokio::test]
    async fn test_empty_password_rejected() {
        let svc = service();
        let err = svc
            .sign_in(&Credentials {
                email: "mai.chan@example.com".to_string(),
                password: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_admin_sign_in_checks_both_fields() {
        let svc = service();
        let config = ApiConfig::default();

        let err = svc
            .admin_sign_in(&Credentials {
                email: config.admin_email.clone(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let response = svc
            .admin_sign_in(&Credentials {
                email: config.admin_email.clone(),
                password: config.admin_password.clone(),
            })
            .await
            .unwrap();
        assert!(!response.token.is_empty());
        assert!(svc.require_admin().is_ok());

        svc.admin_sign_out();
        assert_eq!(
            svc.require_admin().unwrap_err().code,
            ErrorCode::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_cloned_service_shares_session() {
        let svc = service();
        let twin = svc.clone();

        svc.sign_in(&Credentials {
            email: "mai.chan@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

        assert_eq!(twin.current_user().unwrap().name, "Mai Chan");
        twin.sign_out();
        assert!(svc.current_user().is_none());
    }

    #[tokio::test]
    async fn test_customer_token_does_not_grant_admin() {
        let svc = service();
        svc.sign_in(&Credentials {
            email: "sokha.pich@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
        assert!(svc.current_admin().is_none());
        assert!(svc.require_admin().is_err());
    }
}
