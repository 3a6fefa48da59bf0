use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{
    AuthAccount, AuthSession, LoginInput, ManagerAccount, ManagerSession, RegisterCustomerInput,
    RegisterManagerInput, ROLE_CUSTOMER, ROLE_MANAGER,
};
use super::errors::AuthError;
use super::repository::AuthRepository;

const MIN_PASSWORD_LEN: usize = 6;
const RESET_TOKEN_BYTES: usize = 20;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, token_ttl_hours: 168, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new customer with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterCustomerInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterCustomerInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into() };
    /// let account = tokio_test::block_on(svc.register_customer(input)).unwrap();
    /// assert_eq!(account.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register_customer(&self, input: RegisterCustomerInput) -> Result<AuthAccount, AuthError> {
        self.check_password_strength(&input.password)?;
        if let Some(existing) = self.repo.find_customer_by_email(&input.email).await? {
            debug!("customer exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let account = self.repo.create_customer(&input.name, &input.email).await?;
        let hash = self.hash_password(&input.password)?;
        let _cred = self
            .repo
            .upsert_password(account.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(account_id = %account.id, email = %account.email, "customer_registered");
        Ok(account)
    }

    /// Authenticate a customer and optionally issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterCustomerInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { jwt_secret: Some("secret".into()), ..AuthConfig::default() };
    /// let svc = AuthService::new(repo, cfg);
    /// let _ = tokio_test::block_on(svc.register_customer(RegisterCustomerInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login_customer(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.account.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login_customer(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let account = self
            .repo
            .find_customer_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        self.verify_account_password(account.id, &input.password).await?;
        self.repo.touch_customer_last_active(account.id).await?;

        let token = self.issue_token(account.id, ROLE_CUSTOMER)?;
        info!(account_id = %account.id, "customer_logged_in");
        Ok(AuthSession { account, token })
    }

    #[instrument(skip(self, input), fields(email = %input.email, department = %input.department))]
    pub async fn register_manager(&self, input: RegisterManagerInput) -> Result<ManagerAccount, AuthError> {
        self.check_password_strength(&input.password)?;
        if self.repo.find_manager_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let manager = self
            .repo
            .create_manager(&input.name, &input.email, &input.department, input.permissions)
            .await?;
        let hash = self.hash_password(&input.password)?;
        let _cred = self
            .repo
            .upsert_password(manager.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(account_id = %manager.id, department = %manager.department, "manager_registered");
        Ok(manager)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login_manager(&self, input: LoginInput) -> Result<ManagerSession, AuthError> {
        let manager = self
            .repo
            .find_manager_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !manager.is_active {
            return Err(AuthError::Deactivated);
        }

        self.verify_account_password(manager.id, &input.password).await?;
        self.repo.touch_manager_last_login(manager.id).await?;

        let token = self.issue_token(manager.id, ROLE_MANAGER)?;
        info!(account_id = %manager.id, "manager_logged_in");
        Ok(ManagerSession { manager, token })
    }

    /// Generate and store a password-reset token for the customer.
    ///
    /// The caller forwards the token to the customer; there is no mailer.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let account = self
            .repo
            .find_customer_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let mut buf = [0u8; RESET_TOKEN_BYTES];
        OsRng.fill_bytes(&mut buf);
        let token: String = buf.iter().map(|b| format!("{b:02x}")).collect();

        let expires = Utc::now() + Duration::hours(1);
        self.repo.set_reset_token(account.id, &token, expires).await?;
        info!(account_id = %account.id, "reset_token_issued");
        Ok(token)
    }

    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        self.check_password_strength(new_password)?;
        let account = self
            .repo
            .find_customer_by_reset_token(token, Utc::now())
            .await?
            .ok_or_else(|| AuthError::Validation("Invalid or expired token".into()))?;

        let hash = self.hash_password(new_password)?;
        self.repo
            .upsert_password(account.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        self.repo.clear_reset_token(account.id).await?;
        info!(account_id = %account.id, "password_reset");
        Ok(())
    }

    /// Change the password of any account after verifying the current one.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_password_strength(new_password)?;
        let cred = self
            .repo
            .get_credentials(account_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(current_password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Validation("Current password is incorrect".into()));
        }

        let hash = self.hash_password(new_password)?;
        self.repo
            .upsert_password(account_id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(%account_id, "password_changed");
        Ok(())
    }

    fn check_password_strength(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    async fn verify_account_password(&self, account_id: Uuid, password: &str) -> Result<(), AuthError> {
        let cred = self
            .repo
            .get_credentials(account_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }

    fn issue_token(&self, account_id: Uuid, role: &str) -> Result<Option<String>, AuthError> {
        let Some(secret) = &self.cfg.jwt_secret else {
            return Ok(None);
        };
        #[derive(serde::Serialize)]
        struct Claims<'a> {
            sub: String,
            role: &'a str,
            exp: usize,
        }
        let exp = (Utc::now() + Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: account_id.to_string(), role, exp };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc_with_secret() -> AuthService<MockAuthRepository> {
        let cfg = AuthConfig { jwt_secret: Some("test-secret".into()), ..AuthConfig::default() };
        AuthService::new(Arc::new(MockAuthRepository::default()), cfg)
    }

    fn register_input(email: &str) -> RegisterCustomerInput {
        RegisterCustomerInput { name: "Jane".into(), email: email.into(), password: "Secret123".into() }
    }

    #[tokio::test]
    async fn duplicate_customer_registration_conflicts() {
        let svc = svc_with_secret();
        svc.register_customer(register_input("jane@example.com")).await.unwrap();
        let err = svc.register_customer(register_input("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let svc = svc_with_secret();
        let mut input = register_input("short@example.com");
        input.password = "abc".into();
        let err = svc.register_customer(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = svc_with_secret();
        svc.register_customer(register_input("who@example.com")).await.unwrap();
        let err = svc
            .login_customer(LoginInput { email: "who@example.com".into(), password: "nope-nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn deactivated_manager_cannot_login() {
        let repo = Arc::new(MockAuthRepository::default());
        let cfg = AuthConfig { jwt_secret: Some("test-secret".into()), ..AuthConfig::default() };
        let svc = AuthService::new(Arc::clone(&repo), cfg);
        svc.register_manager(RegisterManagerInput {
            name: "Mel".into(),
            email: "mel@example.com".into(),
            password: "Secret123".into(),
            department: "editing".into(),
            permissions: None,
        })
        .await
        .unwrap();
        repo.deactivate_manager("mel@example.com");
        let err = svc
            .login_manager(LoginInput { email: "mel@example.com".into(), password: "Secret123".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Deactivated));
    }

    #[tokio::test]
    async fn reset_flow_round_trip() {
        let svc = svc_with_secret();
        svc.register_customer(register_input("reset@example.com")).await.unwrap();

        let token = svc.forgot_password("reset@example.com").await.unwrap();
        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);

        svc.reset_password(&token, "NewSecret1").await.unwrap();
        // token is single-use
        let err = svc.reset_password(&token, "NewSecret2").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let session = svc
            .login_customer(LoginInput { email: "reset@example.com".into(), password: "NewSecret1".into() })
            .await
            .unwrap();
        assert!(session.token.is_some());
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let svc = svc_with_secret();
        let account = svc.register_customer(register_input("chg@example.com")).await.unwrap();
        let err = svc.change_password(account.id, "wrong-current", "Another1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        svc.change_password(account.id, "Secret123", "Another1").await.unwrap();
        let session = svc
            .login_customer(LoginInput { email: "chg@example.com".into(), password: "Another1".into() })
            .await
            .unwrap();
        assert_eq!(session.account.name, "Jane");
    }

    #[tokio::test]
    async fn forgot_password_unknown_email_not_found() {
        let svc = svc_with_secret();
        let err = svc.forgot_password("ghost@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
