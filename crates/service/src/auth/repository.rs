use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{AuthAccount, Credentials, ManagerAccount};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<AuthAccount>, AuthError>;
    async fn create_customer(&self, name: &str, email: &str) -> Result<AuthAccount, AuthError>;
    async fn touch_customer_last_active(&self, id: Uuid) -> Result<(), AuthError>;

    async fn find_manager_by_email(&self, email: &str) -> Result<Option<ManagerAccount>, AuthError>;
    async fn create_manager(
        &self,
        name: &str,
        email: &str,
        department: &str,
        permissions: Option<Vec<String>>,
    ) -> Result<ManagerAccount, AuthError>;
    async fn touch_manager_last_login(&self, id: Uuid) -> Result<(), AuthError>;

    async fn get_credentials(&self, account_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(
        &self,
        account_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError>;

    async fn set_reset_token(
        &self,
        customer_id: Uuid,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), AuthError>;
    /// Returns the customer holding `token` when the token has not expired at `now`.
    async fn find_customer_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthAccount>, AuthError>;
    async fn clear_reset_token(&self, customer_id: Uuid) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        customers: Mutex<HashMap<String, AuthAccount>>,          // key: email
        managers: Mutex<HashMap<String, ManagerAccount>>,        // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>,                // key: account_id
        resets: Mutex<HashMap<String, (Uuid, DateTime<Utc>)>>,   // key: token
    }

    impl MockAuthRepository {
        /// Flip a manager's active flag; login tests need a deactivated account.
        pub fn deactivate_manager(&self, email: &str) {
            if let Some(m) = self.managers.lock().unwrap().get_mut(email) {
                m.is_active = false;
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_customer_by_email(&self, email: &str) -> Result<Option<AuthAccount>, AuthError> {
            Ok(self.customers.lock().unwrap().get(email).cloned())
        }

        async fn create_customer(&self, name: &str, email: &str) -> Result<AuthAccount, AuthError> {
            let mut customers = self.customers.lock().unwrap();
            if customers.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let account = AuthAccount {
                id: Uuid::new_v4(),
                email: email.to_string(),
                name: name.to_string(),
                role: super::super::domain::ROLE_CUSTOMER.to_string(),
            };
            customers.insert(email.to_string(), account.clone());
            Ok(account)
        }

        async fn touch_customer_last_active(&self, _id: Uuid) -> Result<(), AuthError> {
            Ok(())
        }

        async fn find_manager_by_email(&self, email: &str) -> Result<Option<ManagerAccount>, AuthError> {
            Ok(self.managers.lock().unwrap().get(email).cloned())
        }

        async fn create_manager(
            &self,
            name: &str,
            email: &str,
            department: &str,
            permissions: Option<Vec<String>>,
        ) -> Result<ManagerAccount, AuthError> {
            let mut managers = self.managers.lock().unwrap();
            if managers.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let account = ManagerAccount {
                id: Uuid::new_v4(),
                email: email.to_string(),
                name: name.to_string(),
                role: super::super::domain::ROLE_MANAGER.to_string(),
                department: department.to_string(),
                permissions: permissions.unwrap_or_else(|| vec!["manage-bookings".to_string()]),
                is_active: true,
            };
            managers.insert(email.to_string(), account.clone());
            Ok(account)
        }

        async fn touch_manager_last_login(&self, _id: Uuid) -> Result<(), AuthError> {
            Ok(())
        }

        async fn get_credentials(&self, account_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            Ok(self.creds.lock().unwrap().get(&account_id).cloned())
        }

        async fn upsert_password(
            &self,
            account_id: Uuid,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { account_id, password_hash, password_algorithm };
            creds.insert(account_id, c.clone());
            Ok(c)
        }

        async fn set_reset_token(
            &self,
            customer_id: Uuid,
            token: &str,
            expires: DateTime<Utc>,
        ) -> Result<(), AuthError> {
            self.resets.lock().unwrap().insert(token.to_string(), (customer_id, expires));
            Ok(())
        }

        async fn find_customer_by_reset_token(
            &self,
            token: &str,
            now: DateTime<Utc>,
        ) -> Result<Option<AuthAccount>, AuthError> {
            let resets = self.resets.lock().unwrap();
            let Some((customer_id, expires)) = resets.get(token) else {
                return Ok(None);
            };
            if *expires <= now {
                return Ok(None);
            }
            let customers = self.customers.lock().unwrap();
            Ok(customers.values().find(|c| c.id == *customer_id).cloned())
        }

        async fn clear_reset_token(&self, customer_id: Uuid) -> Result<(), AuthError> {
            self.resets.lock().unwrap().retain(|_, (id, _)| *id != customer_id);
            Ok(())
        }
    }
}
