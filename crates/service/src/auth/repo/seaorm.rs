use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::auth::domain::{AuthAccount, Credentials, ManagerAccount, ROLE_CUSTOMER};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn customer_account(c: models::customer::Model) -> AuthAccount {
    AuthAccount { id: c.id, email: c.email, name: c.name, role: ROLE_CUSTOMER.to_string() }
}

fn manager_account(m: models::manager::Model) -> ManagerAccount {
    ManagerAccount {
        id: m.id,
        email: m.email,
        name: m.name,
        role: m.role,
        department: m.department,
        permissions: m.permissions.0,
        is_active: m.is_active,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<AuthAccount>, AuthError> {
        let res = models::customer::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(customer_account))
    }

    async fn create_customer(&self, name: &str, email: &str) -> Result<AuthAccount, AuthError> {
        let created = models::customer::create(&self.db, name, email)
            .await
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(customer_account(created))
    }

    async fn touch_customer_last_active(&self, id: Uuid) -> Result<(), AuthError> {
        models::customer::touch_last_active(&self.db, id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn find_manager_by_email(&self, email: &str) -> Result<Option<ManagerAccount>, AuthError> {
        let res = models::manager::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(manager_account))
    }

    async fn create_manager(
        &self,
        name: &str,
        email: &str,
        department: &str,
        permissions: Option<Vec<String>>,
    ) -> Result<ManagerAccount, AuthError> {
        let created = models::manager::create(&self.db, name, email, department, permissions)
            .await
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(manager_account(created))
    }

    async fn touch_manager_last_login(&self, id: Uuid) -> Result<(), AuthError> {
        models::manager::touch_last_login(&self.db, id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn get_credentials(&self, account_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::credentials::find_by_account(&self.db, account_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| Credentials {
            account_id: c.account_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(
        &self,
        account_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let c = models::credentials::upsert_password(&self.db, account_id, password_hash, &password_algorithm)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials {
            account_id: c.account_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        })
    }

    async fn set_reset_token(
        &self,
        customer_id: Uuid,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let found = models::customer::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .ok_or(AuthError::NotFound)?;
        let mut am: models::customer::ActiveModel = found.into();
        am.reset_password_token = Set(Some(token.to_string()));
        am.reset_password_expires = Set(Some(expires.into()));
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }

    async fn find_customer_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthAccount>, AuthError> {
        use sea_orm::{ColumnTrait, QueryFilter};
        let res = models::customer::Entity::find()
            .filter(models::customer::Column::ResetPasswordToken.eq(token.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        // expiry is checked here rather than in SQL so the window is measured
        // against the caller's clock
        Ok(res
            .filter(|c| c.reset_password_expires.map(|exp| exp > now).unwrap_or(false))
            .map(customer_account))
    }

    async fn clear_reset_token(&self, customer_id: Uuid) -> Result<(), AuthError> {
        let found = models::customer::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .ok_or(AuthError::NotFound)?;
        let mut am: models::customer::ActiveModel = found.into();
        am.reset_password_token = Set(None);
        am.reset_password_expires = Set(None);
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }
}
