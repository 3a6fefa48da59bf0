use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{customer, manager};

/// Get a customer by id.
pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
    let found = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Update a customer's name and/or email.
pub async fn update_customer_profile(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<customer::Model, ServiceError> {
    if let Some(email) = email {
        customer::validate_email(email)?;
        let taken = customer::Entity::find()
            .filter(customer::Column::Email.eq(email.to_lowercase()))
            .filter(customer::Column::Id.ne(id))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if taken.is_some() {
            return Err(ServiceError::Validation("Email already in use".into()));
        }
    }
    let mut am: customer::ActiveModel = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("customer"))?
        .into();
    if let Some(name) = name {
        customer::validate_name(name)?;
        am.name = Set(name.to_string());
    }
    if let Some(email) = email {
        am.email = Set(email.to_lowercase());
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Store the public path of an uploaded profile image on the customer.
pub async fn set_customer_profile_image(
    db: &DatabaseConnection,
    id: Uuid,
    image_path: &str,
) -> Result<customer::Model, ServiceError> {
    let mut am: customer::ActiveModel = customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("customer"))?
        .into();
    am.profile_image = Set(Some(image_path.to_string()));
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Get a manager by id.
pub async fn get_manager(db: &DatabaseConnection, id: Uuid) -> Result<Option<manager::Model>, ServiceError> {
    let found = manager::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Update a manager's name and/or email.
pub async fn update_manager_profile(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<manager::Model, ServiceError> {
    if let Some(email) = email {
        customer::validate_email(email)?;
        let taken = manager::Entity::find()
            .filter(manager::Column::Email.eq(email.to_lowercase()))
            .filter(manager::Column::Id.ne(id))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if taken.is_some() {
            return Err(ServiceError::Validation("Email already in use".into()));
        }
    }
    let mut am: manager::ActiveModel = manager::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("manager"))?
        .into();
    if let Some(name) = name {
        customer::validate_name(name)?;
        am.name = Set(name.to_string());
    }
    if let Some(email) = email {
        am.email = Set(email.to_lowercase());
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}
