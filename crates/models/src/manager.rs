use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::customer::{validate_email, validate_name};
use crate::errors;

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super-admin";

pub const DEPT_PHOTOGRAPHY: &str = "photography";
pub const DEPT_EDITING: &str = "editing";
pub const DEPT_CUSTOMER_SERVICE: &str = "customer-service";
pub const DEPT_ADMINISTRATION: &str = "administration";

pub const DEPARTMENTS: [&str; 4] = [
    DEPT_PHOTOGRAPHY,
    DEPT_EDITING,
    DEPT_CUSTOMER_SERVICE,
    DEPT_ADMINISTRATION,
];

pub const DEFAULT_PERMISSIONS: [&str; 1] = ["manage-bookings"];

/// JSONB-backed list of permission names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PermissionList(pub Vec<String>);

impl Default for PermissionList {
    fn default() -> Self {
        Self(DEFAULT_PERMISSIONS.iter().map(|p| ToString::to_string(p)).collect())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "manager")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: PermissionList,
    pub is_active: bool,
    pub profile_image: Option<String>,
    pub last_login: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_department(department: &str) -> Result<(), errors::ModelError> {
    if !DEPARTMENTS.contains(&department) {
        return Err(errors::ModelError::Validation(format!(
            "unknown department '{department}'"
        )));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    department: &str,
    permissions: Option<Vec<String>>,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_name(name)?;
    validate_department(department)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_lowercase()),
        role: Set(ROLE_MANAGER.to_string()),
        department: Set(department.to_string()),
        permissions: Set(permissions.map(PermissionList).unwrap_or_default()),
        is_active: Set(true),
        profile_image: Set(None),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.to_lowercase()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn touch_last_login(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("manager not found".into()))?;
    let mut am: ActiveModel = found.into();
    am.last_login = Set(Some(Utc::now().into()));
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
