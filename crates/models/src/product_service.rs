use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service_option;

pub const CATEGORY_STUDIO: &str = "studio";
pub const CATEGORY_PORTRAIT: &str = "portrait";
pub const CATEGORY_EVENT: &str = "event";
pub const CATEGORY_FRAME: &str = "frame";

/// Studio package names; unknown service lookups fall back to these.
pub const PACKAGE_NAMES: [&str; 4] = ["Package A", "Package B", "Package C", "Package D"];

pub const WEEKDAYS: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// JSONB-backed weekday list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DayList(pub Vec<String>);

impl Default for DayList {
    fn default() -> Self {
        // weekdays only, matching the catalog default
        Self(WEEKDAYS[..5].iter().map(|d| ToString::to_string(d)).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotWindow {
    pub start_time: String,
    pub end_time: String,
}

/// JSONB-backed list of bookable time windows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TimeSlotList(pub Vec<TimeSlotWindow>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub duration_minutes: i32,
    pub image: Option<String>,
    pub web_ar_url: Option<String>,
    pub is_active: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub available_days: DayList,
    #[sea_orm(column_type = "JsonBinary")]
    pub available_time_slots: TimeSlotList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Studio packages always present as 15-minute studio sessions, even when
    /// edited into another category.
    pub fn effective_category(&self) -> &str {
        if PACKAGE_NAMES.contains(&self.name.as_str()) {
            CATEGORY_STUDIO
        } else {
            &self.category
        }
    }

    pub fn is_package(&self) -> bool {
        PACKAGE_NAMES.contains(&self.name.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Options,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Options => Entity::has_many(service_option::Entity).into(),
        }
    }
}

impl Related<service_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
