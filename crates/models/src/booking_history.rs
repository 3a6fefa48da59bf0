use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking;

pub const ACTION_CREATE: &str = "create";
pub const ACTION_CANCEL: &str = "cancel";
pub const ACTION_STATUS_UPDATE: &str = "status_update";
pub const ACTION_UPDATE_NOTES: &str = "update_notes";

pub const ACTOR_CUSTOMER: &str = "customer";
pub const ACTOR_MANAGER: &str = "manager";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub booking_id: Uuid,
    pub action: String,
    pub description: String,
    pub performed_by: Uuid,
    pub actor_role: String,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booking => Entity::belongs_to(booking::Entity)
                .from(Column::BookingId)
                .to(booking::Column::Id)
                .into(),
        }
    }
}

impl Related<booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
