use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{customer, product_service};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELED: &str = "canceled";
pub const STATUS_COMPLETED: &str = "completed";

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_REFUNDED: &str = "refunded";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub date: Date,
    /// "HH:MM" slot label.
    pub time: String,
    pub price: i64,
    pub total_price: i64,
    /// One of the canonical statuses or a department workflow label.
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub order_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(product_service::Entity)
                .from(Column::ServiceId)
                .to(product_service::Column::Id)
                .into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<product_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// "HH:MM" with a 24h hour and zero-padded minutes.
pub fn validate_time_label(time: &str) -> Result<(), crate::errors::ModelError> {
    let invalid = || crate::errors::ModelError::Validation(format!("invalid time '{time}', expected HH:MM"));
    let (h, m) = time.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_time_label;

    #[test]
    fn accepts_slot_labels() {
        for t in ["00:00", "08:15", "18:45", "23:59"] {
            assert!(validate_time_label(t).is_ok(), "{t}");
        }
    }

    #[test]
    fn rejects_malformed_labels() {
        for t in ["8:15", "08:5", "24:00", "12:60", "noon", "12-30", ""] {
            assert!(validate_time_label(t).is_err(), "{t}");
        }
    }
}
