use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking;

pub const STEP_PENDING: &str = "pending";
pub const STEP_IN_PROGRESS: &str = "in-progress";
pub const STEP_COMPLETED: &str = "completed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStep {
    pub step: String,
    pub description: String,
    pub status: String,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
}

/// JSONB-backed ordered step list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProgressStepList(pub Vec<ProgressStep>);

/// The five canonical steps every booking starts with: creation done,
/// confirmation underway, the rest pending.
pub fn initial_steps(now: DateTimeWithTimeZone) -> ProgressStepList {
    let step = |name: &str, description: &str, status: &str, completed_at| ProgressStep {
        step: name.to_string(),
        description: description.to_string(),
        status: status.to_string(),
        completed_at,
        notes: None,
    };
    ProgressStepList(vec![
        step(
            "Booking Created",
            "Your booking has been successfully created",
            STEP_COMPLETED,
            Some(now),
        ),
        step(
            "Confirmation",
            "Waiting for confirmation from the studio",
            STEP_IN_PROGRESS,
            None,
        ),
        step(
            "Preparation",
            "The studio is preparing for your service",
            STEP_PENDING,
            None,
        ),
        step("Service Day", "Your service will be delivered", STEP_PENDING, None),
        step("Completion", "Service has been completed", STEP_PENDING, None),
    ])
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: ProgressStepList,
    pub current_step: i32,
    pub is_completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn initial_steps_shape() {
        let steps = initial_steps(Utc::now().into()).0;
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].status, STEP_COMPLETED);
        assert!(steps[0].completed_at.is_some());
        assert_eq!(steps[1].status, STEP_IN_PROGRESS);
        assert!(steps[2..].iter().all(|s| s.status == STEP_PENDING));
    }
}
