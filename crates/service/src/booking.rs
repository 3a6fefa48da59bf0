use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog;
use crate::errors::ServiceError;
use models::booking::{self, validate_time_label, STATUS_CANCELED, STATUS_COMPLETED, STATUS_PENDING};
use models::booking_history::{self, ACTOR_CUSTOMER, ACTOR_MANAGER};
use models::booking_progress;
use models::manager::{DEPT_CUSTOMER_SERVICE, DEPT_EDITING, DEPT_PHOTOGRAPHY};
use models::product_service::{self, CATEGORY_STUDIO};
use models::service_option;

pub const STUDIO_OPEN_HOUR: u32 = 8;
pub const STUDIO_CLOSE_HOUR: u32 = 19;
pub const STUDIO_SLOT_MINUTES: u32 = 15;
pub const STUDIO_SLOT_CAPACITY: usize = 3;

/// Fixed hourly offering for non-studio services.
pub const DEFAULT_SLOTS: [&str; 7] = ["09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00"];

const STUDIO_WINDOW_MESSAGE: &str =
    "Studio services are only available from November 22 to November 27, 2025";

/// The event window during which studio sessions run.
pub fn studio_event_window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 11, 22).expect("valid date"),
        NaiveDate::from_ymd_opt(2025, 11, 27).expect("valid date"),
    )
}

/// All 15-minute studio slots of a day, "08:00" through "18:45".
pub fn studio_slot_grid() -> Vec<String> {
    let mut slots = Vec::new();
    for hour in STUDIO_OPEN_HOUR..STUDIO_CLOSE_HOUR {
        for minute in (0..60).step_by(STUDIO_SLOT_MINUTES as usize) {
            slots.push(format!("{hour:02}:{minute:02}"));
        }
    }
    slots
}

/// Filter the slot grid down to slots whose booking count is below capacity.
///
/// Counting happens after the fact; nothing stops two concurrent bookings
/// from landing on the last free slot.
pub fn available_studio_slots(booked_times: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for time in booked_times {
        *counts.entry(time.as_str()).or_insert(0) += 1;
    }
    studio_slot_grid()
        .into_iter()
        .filter(|slot| counts.get(slot.as_str()).copied().unwrap_or(0) < STUDIO_SLOT_CAPACITY)
        .collect()
}

/// Workflow statuses a department's managers may apply to a booking.
pub fn allowed_statuses(department: &str) -> &'static [&'static str] {
    match department {
        DEPT_PHOTOGRAPHY => &["On-going Session", "Sorting", "Editing Quality Checking (EQC)"],
        DEPT_EDITING => &["Editing"],
        DEPT_CUSTOMER_SERVICE => &[
            "Printing Quality Checking (PQC)",
            "Packaging",
            "Posting",
            "Delivered",
        ],
        _ => &[],
    }
}

/// Base price plus the deltas of the selected options.
pub fn compute_price(
    base_price: i64,
    options: &[service_option::Model],
    selected: &[Uuid],
) -> i64 {
    let extras: i64 = options
        .iter()
        .filter(|opt| selected.contains(&opt.id))
        .map(|opt| opt.additional_price)
        .sum();
    base_price + extras
}

/// Who is acting on a booking; managers bypass the ownership check.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub is_manager: bool,
}

impl Actor {
    fn role(&self) -> &'static str {
        if self.is_manager { ACTOR_MANAGER } else { ACTOR_CUSTOMER }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingInput {
    pub service_id: Uuid,
    #[serde(default)]
    pub option_ids: Vec<Uuid>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub total_price: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// A booking with its catalog entry attached.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithService {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub service_details: Option<product_service::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    pub booking: BookingWithService,
    pub progress: Option<booking_progress::Model>,
    pub history: Vec<booking_history::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    pub available_slots: Vec<String>,
    pub message: String,
}

async fn append_history(
    db: &DatabaseConnection,
    booking_id: Uuid,
    action: &str,
    description: String,
    actor: Actor,
    previous_status: Option<String>,
    new_status: Option<String>,
) -> Result<booking_history::Model, ServiceError> {
    // id is left NotSet so the DB assigns the next sequence value
    let am = booking_history::ActiveModel {
        booking_id: Set(booking_id),
        action: Set(action.to_string()),
        description: Set(description),
        performed_by: Set(actor.id),
        actor_role: Set(actor.role().to_string()),
        previous_status: Set(previous_status),
        new_status: Set(new_status),
        timestamp: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

async fn find_booking(db: &DatabaseConnection, id: Uuid) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))
}

fn check_ownership(b: &booking::Model, actor: Actor) -> Result<(), ServiceError> {
    if !actor.is_manager && b.customer_id != actor.id {
        return Err(ServiceError::Forbidden("not your booking".into()));
    }
    Ok(())
}

/// Create a booking together with its progress tracker and audit entry.
///
/// The three inserts run back to back without a transaction; a failure
/// partway through leaves the later records missing.
#[instrument(skip(db, input), fields(customer_id = %customer_id, service_id = %input.service_id))]
pub async fn create_booking(
    db: &DatabaseConnection,
    customer_id: Uuid,
    input: CreateBookingInput,
) -> Result<(BookingWithService, booking_progress::Model), ServiceError> {
    let service = product_service::Entity::find_by_id(input.service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    validate_time_label(&input.time)?;

    let options = service_option::Entity::find()
        .filter(service_option::Column::ServiceId.eq(service.id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let price = compute_price(service.price, &options, &input.option_ids);
    let total_price = input.total_price.unwrap_or(price);

    let now = Utc::now();
    let created = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        service_id: Set(service.id),
        date: Set(input.date),
        time: Set(input.time),
        price: Set(price),
        total_price: Set(total_price),
        status: Set(STATUS_PENDING.to_string()),
        payment_status: Set(booking::PAYMENT_PENDING.to_string()),
        notes: Set(input.notes),
        order_id: Set(input.order_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    let progress = booking_progress::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(created.id),
        steps: Set(booking_progress::initial_steps(now.into())),
        current_step: Set(1),
        is_completed: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .map_err(|e| ServiceError::Db(e.to_string()))?;

    append_history(
        db,
        created.id,
        booking_history::ACTION_CREATE,
        "Booking created by customer".to_string(),
        Actor { id: customer_id, is_manager: false },
        None,
        Some(STATUS_PENDING.to_string()),
    )
    .await?;

    info!(booking_id = %created.id, price, "booking_created");
    Ok((BookingWithService { booking: created, service_details: Some(service) }, progress))
}

/// The customer's bookings, newest first.
pub async fn list_customer_bookings(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<Vec<BookingWithService>, ServiceError> {
    let rows = booking::Entity::find()
        .filter(booking::Column::CustomerId.eq(customer_id))
        .order_by_desc(booking::Column::CreatedAt)
        .find_also_related(product_service::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows
        .into_iter()
        .map(|(b, service)| BookingWithService { booking: b, service_details: service })
        .collect())
}

/// Every booking in the system, newest first.
pub async fn list_all_bookings(db: &DatabaseConnection) -> Result<Vec<BookingWithService>, ServiceError> {
    let rows = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .find_also_related(product_service::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows
        .into_iter()
        .map(|(b, service)| BookingWithService { booking: b, service_details: service })
        .collect())
}

/// Booking with progress and audit trail; owners and managers only.
pub async fn get_booking(
    db: &DatabaseConnection,
    booking_id: Uuid,
    actor: Actor,
) -> Result<BookingDetail, ServiceError> {
    let b = find_booking(db, booking_id).await?;
    check_ownership(&b, actor)?;

    let service = product_service::Entity::find_by_id(b.service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let progress = booking_progress::Entity::find()
        .filter(booking_progress::Column::BookingId.eq(booking_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let history = booking_history::Entity::find()
        .filter(booking_history::Column::BookingId.eq(booking_id))
        .order_by_desc(booking_history::Column::Timestamp)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    Ok(BookingDetail {
        booking: BookingWithService { booking: b, service_details: service },
        progress,
        history,
    })
}

/// Relabel a booking's status on behalf of a manager; the target label must
/// be on the manager's department allow-list.
#[instrument(skip(db), fields(booking_id = %booking_id, new_status = %new_status))]
pub async fn update_status(
    db: &DatabaseConnection,
    booking_id: Uuid,
    new_status: &str,
    manager_id: Uuid,
    department: &str,
) -> Result<booking::Model, ServiceError> {
    if !allowed_statuses(department).contains(&new_status) {
        return Err(ServiceError::Forbidden(format!(
            "Managers in {department} cannot update status to '{new_status}'"
        )));
    }

    let b = find_booking(db, booking_id).await?;
    let previous_status = b.status.clone();
    let mut am: booking::ActiveModel = b.into();
    am.status = Set(new_status.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    append_history(
        db,
        booking_id,
        booking_history::ACTION_STATUS_UPDATE,
        format!("Status changed from '{previous_status}' to '{new_status}'"),
        Actor { id: manager_id, is_manager: true },
        Some(previous_status),
        Some(new_status.to_string()),
    )
    .await?;

    info!(booking_id = %updated.id, "booking_status_updated");
    Ok(updated)
}

/// Cancel a booking; completed bookings stay completed.
#[instrument(skip(db, actor), fields(booking_id = %booking_id))]
pub async fn cancel_booking(
    db: &DatabaseConnection,
    booking_id: Uuid,
    actor: Actor,
) -> Result<booking::Model, ServiceError> {
    let b = find_booking(db, booking_id).await?;
    check_ownership(&b, actor)?;

    if b.status == STATUS_COMPLETED {
        return Err(ServiceError::Validation("Cannot cancel a completed booking".into()));
    }

    let previous_status = b.status.clone();
    let mut am: booking::ActiveModel = b.into();
    am.status = Set(STATUS_CANCELED.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    if let Some(progress) = booking_progress::Entity::find()
        .filter(booking_progress::Column::BookingId.eq(booking_id))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    {
        let mut pam: booking_progress::ActiveModel = progress.into();
        pam.is_completed = Set(true);
        pam.updated_at = Set(Utc::now().into());
        pam.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    }

    append_history(
        db,
        booking_id,
        booking_history::ACTION_CANCEL,
        format!("Booking canceled by {}", actor.role()),
        actor,
        Some(previous_status),
        Some(STATUS_CANCELED.to_string()),
    )
    .await?;

    info!(booking_id = %updated.id, "booking_canceled");
    Ok(updated)
}

/// Replace the booking's notes; owners and managers only.
pub async fn update_notes(
    db: &DatabaseConnection,
    booking_id: Uuid,
    actor: Actor,
    notes: Option<String>,
) -> Result<booking::Model, ServiceError> {
    let b = find_booking(db, booking_id).await?;
    check_ownership(&b, actor)?;

    let mut am: booking::ActiveModel = b.into();
    am.notes = Set(notes);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    append_history(
        db,
        booking_id,
        booking_history::ACTION_UPDATE_NOTES,
        "Booking notes updated".to_string(),
        actor,
        None,
        None,
    )
    .await?;

    Ok(updated)
}

/// Open slots for a service on a date.
///
/// Studio-category services use the 15-minute event grid with per-slot
/// capacity; everything else gets the fixed hourly list.
pub async fn available_slots(
    db: &DatabaseConnection,
    service_id: Uuid,
    date: NaiveDate,
) -> Result<SlotAvailability, ServiceError> {
    let service = match product_service::Entity::find_by_id(service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    {
        Some(service) => service,
        None => catalog::find_fallback_package(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))?,
    };

    if service.effective_category() != CATEGORY_STUDIO {
        return Ok(SlotAvailability {
            available_slots: DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
            message: "Available time slots".to_string(),
        });
    }

    let (window_start, window_end) = studio_event_window();
    if date < window_start || date > window_end {
        return Ok(SlotAvailability {
            available_slots: vec![],
            message: STUDIO_WINDOW_MESSAGE.to_string(),
        });
    }

    let rows = booking::Entity::find()
        .filter(booking::Column::Date.eq(date))
        .find_also_related(product_service::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let booked_times: Vec<String> = rows
        .into_iter()
        .filter(|(_, svc)| {
            svc.as_ref().map(|s| s.effective_category() == CATEGORY_STUDIO).unwrap_or(false)
        })
        .map(|(b, _)| b.time)
        .collect();

    let available = available_studio_slots(&booked_times);
    let message = if available.is_empty() {
        "No available time slots for the selected date".to_string()
    } else {
        "Available time slots for studio services".to_string()
    };
    Ok(SlotAvailability { available_slots: available, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_grid_is_quarter_hours_from_open_to_close() {
        let grid = studio_slot_grid();
        assert_eq!(grid.len(), 44);
        assert_eq!(grid.first().map(String::as_str), Some("08:00"));
        assert_eq!(grid.last().map(String::as_str), Some("18:45"));
        assert!(grid.contains(&"12:45".to_string()));
        assert!(!grid.contains(&"19:00".to_string()));
    }

    #[test]
    fn slots_disappear_exactly_at_capacity() {
        let twice = vec!["08:15".to_string(), "08:15".to_string()];
        assert!(available_studio_slots(&twice).contains(&"08:15".to_string()));

        let thrice = vec!["08:15".to_string(), "08:15".to_string(), "08:15".to_string()];
        let available = available_studio_slots(&thrice);
        assert!(!available.contains(&"08:15".to_string()));
        assert_eq!(available.len(), 43);
    }

    #[test]
    fn off_grid_times_do_not_consume_slots() {
        let odd = vec!["07:00".to_string(), "19:30".to_string()];
        assert_eq!(available_studio_slots(&odd).len(), 44);
    }

    #[test]
    fn department_allow_lists() {
        assert!(allowed_statuses(DEPT_PHOTOGRAPHY).contains(&"Sorting"));
        assert!(allowed_statuses(DEPT_EDITING).contains(&"Editing"));
        assert!(allowed_statuses(DEPT_CUSTOMER_SERVICE).contains(&"Delivered"));
        assert!(!allowed_statuses(DEPT_EDITING).contains(&"Delivered"));
        assert!(allowed_statuses("administration").is_empty());
        assert!(allowed_statuses("unknown").is_empty());
    }

    #[test]
    fn price_sums_only_selected_options() {
        let now = Utc::now().into();
        let opt = |id: Uuid, price: i64| service_option::Model {
            id,
            service_id: Uuid::new_v4(),
            name: "o".into(),
            description: None,
            additional_price: price,
            additional_duration_minutes: 0,
            created_at: now,
        };
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let options = vec![opt(a, 20), opt(b, 35)];
        assert_eq!(compute_price(80, &options, &[]), 80);
        assert_eq!(compute_price(80, &options, &[a]), 100);
        assert_eq!(compute_price(80, &options, &[a, b]), 135);
        // unknown ids are ignored
        assert_eq!(compute_price(80, &options, &[Uuid::new_v4()]), 80);
    }

    mod db_tests {
        use super::*;
        use crate::catalog::{create_service, CreateServiceInput, OptionInput};
        use crate::test_support::get_db;

        async fn studio_service(db: &sea_orm::DatabaseConnection) -> crate::catalog::ServiceWithOptions {
            create_service(
                db,
                CreateServiceInput {
                    name: format!("Session {}", Uuid::new_v4()),
                    description: "d".into(),
                    category: CATEGORY_STUDIO.into(),
                    price: 65,
                    duration_minutes: 15,
                    image: None,
                    web_ar_url: None,
                    available_days: None,
                    available_time_slots: None,
                    options: vec![OptionInput {
                        name: "Digital Copy".into(),
                        description: None,
                        additional_price: 20,
                        additional_duration_minutes: 0,
                    }],
                },
            )
            .await
            .expect("create studio service")
        }

        #[tokio::test]
        async fn booking_lifecycle() -> Result<(), anyhow::Error> {
            if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
            let db = get_db().await?;

            let cust = models::customer::create(&db, "Booker", &format!("bl_{}@example.com", Uuid::new_v4())).await?;
            let svc = studio_service(&db).await;
            let option_id = svc.options[0].id;
            let date = NaiveDate::from_ymd_opt(2025, 11, 24).expect("valid date");

            let (created, progress) = create_booking(
                &db,
                cust.id,
                CreateBookingInput {
                    service_id: svc.service.id,
                    option_ids: vec![option_id],
                    date,
                    time: "08:15".into(),
                    notes: None,
                    total_price: None,
                    order_id: None,
                },
            )
            .await?;
            assert_eq!(created.booking.price, 85);
            assert_eq!(created.booking.status, STATUS_PENDING);
            assert_eq!(progress.steps.0.len(), 5);

            let actor = Actor { id: cust.id, is_manager: false };
            let detail = get_booking(&db, created.booking.id, actor).await?;
            assert_eq!(detail.history.len(), 1);
            assert_eq!(detail.history[0].action, booking_history::ACTION_CREATE);

            // a stranger cannot read it
            let stranger = Actor { id: Uuid::new_v4(), is_manager: false };
            let denied = get_booking(&db, created.booking.id, stranger).await;
            assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

            let canceled = cancel_booking(&db, created.booking.id, actor).await?;
            assert_eq!(canceled.status, STATUS_CANCELED);
            let detail = get_booking(&db, created.booking.id, actor).await?;
            assert!(detail.progress.as_ref().map(|p| p.is_completed).unwrap_or(false));
            assert_eq!(detail.history.len(), 2);

            models::booking::Entity::delete_by_id(created.booking.id).exec(&db).await?;
            models::product_service::Entity::delete_by_id(svc.service.id).exec(&db).await?;
            models::customer::Entity::delete_by_id(cust.id).exec(&db).await?;
            Ok(())
        }

        #[tokio::test]
        async fn completed_booking_cannot_be_canceled() -> Result<(), anyhow::Error> {
            if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
            let db = get_db().await?;

            let cust = models::customer::create(&db, "Done", &format!("dn_{}@example.com", Uuid::new_v4())).await?;
            let svc = studio_service(&db).await;
            let date = NaiveDate::from_ymd_opt(2025, 11, 24).expect("valid date");
            let (created, _) = create_booking(
                &db,
                cust.id,
                CreateBookingInput {
                    service_id: svc.service.id,
                    option_ids: vec![],
                    date,
                    time: "09:00".into(),
                    notes: None,
                    total_price: None,
                    order_id: None,
                },
            )
            .await?;

            let mut am: booking::ActiveModel = find_booking(&db, created.booking.id).await?.into();
            am.status = Set(STATUS_COMPLETED.to_string());
            am.update(&db).await?;

            let actor = Actor { id: cust.id, is_manager: false };
            let err = cancel_booking(&db, created.booking.id, actor).await;
            assert!(matches!(err, Err(ServiceError::Validation(_))));

            models::booking::Entity::delete_by_id(created.booking.id).exec(&db).await?;
            models::product_service::Entity::delete_by_id(svc.service.id).exec(&db).await?;
            models::customer::Entity::delete_by_id(cust.id).exec(&db).await?;
            Ok(())
        }

        #[tokio::test]
        async fn department_gate_on_status_updates() -> Result<(), anyhow::Error> {
            if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
            let db = get_db().await?;

            let cust = models::customer::create(&db, "Gate", &format!("gt_{}@example.com", Uuid::new_v4())).await?;
            let mgr = models::manager::create(
                &db,
                "Editor",
                &format!("ed_{}@example.com", Uuid::new_v4()),
                DEPT_EDITING,
                None,
            )
            .await?;
            let svc = studio_service(&db).await;
            let date = NaiveDate::from_ymd_opt(2025, 11, 25).expect("valid date");
            let (created, _) = create_booking(
                &db,
                cust.id,
                CreateBookingInput {
                    service_id: svc.service.id,
                    option_ids: vec![],
                    date,
                    time: "10:30".into(),
                    notes: None,
                    total_price: None,
                    order_id: None,
                },
            )
            .await?;

            let denied = update_status(&db, created.booking.id, "Delivered", mgr.id, &mgr.department).await;
            assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

            let updated = update_status(&db, created.booking.id, "Editing", mgr.id, &mgr.department).await?;
            assert_eq!(updated.status, "Editing");

            let detail = get_booking(&db, created.booking.id, Actor { id: mgr.id, is_manager: true }).await?;
            let statuses: Vec<_> = detail.history.iter().map(|h| h.action.as_str()).collect();
            assert!(statuses.contains(&booking_history::ACTION_STATUS_UPDATE));

            models::booking::Entity::delete_by_id(created.booking.id).exec(&db).await?;
            models::product_service::Entity::delete_by_id(svc.service.id).exec(&db).await?;
            models::customer::Entity::delete_by_id(cust.id).exec(&db).await?;
            models::manager::Entity::delete_by_id(mgr.id).exec(&db).await?;
            Ok(())
        }

        #[tokio::test]
        async fn full_studio_slot_is_excluded() -> Result<(), anyhow::Error> {
            if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
            let db = get_db().await?;

            let cust = models::customer::create(&db, "Slots", &format!("sl_{}@example.com", Uuid::new_v4())).await?;
            let svc = studio_service(&db).await;
            let date = NaiveDate::from_ymd_opt(2025, 11, 26).expect("valid date");

            let mut ids = Vec::new();
            for _ in 0..STUDIO_SLOT_CAPACITY {
                let (created, _) = create_booking(
                    &db,
                    cust.id,
                    CreateBookingInput {
                        service_id: svc.service.id,
                        option_ids: vec![],
                        date,
                        time: "11:45".into(),
                        notes: None,
                        total_price: None,
                        order_id: None,
                    },
                )
                .await?;
                ids.push(created.booking.id);
            }

            let slots = available_slots(&db, svc.service.id, date).await?;
            assert!(!slots.available_slots.contains(&"11:45".to_string()));

            // outside the event window nothing is offered
            let off = available_slots(
                &db,
                svc.service.id,
                NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
            )
            .await?;
            assert!(off.available_slots.is_empty());

            for id in ids {
                models::booking::Entity::delete_by_id(id).exec(&db).await?;
            }
            models::product_service::Entity::delete_by_id(svc.service.id).exec(&db).await?;
            models::customer::Entity::delete_by_id(cust.id).exec(&db).await?;
            Ok(())
        }

        #[tokio::test]
        async fn non_studio_services_use_fixed_slots() -> Result<(), anyhow::Error> {
            if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
            let db = get_db().await?;

            let svc = create_service(
                &db,
                CreateServiceInput {
                    name: format!("Portrait {}", Uuid::new_v4()),
                    description: "d".into(),
                    category: "portrait".into(),
                    price: 150,
                    duration_minutes: 60,
                    image: None,
                    web_ar_url: None,
                    available_days: None,
                    available_time_slots: None,
                    options: vec![],
                },
            )
            .await
            .expect("create portrait service");

            let date = NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date");
            let slots = available_slots(&db, svc.service.id, date).await?;
            let expected: Vec<String> = DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect();
            assert_eq!(slots.available_slots, expected);

            models::product_service::Entity::delete_by_id(svc.service.id).exec(&db).await?;
            Ok(())
        }
    }
}
