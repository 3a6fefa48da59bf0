use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::booking::{self, STATUS_COMPLETED, STATUS_PENDING};
use models::{customer, product_service};

const RECENT_ACTIVITY_LIMIT: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct StatTotals {
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub completed_bookings: u64,
    pub total_revenue: i64,
    pub total_customers: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub time: chrono::DateTime<chrono::FixedOffset>,
    pub description: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub stats: StatTotals,
    pub recent_activity: Vec<ActivityEntry>,
}

/// A customer row with aggregate spend, for the dashboard customer list.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithStats {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub booking_count: u64,
    pub total_spent: i64,
}

/// A booking row enriched with customer contact info and service details.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerBookingRow {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub service_details: Option<product_service::Model>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Booking totals, completed revenue, and the five newest bookings as an
/// activity feed.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
    let total_bookings = booking::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let pending_bookings = booking::Entity::find()
        .filter(booking::Column::Status.eq(STATUS_PENDING))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let completed_bookings = booking::Entity::find()
        .filter(booking::Column::Status.eq(STATUS_COMPLETED))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let total_customers = customer::Entity::find()
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let completed = booking::Entity::find()
        .filter(booking::Column::Status.eq(STATUS_COMPLETED))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let total_revenue: i64 = completed.iter().map(|b| b.price).sum();

    let recent = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .limit(RECENT_ACTIVITY_LIMIT)
        .find_also_related(customer::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let recent_activity = recent
        .into_iter()
        .map(|(b, cust)| ActivityEntry {
            time: b.created_at,
            description: format!(
                "New booking received from {}",
                cust.map(|c| c.name).unwrap_or_else(|| "Unknown Customer".to_string())
            ),
            kind: "booking".to_string(),
        })
        .collect();

    Ok(DashboardStats {
        stats: StatTotals {
            total_bookings,
            pending_bookings,
            completed_bookings,
            total_revenue,
            total_customers,
        },
        recent_activity,
    })
}

/// Every customer, newest first, with booking count and completed spend.
pub async fn list_customers_with_stats(
    db: &DatabaseConnection,
) -> Result<Vec<CustomerWithStats>, ServiceError> {
    let customers = customer::Entity::find()
        .order_by_desc(customer::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let bookings = booking::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    // one pass over the (bounded) booking set instead of a query per customer
    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    let mut spent: HashMap<Uuid, i64> = HashMap::new();
    for b in &bookings {
        *counts.entry(b.customer_id).or_insert(0) += 1;
        if b.status == STATUS_COMPLETED {
            *spent.entry(b.customer_id).or_insert(0) += b.price;
        }
    }

    Ok(customers
        .into_iter()
        .map(|c| {
            let booking_count = counts.get(&c.id).copied().unwrap_or(0);
            let total_spent = spent.get(&c.id).copied().unwrap_or(0);
            CustomerWithStats { customer: c, booking_count, total_spent }
        })
        .collect())
}

/// Every booking with customer contact info and service details, newest first.
pub async fn list_bookings_with_customers(
    db: &DatabaseConnection,
) -> Result<Vec<ManagerBookingRow>, ServiceError> {
    let rows = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .find_also_related(product_service::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let customer_ids: Vec<Uuid> = rows.iter().map(|(b, _)| b.customer_id).collect();
    let customers = customer::Entity::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let by_id: HashMap<Uuid, &customer::Model> = customers.iter().map(|c| (c.id, c)).collect();

    Ok(rows
        .into_iter()
        .map(|(b, service)| {
            let cust = by_id.get(&b.customer_id);
            ManagerBookingRow {
                customer_name: cust.map(|c| c.name.clone()),
                customer_email: cust.map(|c| c.email.clone()),
                booking: b,
                service_details: service,
            }
        })
        .collect())
}

/// Paginated variant of [`list_bookings_with_customers`] for large histories.
pub async fn list_bookings_with_customers_paginated(
    db: &DatabaseConnection,
    opts: common::pagination::Pagination,
) -> Result<Vec<ManagerBookingRow>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let page = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let service_ids: Vec<Uuid> = page.iter().map(|b| b.service_id).collect();
    let services = product_service::Entity::find()
        .filter(product_service::Column::Id.is_in(service_ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let services_by_id: HashMap<Uuid, product_service::Model> =
        services.into_iter().map(|s| (s.id, s)).collect();

    let customer_ids: Vec<Uuid> = page.iter().map(|b| b.customer_id).collect();
    let customers = customer::Entity::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let by_id: HashMap<Uuid, &customer::Model> = customers.iter().map(|c| (c.id, c)).collect();

    Ok(page
        .into_iter()
        .map(|b| {
            let cust = by_id.get(&b.customer_id);
            ManagerBookingRow {
                customer_name: cust.map(|c| c.name.clone()),
                customer_email: cust.map(|c| c.email.clone()),
                service_details: services_by_id.get(&b.service_id).cloned(),
                booking: b,
            }
        })
        .collect())
}
