use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::product_service::{self, DayList, TimeSlotList, TimeSlotWindow, PACKAGE_NAMES};
use models::service_option;

/// A catalog entry with its option rows, as exposed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceWithOptions {
    #[serde(flatten)]
    pub service: product_service::Model,
    pub options: Vec<service_option::Model>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub additional_price: i64,
    #[serde(default)]
    pub additional_duration_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub duration_minutes: i32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub web_ar_url: Option<String>,
    #[serde(default)]
    pub available_days: Option<Vec<String>>,
    #[serde(default)]
    pub available_time_slots: Option<Vec<TimeSlotWindow>>,
    #[serde(default)]
    pub options: Vec<OptionInput>,
}

/// Partial update; `options`, when present, replaces the whole option list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub duration_minutes: Option<i32>,
    pub image: Option<String>,
    pub web_ar_url: Option<String>,
    pub is_active: Option<bool>,
    pub available_days: Option<Vec<String>>,
    pub available_time_slots: Option<Vec<TimeSlotWindow>>,
    pub options: Option<Vec<OptionInput>>,
}

fn validate_service_fields(name: &str, price: i64, duration_minutes: i32) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("service name required".into()));
    }
    if price < 0 {
        return Err(ServiceError::Validation("price must not be negative".into()));
    }
    if duration_minutes <= 0 {
        return Err(ServiceError::Validation("duration must be positive minutes".into()));
    }
    Ok(())
}

async fn insert_options(
    db: &DatabaseConnection,
    service_id: Uuid,
    options: &[OptionInput],
) -> Result<Vec<service_option::Model>, ServiceError> {
    let mut inserted = Vec::with_capacity(options.len());
    for opt in options {
        if opt.name.trim().is_empty() {
            return Err(ServiceError::Validation("option name required".into()));
        }
        let am = service_option::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_id: Set(service_id),
            name: Set(opt.name.clone()),
            description: Set(opt.description.clone()),
            additional_price: Set(opt.additional_price),
            additional_duration_minutes: Set(opt.additional_duration_minutes),
            created_at: Set(Utc::now().into()),
        };
        inserted.push(am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?);
    }
    Ok(inserted)
}

/// Create a catalog entry together with its options.
pub async fn create_service(
    db: &DatabaseConnection,
    input: CreateServiceInput,
) -> Result<ServiceWithOptions, ServiceError> {
    validate_service_fields(&input.name, input.price, input.duration_minutes)?;
    let now = Utc::now().into();
    let am = product_service::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        category: Set(input.category),
        price: Set(input.price),
        duration_minutes: Set(input.duration_minutes),
        image: Set(input.image),
        web_ar_url: Set(input.web_ar_url),
        is_active: Set(true),
        available_days: Set(input.available_days.map(DayList).unwrap_or_default()),
        available_time_slots: Set(TimeSlotList(input.available_time_slots.unwrap_or_default())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let service = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let options = insert_options(db, service.id, &input.options).await?;
    Ok(ServiceWithOptions { service, options })
}

/// Update a catalog entry; a provided option list replaces the stored one.
pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateServiceInput,
) -> Result<ServiceWithOptions, ServiceError> {
    let existing = product_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    let name = input.name.as_deref().unwrap_or(&existing.name);
    let price = input.price.unwrap_or(existing.price);
    let duration = input.duration_minutes.unwrap_or(existing.duration_minutes);
    validate_service_fields(name, price, duration)?;

    let mut am: product_service::ActiveModel = existing.into();
    if let Some(name) = input.name { am.name = Set(name); }
    if let Some(description) = input.description { am.description = Set(description); }
    if let Some(category) = input.category { am.category = Set(category); }
    if let Some(price) = input.price { am.price = Set(price); }
    if let Some(duration) = input.duration_minutes { am.duration_minutes = Set(duration); }
    if let Some(image) = input.image { am.image = Set(Some(image)); }
    if let Some(url) = input.web_ar_url { am.web_ar_url = Set(Some(url)); }
    if let Some(active) = input.is_active { am.is_active = Set(active); }
    if let Some(days) = input.available_days { am.available_days = Set(DayList(days)); }
    if let Some(slots) = input.available_time_slots {
        am.available_time_slots = Set(TimeSlotList(slots));
    }
    am.updated_at = Set(Utc::now().into());
    let service = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let options = if let Some(options) = input.options {
        service_option::Entity::delete_many()
            .filter(service_option::Column::ServiceId.eq(service.id))
            .exec(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        insert_options(db, service.id, &options).await?
    } else {
        list_options(db, service.id).await?
    };
    Ok(ServiceWithOptions { service, options })
}

/// Delete a catalog entry; its options go with it via FK cascade.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let existing = product_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    product_service::Entity::delete_by_id(existing.id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

async fn list_options(
    db: &DatabaseConnection,
    service_id: Uuid,
) -> Result<Vec<service_option::Model>, ServiceError> {
    service_option::Entity::find()
        .filter(service_option::Column::ServiceId.eq(service_id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Resolve a service by id, falling back to the first studio package when the
/// id is unknown (stale package links on the client keep working).
pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<ServiceWithOptions, ServiceError> {
    let found = product_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let service = match found {
        Some(service) => service,
        None => find_fallback_package(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))?,
    };
    let mut service = service;
    if service.is_package() {
        service.category = models::product_service::CATEGORY_STUDIO.to_string();
        service.duration_minutes = 15;
    }
    let options = list_options(db, service.id).await?;
    Ok(ServiceWithOptions { service, options })
}

pub(crate) async fn find_fallback_package(
    db: &DatabaseConnection,
) -> Result<Option<product_service::Model>, ServiceError> {
    product_service::Entity::find()
        .filter(product_service::Column::Name.is_in(PACKAGE_NAMES))
        .order_by_asc(product_service::Column::Name)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// List the whole catalog; an empty catalog is seeded with the defaults first.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<ServiceWithOptions>, ServiceError> {
    let mut rows = fetch_all(db).await?;
    if rows.is_empty() {
        info!("catalog empty, seeding default services");
        seed_default_catalog(db).await?;
        rows = fetch_all(db).await?;
    }
    Ok(rows)
}

async fn fetch_all(db: &DatabaseConnection) -> Result<Vec<ServiceWithOptions>, ServiceError> {
    let pairs = product_service::Entity::find()
        .order_by_asc(product_service::Column::Name)
        .find_with_related(service_option::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(pairs
        .into_iter()
        .map(|(service, options)| ServiceWithOptions { service, options })
        .collect())
}

struct SeedEntry {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: i64,
    duration_minutes: i32,
    web_ar_url: Option<&'static str>,
    days: Option<&'static [&'static str]>,
    options: &'static [(&'static str, &'static str, i64)],
}

const FRAME_AR_URL: &str = "https://mywebar.com/p/Project_0_fd100hw4ji";
const FRAME_DAYS: &[&str] = &["monday", "tuesday", "wednesday", "thursday", "friday", "saturday"];

const DEFAULT_CATALOG: &[SeedEntry] = &[
    SeedEntry {
        name: "Package A",
        description: "Basic photography package with essential services.",
        category: "studio",
        price: 65,
        duration_minutes: 15,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Package B",
        description: "Standard photography package with additional editing services.",
        category: "studio",
        price: 75,
        duration_minutes: 15,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Package C",
        description: "Premium photography package with advanced editing and prints.",
        category: "studio",
        price: 90,
        duration_minutes: 15,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Package D",
        description: "Complete photography package with all premium services included.",
        category: "studio",
        price: 115,
        duration_minutes: 15,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Portrait Photography",
        description: "Professional portrait sessions for individuals, couples, or families.",
        category: "portrait",
        price: 150,
        duration_minutes: 60,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Wedding Photography",
        description: "Full-day coverage of your special day with edited photos and albums.",
        category: "event",
        price: 1200,
        duration_minutes: 480,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Commercial Photography",
        description: "High-quality product and branding photography for businesses.",
        category: "portrait",
        price: 500,
        duration_minutes: 180,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Event Photography",
        description: "Coverage for special events, parties, and corporate functions.",
        category: "event",
        price: 350,
        duration_minutes: 120,
        web_ar_url: None,
        days: None,
        options: &[],
    },
    SeedEntry {
        name: "Horizontal Frame",
        description: "Professional horizontal frame photography for portraits and group photos.",
        category: "frame",
        price: 80,
        duration_minutes: 30,
        web_ar_url: Some(FRAME_AR_URL),
        days: Some(FRAME_DAYS),
        options: &[
            ("Digital Copy", "High-resolution digital copy of all photos", 20),
            ("Print Package", "Professional prints in various sizes", 35),
        ],
    },
    SeedEntry {
        name: "Vertical Frame",
        description: "Professional vertical frame photography perfect for individual portraits.",
        category: "frame",
        price: 75,
        duration_minutes: 30,
        web_ar_url: Some(FRAME_AR_URL),
        days: Some(FRAME_DAYS),
        options: &[
            ("Digital Copy", "High-resolution digital copy of all photos", 20),
            ("Professional Retouching", "Advanced photo retouching and enhancement", 25),
        ],
    },
];

/// Insert the default catalog (studio packages, session offerings, frames).
pub async fn seed_default_catalog(db: &DatabaseConnection) -> Result<(), ServiceError> {
    for entry in DEFAULT_CATALOG {
        let input = CreateServiceInput {
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            category: entry.category.to_string(),
            price: entry.price,
            duration_minutes: entry.duration_minutes,
            image: None,
            web_ar_url: entry.web_ar_url.map(str::to_string),
            available_days: entry.days.map(|days| days.iter().map(|d| d.to_string()).collect()),
            available_time_slots: None,
            options: entry
                .options
                .iter()
                .map(|(name, description, price)| OptionInput {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    additional_price: *price,
                    additional_duration_minutes: 0,
                })
                .collect(),
        };
        create_service(db, input).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[test]
    fn default_catalog_covers_packages_and_frames() {
        let names: Vec<&str> = DEFAULT_CATALOG.iter().map(|e| e.name).collect();
        for package in PACKAGE_NAMES {
            assert!(names.contains(&package), "{package} missing from seed");
        }
        assert!(names.contains(&"Horizontal Frame"));
        assert!(names.contains(&"Vertical Frame"));
        // frames carry paid options
        let frames: Vec<_> = DEFAULT_CATALOG.iter().filter(|e| e.category == "frame").collect();
        assert!(frames.iter().all(|e| !e.options.is_empty()));
    }

    #[tokio::test]
    async fn service_crud_round_trip() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let created = create_service(
            &db,
            CreateServiceInput {
                name: format!("Test Frame {}", Uuid::new_v4()),
                description: "d".into(),
                category: "frame".into(),
                price: 80,
                duration_minutes: 30,
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
        .await?;
        assert_eq!(created.options.len(), 1);

        let fetched = get_service(&db, created.service.id).await?;
        assert_eq!(fetched.service.id, created.service.id);

        let updated = update_service(
            &db,
            created.service.id,
            UpdateServiceInput {
                price: Some(95),
                options: Some(vec![
                    OptionInput {
                        name: "Digital Copy".into(),
                        description: None,
                        additional_price: 20,
                        additional_duration_minutes: 0,
                    },
                    OptionInput {
                        name: "Print Package".into(),
                        description: None,
                        additional_price: 35,
                        additional_duration_minutes: 0,
                    },
                ]),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.service.price, 95);
        assert_eq!(updated.options.len(), 2);

        delete_service(&db, created.service.id).await?;
        let gone = delete_service(&db, created.service.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn negative_price_is_rejected() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let err = create_service(
            &db,
            CreateServiceInput {
                name: "Broken".into(),
                description: "d".into(),
                category: "frame".into(),
                price: -1,
                duration_minutes: 30,
                image: None,
                web_ar_url: None,
                available_days: None,
                available_time_slots: None,
                options: vec![],
            },
        )
        .await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
