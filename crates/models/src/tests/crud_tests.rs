use crate::db::connect;
use crate::{booking, booking_history, booking_progress, credentials, customer, manager, product_service, service_option};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;

    // Run migrations if needed
    migration::Migrator::up(&db, None).await?;

    Ok(db)
}

fn sample_service(name: &str, category: &str, price: i64) -> product_service::ActiveModel {
    let now = Utc::now().into();
    product_service::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set("test service".into()),
        category: Set(category.to_string()),
        price: Set(price),
        duration_minutes: Set(15),
        image: Set(None),
        web_ar_url: Set(None),
        is_active: Set(true),
        available_days: Set(product_service::DayList::default()),
        available_time_slots: Set(product_service::TimeSlotList::default()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Test customer CRUD and credentials upsert
#[tokio::test]
async fn test_customer_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("crud_{}@example.com", Uuid::new_v4());
    let created = customer::create(&db, "Crud Customer", &email).await?;
    assert_eq!(created.email, email);
    assert_eq!(created.session_timeout_minutes, 30);

    let found = customer::find_by_email(&db, &email).await?;
    assert_eq!(found.as_ref().map(|c| c.id), Some(created.id));

    // Credentials are stored apart from the account row
    let cred = credentials::upsert_password(&db, created.id, "hash-1".into(), "argon2").await?;
    assert_eq!(cred.account_id, created.id);
    let cred2 = credentials::upsert_password(&db, created.id, "hash-2".into(), "argon2").await?;
    assert_eq!(cred2.id, cred.id);
    assert_eq!(cred2.password_hash, "hash-2");

    customer::touch_last_active(&db, created.id).await?;
    let touched = customer::Entity::find_by_id(created.id).one(&db).await?.unwrap();
    assert!(touched.last_active >= created.last_active);

    credentials::Entity::delete_many()
        .filter(credentials::Column::AccountId.eq(created.id))
        .exec(&db)
        .await?;
    customer::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Test manager creation, department validation and deactivation flag
#[tokio::test]
async fn test_manager_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("mgr_{}@example.com", Uuid::new_v4());
    let created = manager::create(&db, "Crud Manager", &email, manager::DEPT_EDITING, None).await?;
    assert_eq!(created.role, manager::ROLE_MANAGER);
    assert!(created.is_active);
    assert_eq!(created.permissions.0, vec!["manage-bookings".to_string()]);

    let bad = manager::create(&db, "Bad", &format!("bad_{}@example.com", Uuid::new_v4()), "marketing", None).await;
    assert!(bad.is_err());

    manager::touch_last_login(&db, created.id).await?;
    let touched = manager::Entity::find_by_id(created.id).one(&db).await?.unwrap();
    assert!(touched.last_login.is_some());

    manager::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

/// Test service + option rows and the has_many relation
#[tokio::test]
async fn test_service_with_options() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let svc = sample_service(&format!("Frame {}", Uuid::new_v4()), product_service::CATEGORY_FRAME, 80)
        .insert(&db)
        .await?;

    let opt = service_option::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(svc.id),
        name: Set("Digital Copy".into()),
        description: Set(Some("High-resolution digital copy".into())),
        additional_price: Set(20),
        additional_duration_minutes: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await?;

    let pairs = product_service::Entity::find_by_id(svc.id)
        .find_with_related(service_option::Entity)
        .all(&db)
        .await?;
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1.len(), 1);
    assert_eq!(pairs[0].1[0].id, opt.id);

    // FK cascade removes the option with its service
    product_service::Entity::delete_by_id(svc.id).exec(&db).await?;
    let orphan = service_option::Entity::find_by_id(opt.id).one(&db).await?;
    assert!(orphan.is_none());
    Ok(())
}

/// Test booking row plus its progress and history companions
#[tokio::test]
async fn test_booking_lifecycle_rows() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;
    let now = Utc::now();

    let cust = customer::create(&db, "Booker", &format!("bk_{}@example.com", Uuid::new_v4())).await?;
    let svc = sample_service(&format!("Session {}", Uuid::new_v4()), product_service::CATEGORY_STUDIO, 65)
        .insert(&db)
        .await?;

    let bk = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(cust.id),
        service_id: Set(svc.id),
        date: Set(now.date_naive()),
        time: Set("08:15".into()),
        price: Set(65),
        total_price: Set(65),
        status: Set(booking::STATUS_PENDING.into()),
        payment_status: Set(booking::PAYMENT_PENDING.into()),
        notes: Set(None),
        order_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;

    let progress = booking_progress::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(bk.id),
        steps: Set(booking_progress::initial_steps(now.into())),
        current_step: Set(1),
        is_completed: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&db)
    .await?;
    assert_eq!(progress.steps.0.len(), 5);

    let hist = booking_history::ActiveModel {
        booking_id: Set(bk.id),
        action: Set(booking_history::ACTION_CREATE.into()),
        description: Set("Booking created by customer".into()),
        performed_by: Set(cust.id),
        actor_role: Set(booking_history::ACTOR_CUSTOMER.into()),
        previous_status: Set(None),
        new_status: Set(Some(booking::STATUS_PENDING.into())),
        timestamp: Set(now.into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert!(hist.id > 0);

    let with_service = booking::Entity::find_by_id(bk.id)
        .find_also_related(product_service::Entity)
        .one(&db)
        .await?
        .unwrap();
    assert_eq!(with_service.1.map(|s| s.id), Some(svc.id));

    // cascade from booking removes progress and history
    booking::Entity::delete_by_id(bk.id).exec(&db).await?;
    assert!(booking_progress::Entity::find_by_id(progress.id).one(&db).await?.is_none());
    assert!(booking_history::Entity::find_by_id(hist.id).one(&db).await?.is_none());

    product_service::Entity::delete_by_id(svc.id).exec(&db).await?;
    customer::Entity::delete_by_id(cust.id).exec(&db).await?;
    Ok(())
}
