//! Database seeder for Hourglass development and testing.
//!
//! Seeds an admin, a few employees with employment start dates, and last
//! month's weekly time entries so the accrual run has something to count.
//! Prints bearer tokens for the seeded users when a JWT secret is configured.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use hourglass_db::{
    TimesheetRepository,
    entities::users,
    repositories::CreateTaskEntryInput,
};
use hourglass_shared::{AppConfig, JwtService, Role};

/// Admin user ID (stable across seeds).
const ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_7000_8000_0000_0000_0001);

/// Employees: id, email, name, start date, days worked per week.
const EMPLOYEES: [(u128, &str, &str, (i32, u32, u32), usize); 3] = [
    (0x0000_0000_0000_7000_8000_0000_0000_0002, "ada@hourglass.dev", "Ada Park", (2023, 2, 1), 5),
    (0x0000_0000_0000_7000_8000_0000_0000_0003, "ben@hourglass.dev", "Ben Ortiz", (2024, 9, 16), 2),
    (0x0000_0000_0000_7000_8000_0000_0000_0004, "cy@hourglass.dev", "Cy Moreau", (2099, 1, 1), 5),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("HOURGLASS__DATABASE__URL"))
        .context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = hourglass_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    println!("Seeding admin...");
    seed_user(&db, ADMIN_ID, "admin@hourglass.dev", "Hourglass Admin", None).await?;

    println!("Seeding employees and time entries...");
    let timesheets = TimesheetRepository::new(db.clone());
    for (id, email, name, (y, m, d), days_per_week) in EMPLOYEES {
        let id = Uuid::from_u128(id);
        let start = NaiveDate::from_ymd_opt(y, m, d).context("invalid seed start date")?;
        if seed_user(&db, id, email, name, Some(start)).await? {
            seed_last_month(&timesheets, id, days_per_week).await?;
        }
    }

    match AppConfig::load() {
        Ok(config) => {
            let jwt = JwtService::new(&config.jwt);
            println!("Admin token:    {}", jwt.generate_access_token(ADMIN_ID, Role::Admin)?);
            let employee = Uuid::from_u128(EMPLOYEES[0].0);
            println!("Employee token: {}", jwt.generate_access_token(employee, Role::Employee)?);
        }
        Err(e) => println!("Skipping tokens - configuration not available: {e}"),
    }

    println!("Seeding complete!");
    Ok(())
}

/// Inserts a user unless it exists. Returns true when inserted.
async fn seed_user(
    db: &DatabaseConnection,
    id: Uuid,
    email: &str,
    full_name: &str,
    start_date: Option<NaiveDate>,
) -> anyhow::Result<bool> {
    if users::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  {email} already exists, skipping...");
        return Ok(false);
    }

    let now = Utc::now().into();
    users::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        start_date: Set(start_date),
        initial_sick_leave_granted: Set(false),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    println!("  Created {email}");
    Ok(true)
}

/// Logs eight-hour days on the first `days_per_week` weekdays of every week
/// overlapping the previous month.
async fn seed_last_month(
    timesheets: &TimesheetRepository,
    user_id: Uuid,
    days_per_week: usize,
) -> anyhow::Result<()> {
    let this_month = Utc::now().date_naive().with_day(1).context("invalid date")?;
    let last_month = this_month - Duration::days(1);
    let first = last_month.with_day(1).context("invalid date")?;
    let mut monday = first - Duration::days(i64::from(first.weekday().num_days_from_monday()));

    while monday <= last_month {
        let mut hours = [Decimal::ZERO; 5];
        for slot in hours.iter_mut().take(days_per_week) {
            *slot = Decimal::from(8);
        }
        timesheets
            .record_week(CreateTaskEntryInput {
                user_id,
                project_name: "Hourglass".to_string(),
                task_name: "Development".to_string(),
                week_start_date: monday,
                hours,
            })
            .await?;
        monday += Duration::days(7);
    }

    Ok(())
}
