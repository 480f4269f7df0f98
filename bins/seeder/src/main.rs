//! Database seeder for CRM development and testing.
//!
//! Seeds an operator sys user, a small product catalog, and a standard price
//! list. Every step skips rows that already exist, so the seeder can be run
//! repeatedly.
//!
//! Usage: cargo run --bin seeder
//!
//! The operator password is read from `CRM_SEED_PASSWORD`.

use anyhow::Context;
use chrono::NaiveDate;
use crm_db::{
    entities::products,
    repositories::{
        CreateProductInput, CreateProductListInput, CreateProductListItemInput,
        ProductListItemRepository, ProductListRepository, ProductRepository, SignUpInput,
        SysUserRepository,
    },
};
use crm_shared::{AppConfig, AppError};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

const OPERATOR_USERNAME: &str = "operator";
const DEFAULT_PASSWORD: &str = "Operator123";

/// Name, code, and list price in cents.
const CATALOG: [(&str, &str, i64); 4] = [
    ("Starter subscription", "SUB-START", 4_900),
    ("Professional subscription", "SUB-PRO", 14_900),
    ("Onboarding workshop", "SVC-ONBOARD", 120_000),
    ("Priority support", "SVC-SUPPORT", 29_900),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = crm_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    println!("Seeding operator...");
    let operator = seed_operator(&db).await?;

    println!("Seeding product catalog...");
    let catalog = seed_products(&db, operator).await?;

    println!("Seeding standard price list...");
    seed_price_list(&db, operator, &catalog).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the operator sys user and returns its uuid.
async fn seed_operator(db: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let users = SysUserRepository::new(db);
    if let Some(existing) = users.find_by_username(OPERATOR_USERNAME).await? {
        println!("  Operator already exists, skipping...");
        return Ok(existing.uuid);
    }

    let password =
        std::env::var("CRM_SEED_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());
    let operator = users
        .sign_up(SignUpInput {
            first_name: "Default".to_string(),
            last_name: "Operator".to_string(),
            email: "operator@crm.local".to_string(),
            username: OPERATOR_USERNAME.to_string(),
            password,
        })
        .await?;
    println!("  Created operator: {OPERATOR_USERNAME}");
    Ok(operator.uuid)
}

/// Seeds the catalog products, returning each with its list price.
async fn seed_products(
    db: &DatabaseConnection,
    operator: Uuid,
) -> anyhow::Result<Vec<(products::Model, Decimal)>> {
    let repository = ProductRepository::new(db);
    let mut catalog = Vec::with_capacity(CATALOG.len());
    let mut inserted = 0;

    for (name, code, cents) in CATALOG {
        let product = if let Some(existing) = repository.find_by_name(name).await? {
            existing
        } else {
            inserted += 1;
            repository
                .create(
                    CreateProductInput {
                        name: name.to_string(),
                        code: Some(code.to_string()),
                        terms: None,
                        description: None,
                        sys_allowed_price_increase: true,
                        sys_allowed_price_decrease: false,
                        man_allowed_price_increase: true,
                        man_allowed_price_decrease: true,
                    },
                    operator,
                )
                .await?
        };
        catalog.push((product, Decimal::new(cents, 2)));
    }

    println!("  Inserted {inserted} products");
    Ok(catalog)
}

/// Seeds a price list for the current year carrying every catalog product.
async fn seed_price_list(
    db: &DatabaseConnection,
    operator: Uuid,
    catalog: &[(products::Model, Decimal)],
) -> anyhow::Result<()> {
    let (start_on, end_on) = NaiveDate::from_ymd_opt(2026, 1, 1)
        .zip(NaiveDate::from_ymd_opt(2026, 12, 31))
        .context("invalid price list window")?;

    let created = ProductListRepository::new(db)
        .create(
            CreateProductListInput {
                owner_uuid: Some(operator),
                name: "Standard 2026".to_string(),
                start_on,
                end_on,
            },
            operator,
        )
        .await;
    let list = match created {
        Ok(list) => list,
        Err(AppError::Exists(_)) => {
            println!("  Price list already exists, skipping...");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let items = ProductListItemRepository::new(db);
    for (product, price) in catalog {
        items
            .create(
                list.uuid,
                CreateProductListItemInput {
                    product_uuid: product.uuid,
                    price: *price,
                    sys_allowed_price_increase: product.sys_allowed_price_increase,
                    man_allowed_price_increase: product.man_allowed_price_increase,
                    sys_allowed_price_decrease: product.sys_allowed_price_decrease,
                    man_allowed_price_decrease: product.man_allowed_price_decrease,
                },
                operator,
            )
            .await?;
    }

    println!("  Created price list with {} items", catalog.len());
    Ok(())
}
