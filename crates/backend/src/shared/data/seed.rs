//! Bootstrap import of warehouse rows.
//!
//! Dashboards never write; these helpers only run at startup (from the
//! `[seed]` CSV files) and in test fixtures.

use anyhow::Context;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Deserialize;
use std::path::Path;

use super::db::count_rows;
use crate::shared::config::{resolve_path, SeedConfig};

/// Sales fact row as found in the seed CSV
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub product_category: String,
    pub region: String,
    pub customer_segment: String,
    pub sale_date: String,
    pub total_sales: f64,
    pub profit: f64,
}

/// Customer loyalty row as found in the seed CSV
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub country: String,
    pub total_sales: f64,
    /// JSON array of location names, e.g. `["Shibuya","Ginza"]`
    #[serde(default = "empty_json_array")]
    pub visited_locations: String,
}

fn empty_json_array() -> String {
    "[]".to_string()
}

pub async fn insert_sales(db: &DatabaseConnection, rows: &[NewSale]) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for row in rows {
        let stmt = Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Sqlite,
            r#"
            INSERT INTO sales_data
                (product_category, region, customer_segment, sale_date, total_sales, profit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            [
                row.product_category.clone().into(),
                row.region.clone().into(),
                row.customer_segment.clone().into(),
                row.sale_date.clone().into(),
                row.total_sales.into(),
                row.profit.into(),
            ],
        );
        inserted += db.execute(stmt).await?.rows_affected();
    }
    Ok(inserted)
}

pub async fn insert_customers(
    db: &DatabaseConnection,
    rows: &[NewCustomer],
) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for row in rows {
        let stmt = Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Sqlite,
            r#"
            INSERT INTO customer_loyalty
                (customer_id, first_name, last_name, city, country, total_sales, visited_locations)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            [
                row.customer_id.into(),
                row.first_name.clone().into(),
                row.last_name.clone().into(),
                row.city.clone().into(),
                row.country.clone().into(),
                row.total_sales.into(),
                row.visited_locations.clone().into(),
            ],
        );
        inserted += db.execute(stmt).await?.rows_affected();
    }
    Ok(inserted)
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open seed file {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.with_context(|| format!("bad row in {}", path.display()))?);
    }
    Ok(rows)
}

/// Import the configured CSV files into tables that are still empty
pub async fn seed_from_csv(db: &DatabaseConnection, seed: &SeedConfig) -> anyhow::Result<()> {
    if let Some(sales_csv) = &seed.sales_csv {
        if count_rows(db, "sales_data").await? == 0 {
            let rows: Vec<NewSale> = read_csv(&resolve_path(sales_csv))?;
            let inserted = insert_sales(db, &rows).await?;
            tracing::info!("Seeded sales_data with {} rows from {}", inserted, sales_csv);
        } else {
            tracing::info!("sales_data already populated, skipping {}", sales_csv);
        }
    }

    if let Some(customers_csv) = &seed.customers_csv {
        if count_rows(db, "customer_loyalty").await? == 0 {
            let rows: Vec<NewCustomer> = read_csv(&resolve_path(customers_csv))?;
            let inserted = insert_customers(db, &rows).await?;
            tracing::info!(
                "Seeded customer_loyalty with {} rows from {}",
                inserted,
                customers_csv
            );
        } else {
            tracing::info!(
                "customer_loyalty already populated, skipping {}",
                customers_csv
            );
        }
    }

    Ok(())
}
