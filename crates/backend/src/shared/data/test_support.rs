//! Temporary warehouses with a small, hand-checked dataset.
//!
//! Sales totals: 8 rows, revenue 520,000, profit 126,500, dates
//! 2024-01-02 ..= 2024-01-31. Customers: 6 rows, sales 1,760,000.

use sea_orm::DatabaseConnection;

use super::db::connect;
use super::seed::{insert_customers, insert_sales, NewCustomer, NewSale};

pub async fn empty_database() -> DatabaseConnection {
    let path = std::env::temp_dir().join(format!("insight-test-{}.db", uuid::Uuid::new_v4()));
    connect(&path).await.unwrap()
}

pub async fn seeded_database() -> DatabaseConnection {
    let db = empty_database().await;
    insert_sales(&db, &sample_sales()).await.unwrap();
    insert_customers(&db, &sample_customers()).await.unwrap();
    db
}

fn sale(category: &str, region: &str, segment: &str, date: &str, sales: f64, profit: f64) -> NewSale {
    NewSale {
        product_category: category.to_string(),
        region: region.to_string(),
        customer_segment: segment.to_string(),
        sale_date: date.to_string(),
        total_sales: sales,
        profit,
    }
}

pub fn sample_sales() -> Vec<NewSale> {
    vec![
        sale("Electronics", "Kanto", "Consumer", "2024-01-02", 120_000.0, 30_000.0),
        sale("Electronics", "Kansai", "Corporate", "2024-01-10", 80_000.0, 16_000.0),
        sale("Clothing", "Kanto", "Consumer", "2024-01-15", 40_000.0, 12_000.0),
        sale("Clothing", "Kyushu", "Corporate", "2024-01-20", 25_000.0, 5_000.0),
        sale("Food", "Kansai", "Consumer", "2024-01-24", 15_000.0, 3_000.0),
        sale("Food", "Kanto", "Corporate", "2024-01-25", 10_000.0, 1_500.0),
        sale("Electronics", "Kyushu", "Consumer", "2024-01-28", 200_000.0, 50_000.0),
        sale("Clothing", "Kansai", "Consumer", "2024-01-31", 30_000.0, 9_000.0),
    ]
}

fn customer(
    id: i64,
    first: &str,
    last: &str,
    city: &str,
    country: &str,
    sales: f64,
    visited: &str,
) -> NewCustomer {
    NewCustomer {
        customer_id: id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        total_sales: sales,
        visited_locations: visited.to_string(),
    }
}

pub fn sample_customers() -> Vec<NewCustomer> {
    vec![
        customer(1, "Taro", "Yamada", "Tokyo", "Japan", 500_000.0, r#"["Shibuya","Shinjuku","Ginza"]"#),
        customer(2, "Hanako", "Sato", "Osaka", "Japan", 320_000.0, r#"["Umeda"]"#),
        customer(3, "John", "Smith", "Seattle", "USA", 450_000.0, r#"["Downtown","Capitol Hill"]"#),
        customer(4, "Emily", "Brown", "Portland", "USA", 120_000.0, "[]"),
        customer(5, "Liu", "Wei", "Shanghai", "China", 280_000.0, r#"["Pudong","Jingan"]"#),
        customer(6, "Ken", "Tanaka", "Tokyo", "Japan", 90_000.0, r#"["Ginza"]"#),
    ]
}
