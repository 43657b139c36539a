use anyhow::Result;
use contracts::dashboards::d101_customer_analysis::CustomerRecord;
use sea_orm::{DatabaseConnection, FromQueryResult};

use super::filter::{derive_options, CustomerDataset};
use crate::shared::sql::build_statement;

/// Whole `customer_loyalty` table, best customers first.
///
/// Visited locations are stored as a JSON array; anything that is not valid
/// JSON counts as zero locations.
pub async fn load_customers(db: &DatabaseConnection) -> Result<Vec<CustomerRecord>> {
    let sql = r#"
        SELECT
            customer_id,
            TRIM(COALESCE(first_name, '') || ' ' || COALESCE(last_name, '')) AS name,
            COALESCE(city, '')                                               AS city,
            COALESCE(country, '')                                            AS country,
            CAST(COALESCE(total_sales, 0) AS REAL)                           AS total_sales,
            CAST(CASE WHEN json_valid(visited_locations)
                      THEN json_array_length(visited_locations)
                      ELSE 0 END AS INTEGER)                                 AS visited_location_count
        FROM customer_loyalty
        ORDER BY total_sales DESC, customer_id
    "#;

    #[derive(Debug, FromQueryResult)]
    struct CustomerRow {
        customer_id: i64,
        name: String,
        city: String,
        country: String,
        total_sales: f64,
        visited_location_count: i64,
    }

    let rows = CustomerRow::find_by_statement(build_statement(sql, Vec::new()))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| CustomerRecord {
            customer_id: r.customer_id,
            name: r.name,
            city: r.city,
            country: r.country,
            total_sales: r.total_sales,
            visited_location_count: r.visited_location_count,
        })
        .collect())
}

/// Customers together with the filter options derived from them
pub async fn load_dataset(db: &DatabaseConnection) -> Result<CustomerDataset> {
    let records = load_customers(db).await?;
    let options = derive_options(&records);

    tracing::info!(
        "D101: loaded {} customers from {} countries",
        records.len(),
        options.countries.len()
    );

    Ok(CustomerDataset { records, options })
}
