use anyhow::Result;
use chrono::NaiveDate;
use contracts::dashboards::d100_sales_analysis::{
    SalesDimension, SalesFilterOptions, SalesRecord, SalesRollupRow, SalesSummary,
};
use sea_orm::{DatabaseConnection, FromQueryResult};

use super::query::dimension_column;
use crate::shared::aggregation::profit_margin;
use crate::shared::error::DashboardError;
use crate::shared::sql::{build_statement, Predicate, QueryParam};

/// Distinct dimension values and the date bounds of the sales table
pub async fn fetch_filter_options(db: &DatabaseConnection) -> Result<SalesFilterOptions> {
    let categories = fetch_distinct(db, SalesDimension::Category).await?;
    let regions = fetch_distinct(db, SalesDimension::Region).await?;
    let segments = fetch_distinct(db, SalesDimension::Segment).await?;

    #[derive(Debug, FromQueryResult)]
    struct DateBounds {
        min_date: Option<String>,
        max_date: Option<String>,
    }

    let stmt = build_statement(
        "SELECT MIN(sale_date) AS min_date, MAX(sale_date) AS max_date FROM sales_data",
        Vec::new(),
    );
    let bounds = DateBounds::find_by_statement(stmt).one(db).await?;
    let (min_date, max_date) = match bounds {
        Some(b) => (parse_date(b.min_date)?, parse_date(b.max_date)?),
        None => (None, None),
    };

    tracing::info!(
        "D100: loaded filter options ({} categories, {} regions, {} segments, dates {:?}..{:?})",
        categories.len(),
        regions.len(),
        segments.len(),
        min_date,
        max_date
    );

    Ok(SalesFilterOptions {
        categories,
        regions,
        segments,
        min_date,
        max_date,
    })
}

async fn fetch_distinct(db: &DatabaseConnection, dimension: SalesDimension) -> Result<Vec<String>> {
    let column = dimension_column(dimension);
    let sql = format!(
        "SELECT DISTINCT {col} AS value FROM sales_data WHERE {col} IS NOT NULL ORDER BY 1",
        col = column
    );

    #[derive(Debug, FromQueryResult)]
    struct DistinctValue {
        value: String,
    }

    let rows = DistinctValue::find_by_statement(build_statement(&sql, Vec::new()))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.value).collect())
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| DashboardError::MalformedOptions(format!("sale_date '{}': {}", s, e)).into()),
    }
}

/// Totals for the rows matching `predicate`
pub async fn fetch_summary(db: &DatabaseConnection, predicate: &Predicate) -> Result<SalesSummary> {
    let sql = format!(
        r#"
        SELECT
            CAST(COUNT(*) AS INTEGER)                          AS total_records,
            CAST(COUNT(DISTINCT product_category) AS INTEGER)  AS categories,
            CAST(COUNT(DISTINCT region) AS INTEGER)            AS regions,
            MIN(sale_date)                                     AS earliest_date,
            MAX(sale_date)                                     AS latest_date,
            CAST(COALESCE(SUM(total_sales), 0) AS REAL)        AS total_revenue,
            CAST(COALESCE(AVG(total_sales), 0) AS REAL)        AS avg_sales,
            CAST(COALESCE(SUM(profit), 0) AS REAL)             AS total_profit
        FROM sales_data
        WHERE {}
        "#,
        predicate.sql()
    );

    #[derive(Debug, FromQueryResult)]
    struct SummaryRow {
        total_records: i64,
        categories: i64,
        regions: i64,
        earliest_date: Option<String>,
        latest_date: Option<String>,
        total_revenue: f64,
        avg_sales: f64,
        total_profit: f64,
    }

    let stmt = build_statement(&sql, predicate.params().to_vec());
    let row = SummaryRow::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or(SummaryRow {
            total_records: 0,
            categories: 0,
            regions: 0,
            earliest_date: None,
            latest_date: None,
            total_revenue: 0.0,
            avg_sales: 0.0,
            total_profit: 0.0,
        });

    Ok(SalesSummary {
        total_records: row.total_records,
        categories: row.categories,
        regions: row.regions,
        earliest_date: row.earliest_date,
        latest_date: row.latest_date,
        total_revenue: row.total_revenue,
        avg_sales: row.avg_sales,
        total_profit: row.total_profit,
        profit_margin: profit_margin(row.total_profit, row.total_revenue),
    })
}

/// Group-by rollup on one dimension, highest sales first
pub async fn fetch_rollup(
    db: &DatabaseConnection,
    predicate: &Predicate,
    dimension: SalesDimension,
) -> Result<Vec<SalesRollupRow>> {
    // Column name comes from a fixed enum, values stay bound
    let sql = format!(
        r#"
        SELECT
            {col}                                          AS group_key,
            CAST(COALESCE(SUM(total_sales), 0) AS REAL)    AS sales_sum,
            CAST(COALESCE(SUM(profit), 0) AS REAL)         AS profit_sum,
            CAST(COUNT(*) AS INTEGER)                      AS tx_count,
            CAST(COALESCE(AVG(total_sales), 0) AS REAL)    AS sales_avg
        FROM sales_data
        WHERE {where_clause}
        GROUP BY {col}
        ORDER BY sales_sum DESC, group_key
        "#,
        col = dimension_column(dimension),
        where_clause = predicate.sql()
    );

    #[derive(Debug, FromQueryResult)]
    struct RollupRow {
        group_key: String,
        sales_sum: f64,
        profit_sum: f64,
        tx_count: i64,
        sales_avg: f64,
    }

    let stmt = build_statement(&sql, predicate.params().to_vec());
    let rows = RollupRow::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| SalesRollupRow {
            key: r.group_key,
            total_sales: r.sales_sum,
            total_profit: r.profit_sum,
            transaction_count: r.tx_count,
            avg_sales: r.sales_avg,
        })
        .collect())
}

pub async fn count_records(db: &DatabaseConnection, predicate: &Predicate) -> Result<i64> {
    let sql = format!(
        "SELECT CAST(COUNT(*) AS INTEGER) AS cnt FROM sales_data WHERE {}",
        predicate.sql()
    );

    #[derive(Debug, FromQueryResult)]
    struct CountRow {
        cnt: i64,
    }

    let row = CountRow::find_by_statement(build_statement(&sql, predicate.params().to_vec()))
        .one(db)
        .await?;
    Ok(row.map(|r| r.cnt).unwrap_or(0))
}

/// Matching rows, newest first; every row unless `limit` is given
pub async fn fetch_detail(
    db: &DatabaseConnection,
    predicate: &Predicate,
    limit: Option<u64>,
) -> Result<Vec<SalesRecord>> {
    let mut sql = format!(
        r#"
        SELECT product_category, region, customer_segment, sale_date, total_sales, profit
        FROM sales_data
        WHERE {}
        ORDER BY sale_date DESC, id DESC
        "#,
        predicate.sql()
    );

    let mut params = predicate.params().to_vec();
    if let Some(lim) = limit {
        sql.push_str(" LIMIT ?");
        params.push(QueryParam::Integer(i64::try_from(lim).unwrap_or(i64::MAX)));
    }

    #[derive(Debug, FromQueryResult)]
    struct DetailRow {
        product_category: String,
        region: String,
        customer_segment: String,
        sale_date: String,
        total_sales: f64,
        profit: f64,
    }

    let rows = DetailRow::find_by_statement(build_statement(&sql, params))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| SalesRecord {
            product_category: r.product_category,
            region: r.region,
            customer_segment: r.customer_segment,
            sale_date: r.sale_date,
            total_sales: r.total_sales,
            profit: r.profit,
        })
        .collect())
}
