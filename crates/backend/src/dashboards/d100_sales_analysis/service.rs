use anyhow::Result;
use contracts::dashboards::d100_sales_analysis::{
    SalesDashboardResponse, SalesDimension, SalesFilterOptions, SalesFilterState,
};
use contracts::shared::view::{FilterPanel, Notice, Section, SectionResponse};
use sea_orm::DatabaseConnection;

use super::filter::{resolve, SalesFilterSpec};
use super::query::build_predicate;
use super::repository;
use super::view;
use crate::shared::cache::SessionCache;
use crate::shared::presentation::failed_section;
use crate::shared::sql::Predicate;

pub const DATA_SOURCE_WARNING: &str =
    "Problem connecting to the data source. Check the connection settings and try again.";

/// Everything a sales request needs: warehouse, option cache, caller
pub struct SalesContext<'a> {
    pub db: &'a DatabaseConnection,
    pub options: &'a SessionCache<SalesFilterOptions>,
    pub session: &'a str,
}

struct PreparedFilter {
    predicate: Predicate,
    panel: FilterPanel,
}

/// Filter options for the caller's session, loaded once per TTL
pub async fn get_filter_options(ctx: &SalesContext<'_>) -> Result<SalesFilterOptions> {
    let db = ctx.db;
    ctx.options
        .get_or_try_load(ctx.session, || repository::fetch_filter_options(db))
        .await
}

/// Forget the caller's cached options; true when an entry was dropped
pub async fn refresh(ctx: &SalesContext<'_>) -> bool {
    ctx.options.invalidate(ctx.session).await
}

async fn prepare_filter(ctx: &SalesContext<'_>, state: &SalesFilterState) -> PreparedFilter {
    let mut notices = Vec::new();

    let spec = match get_filter_options(ctx).await {
        Ok(options) => resolve(state, &options),
        Err(e) => {
            tracing::error!("D100: failed to load filter options: {}", e);
            notices.push(Notice::error(format!("Could not load filter options: {}", e)));
            SalesFilterSpec::unrestricted()
        }
    };

    let predicate = build_predicate(&spec);
    let panel = FilterPanel {
        applied: spec.describe(),
        sql_preview: Some(predicate.preview()),
        notices,
    };

    PreparedFilter { predicate, panel }
}

/// Full page: summary first, then the rollups and the detail table.
///
/// A failing summary means the warehouse is unreachable, so the remaining
/// sections are not attempted.
pub async fn get_dashboard(ctx: &SalesContext<'_>, state: &SalesFilterState) -> SalesDashboardResponse {
    let PreparedFilter { predicate, panel } = prepare_filter(ctx, state).await;

    let summary = match repository::fetch_summary(ctx.db, &predicate).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("D100: summary query failed: {}", e);
            let section = failed_section(view::SUMMARY_SECTION, "Data overview", "Query failed", &e)
                .with_notice(Notice::warning(DATA_SOURCE_WARNING));
            return SalesDashboardResponse {
                filter_panel: panel,
                summary: None,
                sections: vec![section],
            };
        }
    };

    let mut sections = vec![view::summary_section(&summary)];
    if summary.total_records > 0 {
        for dimension in SalesDimension::ALL {
            sections.push(rollup_section(ctx.db, &predicate, dimension).await);
        }
        sections.push(detail_section(ctx.db, &predicate, state.detail_limit).await);
    }

    tracing::info!(
        "D100: dashboard for session {} with {} records, {} sections",
        ctx.session,
        summary.total_records,
        sections.len()
    );

    SalesDashboardResponse {
        filter_panel: panel,
        summary: Some(summary),
        sections,
    }
}

pub async fn get_summary_section(ctx: &SalesContext<'_>, state: &SalesFilterState) -> SectionResponse {
    let PreparedFilter { predicate, panel } = prepare_filter(ctx, state).await;

    let section = match repository::fetch_summary(ctx.db, &predicate).await {
        Ok(summary) => view::summary_section(&summary),
        Err(e) => {
            tracing::error!("D100: summary query failed: {}", e);
            failed_section(view::SUMMARY_SECTION, "Data overview", "Query failed", &e)
                .with_notice(Notice::warning(DATA_SOURCE_WARNING))
        }
    };

    SectionResponse {
        filter_panel: panel,
        section,
    }
}

pub async fn get_rollup_section(
    ctx: &SalesContext<'_>,
    state: &SalesFilterState,
    dimension: SalesDimension,
) -> SectionResponse {
    let PreparedFilter { predicate, panel } = prepare_filter(ctx, state).await;
    SectionResponse {
        filter_panel: panel,
        section: rollup_section(ctx.db, &predicate, dimension).await,
    }
}

pub async fn get_detail_section(ctx: &SalesContext<'_>, state: &SalesFilterState) -> SectionResponse {
    let PreparedFilter { predicate, panel } = prepare_filter(ctx, state).await;
    SectionResponse {
        filter_panel: panel,
        section: detail_section(ctx.db, &predicate, state.detail_limit).await,
    }
}

async fn rollup_section(
    db: &DatabaseConnection,
    predicate: &Predicate,
    dimension: SalesDimension,
) -> Section {
    match repository::fetch_rollup(db, predicate, dimension).await {
        Ok(rows) => view::rollup_section(dimension, &rows),
        Err(e) => {
            tracing::error!("D100: {} rollup failed: {}", dimension, e);
            failed_section(
                &view::rollup_section_id(dimension),
                &view::rollup_title(dimension),
                "Query failed",
                &e,
            )
        }
    }
}

async fn detail_section(db: &DatabaseConnection, predicate: &Predicate, limit: Option<u64>) -> Section {
    let loaded = async {
        let total = repository::count_records(db, predicate).await?;
        let records = repository::fetch_detail(db, predicate, limit).await?;
        anyhow::Ok((total, records))
    }
    .await;

    match loaded {
        Ok((total, records)) => {
            view::detail_section(&records, usize::try_from(total).unwrap_or_default())
        }
        Err(e) => {
            tracing::error!("D100: detail query failed: {}", e);
            failed_section(view::DETAIL_SECTION, "Sales detail", "Query failed", &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support;
    use contracts::dashboards::d100_sales_analysis::{DateFilterMode, DimensionSelection};
    use contracts::shared::view::{NoticeLevel, Widget};
    use sea_orm::ConnectionTrait;
    use std::time::Duration;

    fn cache() -> SessionCache<SalesFilterOptions> {
        SessionCache::new("sales options", Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_full_selection_matches_unfiltered_totals() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let baseline = get_dashboard(&ctx, &SalesFilterState::default()).await;
        let all_selected = SalesFilterState {
            categories: DimensionSelection::subset(["Clothing", "Electronics", "Food"]),
            regions: DimensionSelection::subset(["Kansai", "Kanto", "Kyushu"]),
            segments: DimensionSelection::subset(["Consumer", "Corporate"]),
            ..Default::default()
        };
        let selected = get_dashboard(&ctx, &all_selected).await;

        assert_eq!(baseline.summary, selected.summary);
        assert!(selected.filter_panel.applied.is_empty());
        assert_eq!(selected.filter_panel.sql_preview.as_deref(), Some("WHERE 1=1"));
        // summary, three rollups, detail
        assert_eq!(baseline.sections.len(), 5);
    }

    #[tokio::test]
    async fn test_narrowing_never_increases_totals() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let baseline = get_dashboard(&ctx, &SalesFilterState::default())
            .await
            .summary
            .unwrap();
        let narrowed = get_dashboard(
            &ctx,
            &SalesFilterState {
                date_mode: DateFilterMode::Last7Days,
                categories: DimensionSelection::subset(["Clothing", "Food"]),
                ..Default::default()
            },
        )
        .await
        .summary
        .unwrap();

        assert!(narrowed.total_records <= baseline.total_records);
        assert!(narrowed.total_revenue <= baseline.total_revenue);
        // 2024-01-24, 01-25 and 01-31
        assert_eq!(narrowed.total_records, 3);
        assert_eq!(narrowed.total_revenue, 55_000.0);
    }

    #[tokio::test]
    async fn test_empty_result_shows_no_data_notice() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let state = SalesFilterState {
            sales_range: contracts::dashboards::d100_sales_analysis::SalesRangeInput {
                enabled: true,
                min: 5_000_000.0,
                max: None,
            },
            ..Default::default()
        };
        let response = get_dashboard(&ctx, &state).await;

        assert_eq!(response.summary.as_ref().map(|s| s.total_records), Some(0));
        assert_eq!(response.sections.len(), 1);
        assert!(response.sections[0].is_empty_result());

        let rollup = get_rollup_section(&ctx, &state, SalesDimension::Region).await;
        assert!(rollup.section.is_empty_result());
    }

    #[tokio::test]
    async fn test_missing_table_degrades_to_notices() {
        let db = test_support::seeded_database().await;
        db.execute_unprepared("DROP TABLE sales_data").await.unwrap();
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let response = get_dashboard(&ctx, &SalesFilterState::default()).await;

        assert!(response.summary.is_none());
        assert_eq!(response.filter_panel.notices.len(), 1);
        assert_eq!(response.filter_panel.notices[0].level, NoticeLevel::Error);
        assert_eq!(response.sections.len(), 1);
        let levels: Vec<NoticeLevel> = response.sections[0].notices().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Error, NoticeLevel::Warning]);

        // failed loads are not cached
        assert!(options.is_empty().await);
    }

    #[tokio::test]
    async fn test_refresh_reloads_options() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let before = get_filter_options(&ctx).await.unwrap();
        db.execute_unprepared(
            "INSERT INTO sales_data (product_category, region, customer_segment, sale_date, total_sales, profit) \
             VALUES ('Toys', 'Tohoku', 'Consumer', '2024-02-01', 1000, 100)",
        )
        .await
        .unwrap();

        assert_eq!(get_filter_options(&ctx).await.unwrap(), before);
        assert!(refresh(&ctx).await);

        let after = get_filter_options(&ctx).await.unwrap();
        assert!(after.categories.contains(&"Toys".to_string()));
    }

    #[tokio::test]
    async fn test_detail_section_reports_total_rows() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let state = SalesFilterState {
            detail_limit: Some(2),
            ..Default::default()
        };
        let response = get_detail_section(&ctx, &state).await;

        let Widget::Table(table) = &response.section.widgets[0] else {
            panic!("expected a table");
        };
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.total_rows, 8);
        assert!(table.is_truncated());
    }

    #[tokio::test]
    async fn test_zero_detail_limit_keeps_row_count() {
        let db = test_support::seeded_database().await;
        let options = cache();
        let ctx = SalesContext {
            db: &db,
            options: &options,
            session: "s1",
        };

        let state = SalesFilterState {
            detail_limit: Some(0),
            ..Default::default()
        };
        let response = get_detail_section(&ctx, &state).await;

        assert!(!response.section.is_empty_result());
        let Widget::Table(table) = &response.section.widgets[0] else {
            panic!("expected a table");
        };
        assert!(table.rows.is_empty());
        assert_eq!(table.total_rows, 8);
    }
}
