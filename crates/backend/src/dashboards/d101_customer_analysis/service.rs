use anyhow::Result;
use contracts::dashboards::d101_customer_analysis::{
    CustomerDashboardResponse, CustomerDimension, CustomerFilterOptions, CustomerFilterState,
    CustomerRecord,
};
use contracts::shared::view::{FilterPanel, Notice, Section, SectionResponse};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::aggregation;
use super::filter::{resolve, CustomerDataset, CustomerFilterSpec};
use super::repository;
use super::view;
use crate::shared::aggregation::MAX_HISTOGRAM_BINS;
use crate::shared::cache::SessionCache;
use crate::shared::config::DashboardSettings;
use crate::shared::presentation::failed_section;

pub const DATA_SOURCE_WARNING: &str =
    "Problem connecting to the data source. Check the connection settings and try again.";

/// Longest customer ranking a request may ask for
pub const MAX_TOP_N: usize = 100;

pub struct CustomerContext<'a> {
    pub db: &'a DatabaseConnection,
    pub datasets: &'a SessionCache<Arc<CustomerDataset>>,
    pub settings: &'a DashboardSettings,
    pub session: &'a str,
}

/// Loaded dataset with the request's filter applied
struct Prepared {
    dataset: Option<Arc<CustomerDataset>>,
    error: Option<anyhow::Error>,
    spec: CustomerFilterSpec,
    panel: FilterPanel,
}

impl Prepared {
    fn filtered(&self) -> Vec<&CustomerRecord> {
        match &self.dataset {
            Some(dataset) => self.spec.apply(&dataset.records),
            None => Vec::new(),
        }
    }

    fn failure(&self, id: &str, title: &str) -> Option<Section> {
        self.error.as_ref().map(|e| {
            failed_section(id, title, "Could not load customer data", e)
                .with_notice(Notice::warning(DATA_SOURCE_WARNING))
        })
    }
}

pub async fn load_dataset(ctx: &CustomerContext<'_>) -> Result<Arc<CustomerDataset>> {
    let db = ctx.db;
    ctx.datasets
        .get_or_try_load(ctx.session, || async move {
            repository::load_dataset(db).await.map(Arc::new)
        })
        .await
}

pub async fn get_filter_options(ctx: &CustomerContext<'_>) -> Result<CustomerFilterOptions> {
    Ok(load_dataset(ctx).await?.options.clone())
}

pub async fn refresh(ctx: &CustomerContext<'_>) -> bool {
    ctx.datasets.invalidate(ctx.session).await
}

async fn prepare(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> Prepared {
    let mut notices = Vec::new();

    let (dataset, error, spec) = match load_dataset(ctx).await {
        Ok(dataset) => {
            let spec = resolve(state, &dataset.options);
            if let Some(country) = spec.unknown_country(&dataset.options) {
                tracing::warn!("D101: country {} is not in the customer data", country);
                notices.push(Notice::info(format!(
                    "Country {} is not in the current customer data",
                    country
                )));
            }
            (Some(dataset), None, spec)
        }
        Err(e) => {
            tracing::error!("D101: failed to load customers: {}", e);
            notices.push(Notice::error(format!("Could not load customer data: {}", e)));
            (None, Some(e), CustomerFilterSpec::unrestricted())
        }
    };

    let panel = FilterPanel {
        applied: spec.describe(),
        sql_preview: None,
        notices,
    };

    Prepared {
        dataset,
        error,
        spec,
        panel,
    }
}

fn top_n(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> usize {
    state.top_n.unwrap_or(ctx.settings.top_n).min(MAX_TOP_N)
}

fn top_section(records: &[&CustomerRecord], n: usize) -> Section {
    view::top_customers_section(&aggregation::top_customers(records, n), n)
}

fn rollup_section(records: &[&CustomerRecord], dimension: CustomerDimension, limit: usize) -> Section {
    view::rollup_section(dimension, &aggregation::rollup(records, dimension), limit)
}

fn histogram_section(ctx: &CustomerContext<'_>, state: &CustomerFilterState, records: &[&CustomerRecord]) -> Section {
    let bins = state
        .histogram_bins
        .unwrap_or(ctx.settings.histogram_bins)
        .clamp(1, MAX_HISTOGRAM_BINS);
    view::histogram_section(&aggregation::histogram(records, bins))
}

pub async fn get_dashboard(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> CustomerDashboardResponse {
    let prepared = prepare(ctx, state).await;

    if let Some(section) = prepared.failure(view::SUMMARY_SECTION, "Customer overview") {
        return CustomerDashboardResponse {
            filter_panel: prepared.panel,
            summary: None,
            sections: vec![section],
        };
    }

    let records = prepared.filtered();
    let summary = aggregation::summarize(&records);
    let mut sections = vec![view::summary_section(&summary)];

    if !records.is_empty() {
        let n = top_n(ctx, state);
        sections.push(top_section(&records, n));
        sections.push(rollup_section(&records, CustomerDimension::City, n));
        sections.push(rollup_section(&records, CustomerDimension::Country, n));
        sections.push(histogram_section(ctx, state, &records));
        sections.push(view::detail_section(&records, ctx.settings.customer_detail_rows));
    }

    tracing::info!(
        "D101: dashboard for session {} with {} customers, {} sections",
        ctx.session,
        summary.customer_count,
        sections.len()
    );

    CustomerDashboardResponse {
        filter_panel: prepared.panel,
        summary: Some(summary),
        sections,
    }
}

pub async fn get_top_customers_section(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> SectionResponse {
    let prepared = prepare(ctx, state).await;
    let n = top_n(ctx, state);
    let section = match prepared.failure(view::TOP_CUSTOMERS_SECTION, "Top customers") {
        Some(section) => section,
        None => top_section(&prepared.filtered(), n),
    };
    SectionResponse {
        filter_panel: prepared.panel,
        section,
    }
}

pub async fn get_rollup_section(
    ctx: &CustomerContext<'_>,
    state: &CustomerFilterState,
    dimension: CustomerDimension,
) -> SectionResponse {
    let prepared = prepare(ctx, state).await;
    let section = match prepared.failure(&view::rollup_section_id(dimension), &view::rollup_title(dimension)) {
        Some(section) => section,
        None => rollup_section(&prepared.filtered(), dimension, top_n(ctx, state)),
    };
    SectionResponse {
        filter_panel: prepared.panel,
        section,
    }
}

pub async fn get_histogram_section(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> SectionResponse {
    let prepared = prepare(ctx, state).await;
    let section = match prepared.failure(view::HISTOGRAM_SECTION, "Distribution of customer sales") {
        Some(section) => section,
        None => histogram_section(ctx, state, &prepared.filtered()),
    };
    SectionResponse {
        filter_panel: prepared.panel,
        section,
    }
}

pub async fn get_detail_section(ctx: &CustomerContext<'_>, state: &CustomerFilterState) -> SectionResponse {
    let prepared = prepare(ctx, state).await;
    let section = match prepared.failure(view::DETAIL_SECTION, "Customer detail") {
        Some(section) => section,
        None => view::detail_section(&prepared.filtered(), ctx.settings.customer_detail_rows),
    };
    SectionResponse {
        filter_panel: prepared.panel,
        section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support;
    use contracts::shared::view::{NoticeLevel, Widget};
    use sea_orm::ConnectionTrait;
    use std::time::Duration;

    fn cache() -> SessionCache<Arc<CustomerDataset>> {
        SessionCache::new("customers", Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_dashboard_for_everyone() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let response = get_dashboard(&ctx, &CustomerFilterState::default()).await;

        let summary = response.summary.unwrap();
        assert_eq!(summary.customer_count, 6);
        assert_eq!(summary.total_sales, 1_760_000.0);
        assert!((summary.avg_visited_locations - 1.5).abs() < 1e-9);

        let ids: Vec<&str> = response.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["summary", "top_customers", "by_city", "by_country", "sales_distribution", "detail"]
        );
        assert!(response.filter_panel.applied.is_empty());
        assert!(response.filter_panel.sql_preview.is_none());
    }

    #[tokio::test]
    async fn test_country_filter_narrows_totals() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let state = CustomerFilterState {
            country: Some("Japan".into()),
            ..Default::default()
        };
        let summary = get_dashboard(&ctx, &state).await.summary.unwrap();

        assert_eq!(summary.customer_count, 3);
        assert_eq!(summary.total_sales, 910_000.0);
    }

    #[tokio::test]
    async fn test_top_customers_honours_requested_length() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let state = CustomerFilterState {
            top_n: Some(3),
            ..Default::default()
        };
        let response = get_top_customers_section(&ctx, &state).await;

        let Widget::Bar(bar) = &response.section.widgets[0] else {
            panic!("expected ranked bars");
        };
        let labels: Vec<&str> = bar.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Taro Yamada", "John Smith", "Hanako Sato"]);
    }

    #[tokio::test]
    async fn test_slider_outside_data_shows_no_data() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let state = CustomerFilterState {
            sales_min: Some(600_000.0),
            sales_max: Some(900_000.0),
            ..Default::default()
        };
        let response = get_dashboard(&ctx, &state).await;
        assert_eq!(response.sections.len(), 1);
        assert!(response.sections[0].is_empty_result());

        let histogram = get_histogram_section(&ctx, &state).await;
        assert!(histogram.section.is_empty_result());
    }

    #[tokio::test]
    async fn test_request_sizes_are_bounded() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let state = CustomerFilterState {
            histogram_bins: Some(usize::MAX),
            top_n: Some(usize::MAX),
            ..Default::default()
        };

        let histogram = get_histogram_section(&ctx, &state).await;
        let Widget::Histogram(chart) = &histogram.section.widgets[0] else {
            panic!("expected a histogram");
        };
        assert!(chart.bins.len() <= MAX_HISTOGRAM_BINS);
        assert_eq!(chart.bins.iter().map(|b| b.count).sum::<u64>(), 6);

        let top = get_top_customers_section(&ctx, &state).await;
        assert_eq!(top.section.title, format!("Top {} customers by sales", MAX_TOP_N));

        let dashboard = get_dashboard(&ctx, &state).await;
        assert_eq!(dashboard.sections.len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_country_shows_no_data_with_notice() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let state = CustomerFilterState {
            country: Some("Atlantis".into()),
            ..Default::default()
        };
        let response = get_dashboard(&ctx, &state).await;

        assert_eq!(response.summary.unwrap().customer_count, 0);
        assert!(response.sections[0].is_empty_result());
        assert_eq!(response.filter_panel.notices[0].level, NoticeLevel::Info);
        assert_eq!(response.filter_panel.applied, vec!["Country: Atlantis".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_table_degrades_to_notices() {
        let db = test_support::seeded_database().await;
        db.execute_unprepared("DROP TABLE customer_loyalty").await.unwrap();
        let datasets = cache();
        let settings = DashboardSettings::default();
        let ctx = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "s1",
        };

        let response = get_dashboard(&ctx, &CustomerFilterState::default()).await;

        assert!(response.summary.is_none());
        assert_eq!(response.filter_panel.notices[0].level, NoticeLevel::Error);
        let levels: Vec<NoticeLevel> = response.sections[0].notices().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Error, NoticeLevel::Warning]);
        assert!(get_filter_options(&ctx).await.is_err());
        assert!(datasets.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_cached_separately() {
        let db = test_support::seeded_database().await;
        let datasets = cache();
        let settings = DashboardSettings::default();
        let first = CustomerContext {
            db: &db,
            datasets: &datasets,
            settings: &settings,
            session: "a",
        };
        let second = CustomerContext { session: "b", ..first };

        get_filter_options(&first).await.unwrap();
        get_filter_options(&second).await.unwrap();
        assert_eq!(datasets.len().await, 2);

        assert!(refresh(&first).await);
        assert!(!refresh(&first).await);
        assert_eq!(datasets.len().await, 1);
    }
}
