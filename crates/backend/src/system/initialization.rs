use anyhow::Result;
use contracts::dashboards::d100_sales_analysis::SalesFilterOptions;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

use crate::dashboards::d100_sales_analysis::service::SalesContext;
use crate::dashboards::d101_customer_analysis::filter::CustomerDataset;
use crate::dashboards::d101_customer_analysis::service::CustomerContext;
use crate::shared::cache::SessionCache;
use crate::shared::config::{Config, DashboardSettings};
use crate::shared::data::db::get_connection;

/// Process-wide dashboard state: option caches and display settings
pub struct Runtime {
    pub sales_options: SessionCache<SalesFilterOptions>,
    pub customer_datasets: SessionCache<Arc<CustomerDataset>>,
    pub settings: DashboardSettings,
}

impl Runtime {
    pub fn new(config: &Config) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_secs);
        Self {
            sales_options: SessionCache::new("D100 filter options", ttl)
                .with_max_entries(config.cache.max_entries),
            customer_datasets: SessionCache::new("D101 customers", ttl)
                .with_max_entries(config.cache.max_entries),
            settings: config.dashboards.clone(),
        }
    }

    pub fn sales<'a>(&'a self, session: &'a str) -> SalesContext<'a> {
        SalesContext {
            db: get_connection(),
            options: &self.sales_options,
            session,
        }
    }

    pub fn customers<'a>(&'a self, session: &'a str) -> CustomerContext<'a> {
        CustomerContext {
            db: get_connection(),
            datasets: &self.customer_datasets,
            settings: &self.settings,
            session,
        }
    }
}

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

pub fn initialize_runtime(config: &Config) -> Result<()> {
    RUNTIME
        .set(Runtime::new(config))
        .map_err(|_| anyhow::anyhow!("Failed to set dashboard runtime"))?;
    tracing::info!(
        "Dashboard runtime ready (cache ttl {}s, {} sessions, top {} customers, {} histogram bins)",
        config.cache.ttl_secs,
        config.cache.max_entries,
        config.dashboards.top_n,
        config.dashboards.histogram_bins
    );
    Ok(())
}

pub fn runtime() -> &'static Runtime {
    RUNTIME.get().expect("Dashboard runtime has not been initialized")
}
