use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::view::{FilterPanel, Section};

/// Date range selection mode of the sales filter panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilterMode {
    #[default]
    AllTime,
    CustomRange,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
}

impl DateFilterMode {
    /// Window length for the "last N days" modes, counted back from the newest sale
    pub fn window_days(&self) -> Option<i64> {
        match self {
            DateFilterMode::Last7Days => Some(7),
            DateFilterMode::Last30Days => Some(30),
            _ => None,
        }
    }
}

/// "All" vs "pick a subset" radio of a multiselect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    All,
    Subset,
}

/// State of one dimension picker (category, region or segment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSelection {
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub selected: Vec<String>,
}

impl DimensionSelection {
    pub fn subset<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: SelectionMode::Subset,
            selected: values.into_iter().map(Into::into).collect(),
        }
    }
}

pub const DEFAULT_SALES_RANGE_MAX: f64 = 1_000_000.0;

fn default_sales_range_max() -> Option<f64> {
    Some(DEFAULT_SALES_RANGE_MAX)
}

/// Optional "filter by sales amount" toggle with its two inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRangeInput {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub min: f64,
    /// `None` leaves the range open-ended
    #[serde(default = "default_sales_range_max")]
    pub max: Option<f64>,
}

impl Default for SalesRangeInput {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 0.0,
            max: default_sales_range_max(),
        }
    }
}

/// Raw widget values of the sales filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilterState {
    #[serde(default)]
    pub date_mode: DateFilterMode,
    #[serde(default)]
    pub custom_from: Option<NaiveDate>,
    #[serde(default)]
    pub custom_to: Option<NaiveDate>,
    #[serde(default)]
    pub categories: DimensionSelection,
    #[serde(default)]
    pub regions: DimensionSelection,
    #[serde(default)]
    pub segments: DimensionSelection,
    #[serde(default)]
    pub sales_range: SalesRangeInput,
    /// Row cap for the detail table; absent means every matching row
    #[serde(default)]
    pub detail_limit: Option<u64>,
}

/// Distinct values and date bounds offered by the filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilterOptions {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl SalesFilterOptions {
    pub fn values(&self, dimension: SalesDimension) -> &[String] {
        match dimension {
            SalesDimension::Category => &self.categories,
            SalesDimension::Region => &self.regions,
            SalesDimension::Segment => &self.segments,
        }
    }
}

/// Group-by dimension of the sales fact table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesDimension {
    Category,
    Region,
    Segment,
}

impl SalesDimension {
    pub const ALL: [SalesDimension; 3] = [
        SalesDimension::Category,
        SalesDimension::Region,
        SalesDimension::Segment,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SalesDimension::Category => "category",
            SalesDimension::Region => "region",
            SalesDimension::Segment => "segment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SalesDimension::Category => "Product category",
            SalesDimension::Region => "Region",
            SalesDimension::Segment => "Customer segment",
        }
    }
}

impl fmt::Display for SalesDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SalesDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(SalesDimension::Category),
            "region" => Ok(SalesDimension::Region),
            "segment" => Ok(SalesDimension::Segment),
            other => Err(format!("Unknown sales dimension: {}", other)),
        }
    }
}

/// Headline totals for the current filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_records: i64,
    pub categories: i64,
    pub regions: i64,
    pub earliest_date: Option<String>,
    pub latest_date: Option<String>,
    pub total_revenue: f64,
    pub avg_sales: f64,
    pub total_profit: f64,
    /// Percent; 0 when there is no revenue
    pub profit_margin: f64,
}

/// One row of a group-by rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRollupRow {
    pub key: String,
    pub total_sales: f64,
    pub total_profit: f64,
    pub transaction_count: i64,
    pub avg_sales: f64,
}

/// One row of the sales fact table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_category: String,
    pub region: String,
    pub customer_segment: String,
    pub sale_date: String,
    pub total_sales: f64,
    pub profit: f64,
}

/// Full sales dashboard for one filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesDashboardResponse {
    pub filter_panel: FilterPanel,
    /// Raw summary, absent when the summary query failed
    pub summary: Option<SalesSummary>,
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_the_default_state() {
        let state: SalesFilterState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SalesFilterState::default());
        assert_eq!(state.sales_range.max, Some(DEFAULT_SALES_RANGE_MAX));
    }

    #[test]
    fn test_null_max_opens_the_sales_range() {
        let state: SalesFilterState = serde_json::from_str(
            r#"{
                "date_mode": "last_7_days",
                "regions": { "mode": "subset", "selected": ["Kanto"] },
                "sales_range": { "enabled": true, "min": 10000, "max": null }
            }"#,
        )
        .unwrap();

        assert_eq!(state.date_mode, DateFilterMode::Last7Days);
        assert_eq!(state.regions, DimensionSelection::subset(["Kanto"]));
        assert_eq!(state.sales_range.max, None);
    }

    #[test]
    fn test_dimension_codes_round_trip() {
        for dimension in SalesDimension::ALL {
            assert_eq!(dimension.code().parse::<SalesDimension>(), Ok(dimension));
        }
        assert!("product".parse::<SalesDimension>().is_err());
    }
}
