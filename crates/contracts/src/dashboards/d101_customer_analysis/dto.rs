use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::view::{FilterPanel, Section};

/// Country dropdown value meaning "no restriction"
pub const ALL_COUNTRIES: &str = "All";

/// One row of the customer loyalty view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub total_sales: f64,
    pub visited_location_count: i64,
}

/// Raw widget values of the customer filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilterState {
    /// Country dropdown; `None` or `"All"` keeps every country
    #[serde(default)]
    pub country: Option<String>,
    /// Lower handle of the sales slider; defaults to the data minimum
    #[serde(default)]
    pub sales_min: Option<f64>,
    /// Upper handle of the sales slider; defaults to the data maximum
    #[serde(default)]
    pub sales_max: Option<f64>,
    /// Overrides the configured ranking length
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Overrides the configured histogram bin count
    #[serde(default)]
    pub histogram_bins: Option<usize>,
}

/// Dropdown entries and slider bounds of the customer filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilterOptions {
    pub countries: Vec<String>,
    pub sales_min: f64,
    pub sales_max: f64,
    pub customer_count: usize,
}

/// Group-by dimension of the customer dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerDimension {
    City,
    Country,
}

impl CustomerDimension {
    pub fn code(&self) -> &'static str {
        match self {
            CustomerDimension::City => "city",
            CustomerDimension::Country => "country",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerDimension::City => "City",
            CustomerDimension::Country => "Country",
        }
    }

    pub fn key_of<'a>(&self, record: &'a CustomerRecord) -> &'a str {
        match self {
            CustomerDimension::City => &record.city,
            CustomerDimension::Country => &record.country,
        }
    }
}

impl fmt::Display for CustomerDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CustomerDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(CustomerDimension::City),
            "country" => Ok(CustomerDimension::Country),
            other => Err(format!("Unknown customer dimension: {}", other)),
        }
    }
}

/// Headline totals for the filtered customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_count: usize,
    pub total_sales: f64,
    pub avg_sales: f64,
    pub avg_visited_locations: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRollupRow {
    pub key: String,
    pub customer_count: usize,
    pub total_sales: f64,
}

/// Full customer dashboard for one filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDashboardResponse {
    pub filter_panel: FilterPanel,
    pub summary: Option<CustomerSummary>,
    pub sections: Vec<Section>,
}
