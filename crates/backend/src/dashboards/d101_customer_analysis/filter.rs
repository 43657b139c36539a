use contracts::dashboards::d101_customer_analysis::{
    CustomerFilterOptions, CustomerFilterState, CustomerRecord, ALL_COUNTRIES,
};

use crate::shared::format::format_currency;

/// Loaded customer table plus the options shown in the filter panel
#[derive(Debug, Clone, Default)]
pub struct CustomerDataset {
    pub records: Vec<CustomerRecord>,
    pub options: CustomerFilterOptions,
}

/// Sorted distinct countries and the sales bounds of `records`
pub fn derive_options(records: &[CustomerRecord]) -> CustomerFilterOptions {
    let mut countries: Vec<String> = records
        .iter()
        .map(|r| r.country.clone())
        .filter(|c| !c.is_empty())
        .collect();
    countries.sort();
    countries.dedup();

    let (sales_min, sales_max) = if records.is_empty() {
        (0.0, 0.0)
    } else {
        records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.total_sales), hi.max(r.total_sales))
        })
    };

    CustomerFilterOptions {
        countries,
        sales_min,
        sales_max,
        customer_count: records.len(),
    }
}

/// Resolved customer filter; `None` fields restrict nothing
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFilterSpec {
    pub country: Option<String>,
    /// Inclusive sales bounds
    pub sales_range: Option<(f64, f64)>,
}

impl CustomerFilterSpec {
    pub fn unrestricted() -> Self {
        Self {
            country: None,
            sales_range: None,
        }
    }

    pub fn matches(&self, record: &CustomerRecord) -> bool {
        if let Some(country) = &self.country {
            if record.country != *country {
                return false;
            }
        }
        match self.sales_range {
            Some((lo, hi)) => record.total_sales >= lo && record.total_sales <= hi,
            None => true,
        }
    }

    pub fn apply<'a>(&self, records: &'a [CustomerRecord]) -> Vec<&'a CustomerRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Selected country that the loaded data does not contain
    pub fn unknown_country(&self, options: &CustomerFilterOptions) -> Option<&str> {
        self.country
            .as_deref()
            .filter(|c| !options.countries.iter().any(|known| known == c))
    }

    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(country) = &self.country {
            lines.push(format!("Country: {}", country));
        }
        if let Some((lo, hi)) = self.sales_range {
            lines.push(format!(
                "Total sales: {} to {}",
                format_currency(lo),
                format_currency(hi)
            ));
        }
        lines
    }
}

pub fn resolve(state: &CustomerFilterState, options: &CustomerFilterOptions) -> CustomerFilterSpec {
    let country = state
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_COUNTRIES)
        .map(str::to_string);

    let lo = state.sales_min.unwrap_or(options.sales_min);
    let hi = state.sales_max.unwrap_or(options.sales_max);
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    // A slider left at the data bounds keeps every customer
    let sales_range = if lo <= options.sales_min && hi >= options.sales_max {
        None
    } else {
        Some((lo, hi))
    };

    CustomerFilterSpec {
        country,
        sales_range,
    }
}
