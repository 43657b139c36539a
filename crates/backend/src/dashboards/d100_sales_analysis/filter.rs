use chrono::{Duration, NaiveDate};
use contracts::dashboards::d100_sales_analysis::{
    DateFilterMode, DimensionSelection, SalesDimension, SalesFilterOptions, SalesFilterState,
    SalesRangeInput, SelectionMode,
};

use crate::shared::format::format_currency;

/// Resolved date restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    All,
    /// Inclusive on both ends
    Between(NaiveDate, NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRange {
    pub min: f64,
    /// `None` = no upper bound
    pub max: Option<f64>,
}

/// Normalized filter derived from one request's widget state.
///
/// `None` on an inclusion list means the dimension is not restricted.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFilterSpec {
    pub date_range: DateRange,
    pub categories: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
    pub segments: Option<Vec<String>>,
    pub sales_range: Option<SalesRange>,
}

impl SalesFilterSpec {
    pub fn unrestricted() -> Self {
        Self {
            date_range: DateRange::All,
            categories: None,
            regions: None,
            segments: None,
            sales_range: None,
        }
    }

    pub fn inclusion(&self, dimension: SalesDimension) -> Option<&[String]> {
        match dimension {
            SalesDimension::Category => self.categories.as_deref(),
            SalesDimension::Region => self.regions.as_deref(),
            SalesDimension::Segment => self.segments.as_deref(),
        }
    }

    /// Human-readable lines for the filter panel
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let DateRange::Between(from, to) = self.date_range {
            lines.push(format!("Period: {} to {}", from, to));
        }

        for dimension in SalesDimension::ALL {
            if let Some(values) = self.inclusion(dimension) {
                lines.push(format!("{}: {}", dimension.label(), values.join(", ")));
            }
        }

        if let Some(range) = &self.sales_range {
            match range.max {
                Some(max) => lines.push(format!(
                    "Sales amount: {} to {}",
                    format_currency(range.min),
                    format_currency(max)
                )),
                None => lines.push(format!("Sales amount: at least {}", format_currency(range.min))),
            }
        }

        lines
    }
}

/// Map the raw widget state onto a filter spec.
///
/// Options describe what the warehouse currently holds; selections are
/// checked against them.
pub fn resolve(state: &SalesFilterState, options: &SalesFilterOptions) -> SalesFilterSpec {
    SalesFilterSpec {
        date_range: resolve_date_range(state, options),
        categories: resolve_selection(&state.categories, options.values(SalesDimension::Category)),
        regions: resolve_selection(&state.regions, options.values(SalesDimension::Region)),
        segments: resolve_selection(&state.segments, options.values(SalesDimension::Segment)),
        sales_range: resolve_sales_range(&state.sales_range),
    }
}

fn resolve_date_range(state: &SalesFilterState, options: &SalesFilterOptions) -> DateRange {
    match state.date_mode {
        DateFilterMode::AllTime => DateRange::All,
        DateFilterMode::CustomRange => match (state.custom_from, state.custom_to) {
            (Some(a), Some(b)) => {
                let (from, to) = if a <= b { (a, b) } else { (b, a) };
                DateRange::Between(
                    clamp_date(from, options.min_date, options.max_date),
                    clamp_date(to, options.min_date, options.max_date),
                )
            }
            // a half-picked range restricts nothing
            _ => DateRange::All,
        },
        DateFilterMode::Last7Days | DateFilterMode::Last30Days => {
            let days = state.date_mode.window_days().unwrap_or_default();
            match options.max_date {
                Some(end) => DateRange::Between(end - Duration::days(days), end),
                None => DateRange::All,
            }
        }
    }
}

fn clamp_date(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> NaiveDate {
    let date = match min {
        Some(min) if date < min => min,
        _ => date,
    };
    match max {
        Some(max) if date > max => max,
        _ => date,
    }
}

fn resolve_selection(selection: &DimensionSelection, available: &[String]) -> Option<Vec<String>> {
    if selection.mode == SelectionMode::All {
        return None;
    }

    // Keep the option order and drop values the warehouse does not have
    let chosen: Vec<String> = available
        .iter()
        .filter(|value| selection.selected.contains(value))
        .cloned()
        .collect();

    if chosen.is_empty() || chosen.len() == available.len() {
        None
    } else {
        Some(chosen)
    }
}

fn resolve_sales_range(input: &SalesRangeInput) -> Option<SalesRange> {
    if !input.enabled {
        return None;
    }
    Some(SalesRange {
        min: input.min,
        max: input.max,
    })
}
