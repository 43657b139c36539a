use contracts::dashboards::d100_sales_analysis::SalesDimension;

use super::filter::{DateRange, SalesFilterSpec};
use crate::shared::sql::{Predicate, QueryParam};

/// Column of `sales_data` backing a dimension
pub fn dimension_column(dimension: SalesDimension) -> &'static str {
    match dimension {
        SalesDimension::Category => "product_category",
        SalesDimension::Region => "region",
        SalesDimension::Segment => "customer_segment",
    }
}

/// Translate a filter spec into a parameterized WHERE predicate.
///
/// Condition order: date, category, region, segment, sales amount.
pub fn build_predicate(spec: &SalesFilterSpec) -> Predicate {
    let mut predicate = Predicate::always_true();

    if let DateRange::Between(from, to) = spec.date_range {
        predicate.and(
            "sale_date BETWEEN ? AND ?",
            vec![
                QueryParam::Text(from.format("%Y-%m-%d").to_string()),
                QueryParam::Text(to.format("%Y-%m-%d").to_string()),
            ],
        );
    }

    for dimension in SalesDimension::ALL {
        if let Some(values) = spec.inclusion(dimension) {
            predicate.and_in(dimension_column(dimension), values);
        }
    }

    if let Some(range) = &spec.sales_range {
        match range.max {
            Some(max) => predicate.and(
                "total_sales BETWEEN ? AND ?",
                vec![QueryParam::Numeric(range.min), QueryParam::Numeric(max)],
            ),
            None => predicate.and("total_sales >= ?", vec![QueryParam::Numeric(range.min)]),
        }
    }

    predicate
}
