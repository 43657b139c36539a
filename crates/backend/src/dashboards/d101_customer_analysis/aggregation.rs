use contracts::dashboards::d101_customer_analysis::{
    CustomerDimension, CustomerRecord, CustomerRollupRow, CustomerSummary,
};
use std::collections::BTreeMap;

use crate::shared::aggregation::{descending, equal_width_bins, mean, top_n_by, Bin};

pub fn summarize(records: &[&CustomerRecord]) -> CustomerSummary {
    let total_sales: f64 = records.iter().map(|r| r.total_sales).sum();
    CustomerSummary {
        customer_count: records.len(),
        total_sales,
        avg_sales: mean(records.iter().map(|r| r.total_sales)),
        avg_visited_locations: mean(records.iter().map(|r| r.visited_location_count as f64)),
    }
}

/// Customer count and sales per city or country, highest sales first
pub fn rollup(records: &[&CustomerRecord], dimension: CustomerDimension) -> Vec<CustomerRollupRow> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(dimension.key_of(record)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.total_sales;
    }

    // BTreeMap order breaks ties alphabetically
    let mut rows: Vec<CustomerRollupRow> = groups
        .into_iter()
        .map(|(key, (customer_count, total_sales))| CustomerRollupRow {
            key: key.to_string(),
            customer_count,
            total_sales,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.total_sales, b.total_sales));
    rows
}

/// Exactly `min(n, len)` customers, non-increasing sales
pub fn top_customers(records: &[&CustomerRecord], n: usize) -> Vec<CustomerRecord> {
    top_n_by(records.iter().map(|r| (*r).clone()), n, |r| r.total_sales)
}

pub fn histogram(records: &[&CustomerRecord], bins: usize) -> Vec<Bin> {
    let values: Vec<f64> = records.iter().map(|r| r.total_sales).collect();
    equal_width_bins(&values, bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d101_customer_analysis::filter::derive_options;
    use crate::shared::data::test_support;

    fn customers() -> Vec<CustomerRecord> {
        test_support::sample_customers()
            .into_iter()
            .map(|c| CustomerRecord {
                customer_id: c.customer_id,
                name: format!("{} {}", c.first_name, c.last_name),
                city: c.city,
                country: c.country,
                total_sales: c.total_sales,
                visited_location_count: 0,
            })
            .collect()
    }

    #[test]
    fn test_summary_totals() {
        let data = customers();
        let refs: Vec<&CustomerRecord> = data.iter().collect();
        let summary = summarize(&refs);

        assert_eq!(summary.customer_count, 6);
        assert_eq!(summary.total_sales, 1_760_000.0);
        assert!((summary.avg_sales - 293_333.333).abs() < 1e-2);
    }

    #[test]
    fn test_summary_of_nobody_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.customer_count, 0);
        assert_eq!(summary.avg_sales, 0.0);
        assert_eq!(summary.avg_visited_locations, 0.0);
    }

    #[test]
    fn test_country_and_city_rollups() {
        let data = customers();
        let refs: Vec<&CustomerRecord> = data.iter().collect();

        let countries = rollup(&refs, CustomerDimension::Country);
        let keys: Vec<&str> = countries.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Japan", "USA", "China"]);
        assert_eq!(countries[0].customer_count, 3);
        assert_eq!(countries[0].total_sales, 910_000.0);

        let cities = rollup(&refs, CustomerDimension::City);
        assert_eq!(cities[0].key, "Tokyo");
        assert_eq!(cities[0].total_sales, 590_000.0);
        assert_eq!(cities.len(), 5);
    }

    #[test]
    fn test_top_n_length_and_order() {
        let data = customers();
        let refs: Vec<&CustomerRecord> = data.iter().collect();

        for n in [0, 1, 3, 6, 10] {
            let top = top_customers(&refs, n);
            assert_eq!(top.len(), n.min(data.len()));
            assert!(top.windows(2).all(|w| w[0].total_sales >= w[1].total_sales));
        }
        assert_eq!(top_customers(&refs, 1)[0].name, "Taro Yamada");
    }

    #[test]
    fn test_histogram_counts_every_customer() {
        let data = customers();
        let refs: Vec<&CustomerRecord> = data.iter().collect();
        let bins = histogram(&refs, 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 6);
        assert_eq!(bins[0].lower, derive_options(&data).sales_min);
        assert_eq!(bins[3].upper, 500_000.0);
    }
}
