//! Small numeric helpers shared by both dashboards' aggregation steps.

use std::cmp::Ordering;

/// `numerator / denominator`, or 0 when the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Profit margin in percent; 0 when there is no revenue
pub fn profit_margin(profit: f64, revenue: f64) -> f64 {
    safe_ratio(profit, revenue) * 100.0
}

/// Mean of the values, 0 for an empty slice
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    safe_ratio(sum, count as f64)
}

/// The `n` items with the largest `key`, highest first.
///
/// Ties keep their input order, so the result is deterministic for a given input.
pub fn top_n_by<T, F>(items: impl IntoIterator<Item = T>, n: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by(|a, b| descending(key(a), key(b)));
    items.truncate(n);
    items
}

/// Comparator for a descending sort on f64 keys
pub fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Upper bound on the number of histogram buckets
pub const MAX_HISTOGRAM_BINS: usize = 200;

/// Equal-width histogram bin
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Split `values` into `bins` equal-width buckets between their min and max.
///
/// The last bucket is closed on the right so the maximum is counted. When
/// every value is equal there is one bucket holding all of them. `bins` is
/// clamped to `1..=MAX_HISTOGRAM_BINS`.
pub fn equal_width_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![Bin {
            lower: min,
            upper: max,
            count: values.len() as u64,
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }

    result
}
