//! Builders for the view models shared by both dashboards.

use contracts::shared::view::{
    BarChart, BarPoint, HistogramBin, HistogramChart, MetricCard, Notice, Orientation, PieChart,
    PieSlice, Section, TableView,
};

use super::aggregation::{safe_ratio, Bin};

pub fn metric(id: &str, label: &str, value: String, raw: f64) -> MetricCard {
    MetricCard {
        id: id.to_string(),
        label: label.to_string(),
        value,
        raw,
    }
}

/// Pie chart; shares are relative to the sum of all slices
pub fn pie_chart(title: &str, items: &[(String, f64)]) -> PieChart {
    let total: f64 = items.iter().map(|(_, v)| v).sum();
    PieChart {
        title: title.to_string(),
        slices: items
            .iter()
            .map(|(label, value)| PieSlice {
                label: label.clone(),
                value: *value,
                share_percent: safe_ratio(*value, total) * 100.0,
            })
            .collect(),
    }
}

pub struct BarSpec<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub orientation: Orientation,
}

pub fn bar_chart(spec: BarSpec<'_>, bars: Vec<BarPoint>) -> BarChart {
    BarChart {
        title: spec.title.to_string(),
        x_label: spec.x_label.to_string(),
        y_label: spec.y_label.to_string(),
        orientation: spec.orientation,
        bars,
    }
}

pub fn histogram_chart(title: &str, x_label: &str, bins: &[Bin]) -> HistogramChart {
    HistogramChart {
        title: title.to_string(),
        x_label: x_label.to_string(),
        bins: bins
            .iter()
            .map(|b| HistogramBin {
                lower: b.lower,
                upper: b.upper,
                count: b.count,
            })
            .collect(),
    }
}

pub fn table(columns: &[&str], rows: Vec<Vec<String>>, total_rows: usize) -> TableView {
    TableView {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
        total_rows,
    }
}

/// Section that only reports a failed query
pub fn failed_section(id: &str, title: &str, context: &str, error: &anyhow::Error) -> Section {
    Section::new(id, title).with_notice(Notice::error(format!("{}: {}", context, error)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_shares_sum_to_hundred() {
        let pie = pie_chart(
            "Share",
            &[("a".to_string(), 300.0), ("b".to_string(), 100.0)],
        );
        assert_eq!(pie.slices[0].share_percent, 75.0);
        assert_eq!(pie.slices[1].share_percent, 25.0);
    }

    #[test]
    fn test_pie_with_zero_total_has_zero_shares() {
        let pie = pie_chart("Share", &[("a".to_string(), 0.0)]);
        assert_eq!(pie.slices[0].share_percent, 0.0);
    }

    #[test]
    fn test_failed_section_carries_error_notice() {
        let section = failed_section("summary", "Summary", "Query failed", &anyhow::anyhow!("boom"));
        let notices: Vec<_> = section.notices().collect();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Query failed: boom");
    }
}
