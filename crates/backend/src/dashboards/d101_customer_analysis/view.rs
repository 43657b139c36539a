use contracts::dashboards::d101_customer_analysis::{
    CustomerDimension, CustomerRecord, CustomerRollupRow, CustomerSummary,
};
use contracts::shared::view::{BarPoint, Notice, Orientation, Section, Widget};

use crate::shared::aggregation::Bin;
use crate::shared::format::{format_currency, format_decimal, format_number};
use crate::shared::presentation::{bar_chart, histogram_chart, metric, pie_chart, table, BarSpec};

pub const SUMMARY_SECTION: &str = "summary";
pub const TOP_CUSTOMERS_SECTION: &str = "top_customers";
pub const HISTOGRAM_SECTION: &str = "sales_distribution";
pub const DETAIL_SECTION: &str = "detail";

pub fn rollup_section_id(dimension: CustomerDimension) -> String {
    format!("by_{}", dimension.code())
}

pub fn rollup_title(dimension: CustomerDimension) -> String {
    format!("Customers by {}", dimension.label().to_lowercase())
}

pub fn summary_section(summary: &CustomerSummary) -> Section {
    let cards = vec![
        metric(
            "customer_count",
            "Customers",
            format_number(summary.customer_count),
            summary.customer_count as f64,
        ),
        metric(
            "total_sales",
            "Total sales",
            format_currency(summary.total_sales),
            summary.total_sales,
        ),
        metric(
            "avg_sales",
            "Average sales per customer",
            format_currency(summary.avg_sales),
            summary.avg_sales,
        ),
        metric(
            "avg_visited_locations",
            "Average visited locations",
            format_decimal(summary.avg_visited_locations),
            summary.avg_visited_locations,
        ),
    ];

    let section = Section::new(SUMMARY_SECTION, "Customer overview").with_widget(Widget::Metrics { cards });
    if summary.customer_count == 0 {
        section.with_notice(Notice::no_data())
    } else {
        section
    }
}

/// Ranked horizontal bars, best customer on top
pub fn top_customers_section(top: &[CustomerRecord], n: usize) -> Section {
    let title = format!("Top {} customers by sales", n);
    let section = Section::new(TOP_CUSTOMERS_SECTION, title.clone());
    if top.is_empty() {
        return section.with_notice(Notice::no_data());
    }

    let bars = top
        .iter()
        .map(|c| BarPoint {
            label: c.name.clone(),
            value: c.total_sales,
            formatted: format_currency(c.total_sales),
            color_value: Some(c.visited_location_count as f64),
        })
        .collect();

    section.with_widget(Widget::Bar(bar_chart(
        BarSpec {
            title: &title,
            x_label: "Sales (¥)",
            y_label: "Customer",
            orientation: Orientation::Horizontal,
        },
        bars,
    )))
}

/// City bars are cut at `limit` entries; countries also get a share pie
pub fn rollup_section(dimension: CustomerDimension, rows: &[CustomerRollupRow], limit: usize) -> Section {
    let section = Section::new(rollup_section_id(dimension), rollup_title(dimension));
    if rows.is_empty() {
        return section.with_notice(Notice::no_data());
    }

    let shown: &[CustomerRollupRow] = match dimension {
        CustomerDimension::City => &rows[..rows.len().min(limit)],
        CustomerDimension::Country => rows,
    };

    let bar_title = format!("Sales by {}", dimension.label().to_lowercase());
    let bars = shown
        .iter()
        .map(|r| BarPoint {
            label: r.key.clone(),
            value: r.total_sales,
            formatted: format_currency(r.total_sales),
            color_value: Some(r.customer_count as f64),
        })
        .collect();
    let bar = bar_chart(
        BarSpec {
            title: &bar_title,
            x_label: dimension.label(),
            y_label: "Sales (¥)",
            orientation: Orientation::Vertical,
        },
        bars,
    );

    let section = section.with_widget(Widget::Bar(bar));
    let section = if dimension == CustomerDimension::Country {
        let slices: Vec<(String, f64)> = rows.iter().map(|r| (r.key.clone(), r.total_sales)).collect();
        section.with_widget(Widget::Pie(pie_chart("Sales share by country", &slices)))
    } else {
        section
    };

    section.with_widget(Widget::Table(table(
        &[dimension.label(), "Customers", "Sales"],
        shown
            .iter()
            .map(|r| {
                vec![
                    r.key.clone(),
                    format_number(r.customer_count),
                    format_currency(r.total_sales),
                ]
            })
            .collect(),
        rows.len(),
    )))
}

pub fn histogram_section(bins: &[Bin]) -> Section {
    let section = Section::new(HISTOGRAM_SECTION, "Distribution of customer sales");
    if bins.is_empty() {
        return section.with_notice(Notice::no_data());
    }
    section.with_widget(Widget::Histogram(histogram_chart(
        "Customer sales histogram",
        "Total sales (¥)",
        bins,
    )))
}

/// First rows of the filtered customers; `total_rows` is the full match count
pub fn detail_section(records: &[&CustomerRecord], cap: usize) -> Section {
    let section = Section::new(DETAIL_SECTION, "Customer detail");
    if records.is_empty() {
        return section.with_notice(Notice::no_data());
    }

    let rows = records
        .iter()
        .take(cap)
        .map(|c| {
            vec![
                c.customer_id.to_string(),
                c.name.clone(),
                c.city.clone(),
                c.country.clone(),
                format_currency(c.total_sales),
                c.visited_location_count.to_string(),
            ]
        })
        .collect();

    section.with_widget(Widget::Table(table(
        &["ID", "Name", "City", "Country", "Total sales", "Visited locations"],
        rows,
        records.len(),
    )))
}
