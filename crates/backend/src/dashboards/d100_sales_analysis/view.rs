use contracts::dashboards::d100_sales_analysis::{
    SalesDimension, SalesRecord, SalesRollupRow, SalesSummary,
};
use contracts::shared::view::{BarPoint, Notice, Orientation, Section, Widget};

use crate::shared::format::{format_count, format_currency, format_percent};
use crate::shared::presentation::{bar_chart, metric, pie_chart, table, BarSpec};

pub const SUMMARY_SECTION: &str = "summary";
pub const DETAIL_SECTION: &str = "detail";

pub fn rollup_section_id(dimension: SalesDimension) -> String {
    format!("by_{}", dimension.code())
}

pub fn rollup_title(dimension: SalesDimension) -> String {
    format!("Sales by {}", dimension.label().to_lowercase())
}

pub fn summary_section(summary: &SalesSummary) -> Section {
    let cards = vec![
        metric(
            "total_records",
            "Total records",
            format_count(summary.total_records),
            summary.total_records as f64,
        ),
        metric(
            "total_revenue",
            "Total revenue",
            format_currency(summary.total_revenue),
            summary.total_revenue,
        ),
        metric(
            "total_profit",
            "Total profit",
            format_currency(summary.total_profit),
            summary.total_profit,
        ),
        metric(
            "avg_sales",
            "Average sale",
            format_currency(summary.avg_sales),
            summary.avg_sales,
        ),
        metric(
            "profit_margin",
            "Profit margin",
            format_percent(summary.profit_margin),
            summary.profit_margin,
        ),
    ];

    let section = Section::new(SUMMARY_SECTION, "Data overview").with_widget(Widget::Metrics { cards });
    if summary.total_records == 0 {
        section.with_notice(Notice::no_data())
    } else {
        section
    }
}

/// Category gets a share pie next to its bars; other dimensions only bars
pub fn rollup_section(dimension: SalesDimension, rows: &[SalesRollupRow]) -> Section {
    let section = Section::new(rollup_section_id(dimension), rollup_title(dimension));
    if rows.is_empty() {
        return section.with_notice(Notice::no_data());
    }

    let bars = rows
        .iter()
        .map(|r| BarPoint {
            label: r.key.clone(),
            value: r.total_sales,
            formatted: format_currency(r.total_sales),
            color_value: Some(r.total_profit),
        })
        .collect();
    let bar_title = format!("Sales amount by {}", dimension.label().to_lowercase());
    let bar = bar_chart(
        BarSpec {
            title: &bar_title,
            x_label: dimension.label(),
            y_label: "Sales (¥)",
            orientation: Orientation::Vertical,
        },
        bars,
    );

    let section = if dimension == SalesDimension::Category {
        let slices: Vec<(String, f64)> = rows.iter().map(|r| (r.key.clone(), r.total_sales)).collect();
        section.with_widget(Widget::Pie(pie_chart("Sales distribution by category", &slices)))
    } else {
        section
    };

    section.with_widget(Widget::Bar(bar)).with_widget(Widget::Table(table(
        &[dimension.label(), "Sales", "Profit", "Transactions", "Average sale"],
        rows.iter()
            .map(|r| {
                vec![
                    r.key.clone(),
                    format_currency(r.total_sales),
                    format_currency(r.total_profit),
                    format_count(r.transaction_count),
                    format_currency(r.avg_sales),
                ]
            })
            .collect(),
        rows.len(),
    )))
}

pub fn detail_section(records: &[SalesRecord], total_rows: usize) -> Section {
    let section = Section::new(DETAIL_SECTION, "Sales detail");
    if total_rows == 0 {
        return section.with_notice(Notice::no_data());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.sale_date.clone(),
                r.product_category.clone(),
                r.region.clone(),
                r.customer_segment.clone(),
                format_currency(r.total_sales),
                format_currency(r.profit),
            ]
        })
        .collect();

    section.with_widget(Widget::Table(table(
        &["Date", "Category", "Region", "Segment", "Sales", "Profit"],
        rows,
        total_rows,
    )))
}
