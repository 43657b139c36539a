//! Presentation view models returned by the dashboard endpoints.
//!
//! Every value in these structs is already formatted for display; a client
//! only lays the widgets out.

mod chart;
mod table;

pub use chart::*;
pub use table::*;

use serde::{Deserialize, Serialize};

/// Severity of an inline notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Inline message shown instead of (or next to) a widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Standard message for a filter combination that matches nothing
    pub fn no_data() -> Self {
        Self::info(NO_DATA_MESSAGE)
    }
}

pub const NO_DATA_MESSAGE: &str = "No data matches the selected filter conditions.";

/// Single metric card (e.g. "Total revenue: ¥520,000")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub id: String,
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Unformatted value for clients that draw their own
    pub raw: f64,
}

/// One renderable element of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Metrics { cards: Vec<MetricCard> },
    Pie(PieChart),
    Bar(BarChart),
    Histogram(HistogramChart),
    Table(TableView),
    Notice(Notice),
}

/// A titled block of the dashboard page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub widgets: Vec<Widget>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            widgets: Vec::new(),
        }
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn with_notice(self, notice: Notice) -> Self {
        self.with_widget(Widget::Notice(notice))
    }

    /// Notices of the section, in order
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.widgets.iter().filter_map(|w| match w {
            Widget::Notice(n) => Some(n),
            _ => None,
        })
    }

    /// True when the section carries the "no data" notice
    pub fn is_empty_result(&self) -> bool {
        self.notices()
            .any(|n| n.level == NoticeLevel::Info && n.message == NO_DATA_MESSAGE)
    }
}

/// Filter panel summary: what is applied and how it reached the warehouse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPanel {
    /// Human-readable list of active filters; empty means unrestricted
    pub applied: Vec<String>,
    /// Parameterized predicate as sent to the warehouse (`WHERE ...`)
    pub sql_preview: Option<String>,
    pub notices: Vec<Notice>,
}

/// Response of the per-section endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResponse {
    pub filter_panel: FilterPanel,
    pub section: Section,
}
