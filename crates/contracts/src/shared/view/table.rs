use serde::{Deserialize, Serialize};

/// Detail table with display-ready cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Number of rows that matched before any display cap
    pub total_rows: usize,
}

impl TableView {
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }
}
