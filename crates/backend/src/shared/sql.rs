use sea_orm::Statement;

/// Bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Integer(i64),
    Numeric(f64),
}

impl From<QueryParam> for sea_orm::Value {
    fn from(param: QueryParam) -> Self {
        match param {
            QueryParam::Text(s) => s.into(),
            QueryParam::Integer(i) => i.into(),
            QueryParam::Numeric(n) => n.into(),
        }
    }
}

/// AND-joined WHERE conditions with `?` placeholders and their values.
///
/// Only column names chosen by the code end up in the condition text; every
/// user-supplied value travels in `params`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<String>,
    params: Vec<QueryParam>,
}

impl Predicate {
    /// Predicate matching every row
    pub fn always_true() -> Self {
        Self::default()
    }

    /// Append one condition; the number of `?` in `condition` must match `params`
    pub fn and(&mut self, condition: impl Into<String>, params: Vec<QueryParam>) {
        let condition = condition.into();
        debug_assert_eq!(condition.matches('?').count(), params.len());
        self.conditions.push(condition);
        self.params.extend(params);
    }

    /// `column IN (?, ?, ...)`
    pub fn and_in(&mut self, column: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        self.and(
            format!("{} IN ({})", column, placeholders(values.len())),
            values.iter().cloned().map(QueryParam::Text).collect(),
        );
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Condition text for a WHERE clause, `1=1` when nothing is restricted
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    /// `WHERE ...` preview for the filter panel
    pub fn preview(&self) -> String {
        format!("WHERE {}", self.sql())
    }
}

/// `?, ?, ?` for `n` values
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Build a SQLite statement from SQL text and bound parameters
pub fn build_statement<I>(sql: &str, params: I) -> Statement
where
    I: IntoIterator<Item = QueryParam>,
{
    let values: Vec<sea_orm::Value> = params.into_iter().map(Into::into).collect();
    Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, sql, values)
}
