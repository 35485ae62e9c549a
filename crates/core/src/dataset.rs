//! Student dataset and the scoped views derived from it.
//!
//! A [`Dataset`] has two typed columns the access filter depends on
//! (`grade`, `region`) plus any number of further columns kept as text in
//! header order. A [`ScopedView`] can only be produced by
//! [`crate::scope::filter`] (or as the empty view), so holding one is proof
//! that the rows were restricted to some identity's scope.

use serde::{Deserialize, Serialize};

/// Column name of the grade column.
pub const GRADE_COLUMN: &str = "grade";
/// Column name of the region column.
pub const REGION_COLUMN: &str = "region";

/// A `grade` cell.
///
/// Parsing never fails at load time; cells that are not integers are kept as
/// `Text` and only become an error when a grade-scoped filter needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Grade {
    Number(i64),
    Text(String),
}

impl Grade {
    /// Interpret raw cell text. `"8"`, `" 8 "` and `"8.0"` are all grade 8.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Number(n);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Self::Number(f as i64)
            }
            _ => Self::Text(raw.to_string()),
        }
    }
}

impl From<i64> for Grade {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub grade: Grade,
    pub region: String,
    /// Values of the remaining columns, aligned with the owning table's
    /// `extra_columns`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Row {
    pub fn new(grade: i64, region: impl Into<String>) -> Self {
        Self::with_grade(Grade::Number(grade), region)
    }

    /// A row whose grade cell may not be numeric.
    pub fn with_grade(grade: Grade, region: impl Into<String>) -> Self {
        Self {
            grade,
            region: region.into(),
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

/// The full, unrestricted table. Read-only after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    extra_columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset. Rows whose `extra` length differs from
    /// `extra_columns` are padded with empty cells or truncated.
    pub fn new(extra_columns: Vec<String>, rows: Vec<Row>) -> Self {
        let width = extra_columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.extra.resize(width, String::new());
                row
            })
            .collect();
        Self {
            extra_columns,
            rows,
        }
    }

    /// An empty table with no extra columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The rows of a [`Dataset`] visible to one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedView {
    extra_columns: Vec<String>,
    rows: Vec<Row>,
}

impl ScopedView {
    /// Only the scope filter assembles non-empty views.
    pub(crate) fn from_rows(extra_columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            extra_columns,
            rows,
        }
    }

    /// The view that grants nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in display order: `grade`, `region`, then the rest.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![GRADE_COLUMN, REGION_COLUMN];
        columns.extend(self.extra_columns.iter().map(String::as_str));
        columns
    }

    /// Text cells of one row, aligned with [`Self::columns`].
    pub fn cells(row: &Row) -> Vec<String> {
        let mut cells = vec![row.grade.to_string(), row.region.clone()];
        cells.extend(row.extra.iter().cloned());
        cells
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                let grade = match &row.grade {
                    Grade::Number(n) => serde_json::json!(n),
                    Grade::Text(t) => serde_json::json!(t),
                };
                record.insert(GRADE_COLUMN.into(), grade);
                record.insert(REGION_COLUMN.into(), serde_json::json!(row.region));
                for (name, value) in self.extra_columns.iter().zip(&row.extra) {
                    record.insert(name.clone(), serde_json::json!(value));
                }
                serde_json::Value::Object(record)
            })
            .collect()
    }
}
