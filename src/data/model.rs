use std::fmt;

// ---------------------------------------------------------------------------
// Column – one named numeric series
// ---------------------------------------------------------------------------

/// A single named column of the exported table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header text as it appeared in the file (trimmed).
    pub name: String,
    /// One value per data row; empty cells are `NaN`.
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded CSV
// ---------------------------------------------------------------------------

/// The parsed instrument export: ordered, labeled, numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    /// Number of preamble lines (comments / blanks) skipped before the header.
    pub skip_rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>, skip_rows: usize) -> Self {
        Table { columns, skip_rows }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows (all columns have the same length).
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column headers in file order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows x {} columns [{}]",
            self.len(),
            self.width(),
            self.headers().join(", ")
        )
    }
}
