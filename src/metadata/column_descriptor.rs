use crate::schema::types::PhysicalType;

/// A descriptor for one leaf-level (primitive) column.
///
/// Deliberately data-only: full schema resolution (nesting, logical types) is an external
/// concern. The writer needs only the physical type (to pick a statistics and dictionary
/// implementation), the path (for error messages and the file writer), and the def/rep
/// level bounds (to derive `non_null_value_count` on v1 pages).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ColumnDescriptor {
    physical_type: PhysicalType,
    max_def_level: i16,
    max_rep_level: i16,
    path: Vec<String>,
}

impl ColumnDescriptor {
    /// Creates a new descriptor for a leaf-level column.
    pub fn new(
        physical_type: PhysicalType,
        max_def_level: i16,
        max_rep_level: i16,
        path: Vec<String>,
    ) -> Self {
        Self {
            physical_type,
            max_def_level,
            max_rep_level,
            path,
        }
    }

    /// The physical type backing this column's values.
    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// The dotted path of this column, e.g. `["a", "b", "c"]` for `a.b.c`.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The column's name, i.e. the last path segment.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// The dotted path joined with `.`, used in error messages and log lines.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}
