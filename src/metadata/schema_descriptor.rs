use super::column_descriptor::ColumnDescriptor;

/// The flat list of leaf-column descriptors a `PageWriteStore` is built from.
///
/// Nested-group resolution (turning a `message` schema into this flat, DFS-ordered list)
/// is an external concern; callers hand us the already-resolved leaves.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    columns: Vec<ColumnDescriptor>,
}

impl SchemaDescriptor {
    /// Creates a new schema descriptor from an already-flattened list of leaf columns.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Returns the [`ColumnDescriptor`] at a field position.
    pub fn column(&self, i: usize) -> &ColumnDescriptor {
        &self.columns[i]
    }

    /// Returns the full slice of [`ColumnDescriptor`]s.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the number of leaf-level columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::PhysicalType;

    #[test]
    fn exposes_columns_by_index() {
        let a = ColumnDescriptor::new(PhysicalType::Int32, 0, 0, vec!["a".to_string()]);
        let b = ColumnDescriptor::new(PhysicalType::ByteArray, 1, 0, vec!["b".to_string()]);
        let schema = SchemaDescriptor::new(vec![a, b]);

        assert_eq!(schema.num_columns(), 2);
        assert_eq!(schema.column(1).name(), "b");
    }
}
