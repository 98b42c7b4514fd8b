use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cell::{Cell, Column, Dataset, Row};
use crate::domain::TVError;

/// Read-only view over the column descriptors and the rows of a table.
///
/// Column names are resolved to row positions through a map built once on
/// construction. When two columns share a name the first one wins.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
    rows: Dataset,
}

impl ColumnCatalog {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self::from_shared(columns, Arc::new(rows))
    }

    pub fn from_shared(columns: Vec<Column>, rows: Dataset) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            positions.entry(column.name.clone()).or_insert(idx);
        }
        debug!(
            "Catalog with {} columns and {} rows",
            columns.len(),
            rows.len()
        );
        Self {
            columns,
            positions,
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn rows(&self) -> &Dataset {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Result<usize, TVError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| TVError::UnknownColumn(name.to_string()))
    }

    /// Distinct non-null values of a column in the order they first appear.
    ///
    /// The cells are returned as stored; use [`Cell::display_text`] to show them.
    pub fn distinct_values(&self, name: &str) -> Result<Vec<Cell>, TVError> {
        let idx = self.position(name)?;
        let start_time = Instant::now();

        let mut seen: HashSet<&Cell> = HashSet::new();
        let mut values = Vec::new();
        for cell in self.rows.iter().filter_map(|row| row.get(idx)) {
            if !cell.is_null() && seen.insert(cell) {
                values.push(cell.clone());
            }
        }

        trace!(
            "Found {} distinct values for \"{}\" in {}ms",
            values.len(),
            name,
            start_time.elapsed().as_millis()
        );
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(rows: Vec<Row>) -> ColumnCatalog {
        ColumnCatalog::new(vec![Column::new("x"), Column::new("y")], rows)
    }

    #[test]
    fn distinct_values_keep_first_occurrence_order() {
        let cat = ColumnCatalog::new(
            vec![Column::new("x")],
            vec![
                vec![Cell::from("a")],
                vec![Cell::from("b")],
                vec![Cell::from("a")],
                vec![Cell::Null],
            ],
        );
        assert_eq!(
            cat.distinct_values("x").unwrap(),
            vec![Cell::from("a"), Cell::from("b")]
        );
    }

    #[test]
    fn distinct_values_return_the_stored_cell() {
        let link = Cell::structured("home").with_attr("href", "/");
        let cat = catalog(vec![
            vec![link.clone(), Cell::from(1)],
            vec![Cell::from("home"), Cell::from(1)],
        ]);
        assert_eq!(
            cat.distinct_values("x").unwrap(),
            vec![link, Cell::from("home")]
        );
        assert_eq!(cat.distinct_values("y").unwrap(), vec![Cell::from(1)]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let cat = catalog(vec![vec![Cell::from("a"), Cell::from(1)]]);
        assert!(matches!(
            cat.distinct_values("z"),
            Err(TVError::UnknownColumn(name)) if name == "z"
        ));
    }

    #[test]
    fn duplicate_names_resolve_to_the_first_column() {
        let cat = ColumnCatalog::new(
            vec![Column::new("x"), Column::new("x")],
            vec![vec![Cell::from("first"), Cell::from("second")]],
        );
        assert_eq!(cat.position("x").unwrap(), 0);
        assert_eq!(
            cat.distinct_values("x").unwrap(),
            vec![Cell::from("first")]
        );
    }

    #[test]
    fn short_rows_are_skipped() {
        let cat = catalog(vec![vec![Cell::from("a")], vec![Cell::from("b"), Cell::from(2)]]);
        assert_eq!(cat.distinct_values("y").unwrap(), vec![Cell::from(2)]);
    }
}
