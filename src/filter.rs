use std::collections::HashMap;

use tracing::trace;

use crate::catalog::ColumnCatalog;
use crate::cell::Row;
use crate::domain::TVError;

/// The columns currently used as filters and the value typed for each of them.
///
/// Removing a column also drops its value, so `values` never holds a key that is
/// not in `active_columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    active_columns: Vec<String>,
    values: HashMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a column with an empty value. Does nothing if already active.
    pub fn add_column(&mut self, name: &str) {
        if self.is_active(name) {
            return;
        }
        trace!("Activate filter column \"{name}\"");
        self.active_columns.push(name.to_string());
        self.values.insert(name.to_string(), String::new());
    }

    pub fn remove_column(&mut self, name: &str) {
        if let Some(pos) = self.active_columns.iter().position(|c| c == name) {
            trace!("Deactivate filter column \"{name}\"");
            self.active_columns.remove(pos);
            self.values.remove(name);
        }
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), TVError> {
        if !self.is_active(name) {
            return Err(TVError::InactiveColumn(name.to_string()));
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active_columns.iter().any(|c| c == name)
    }

    pub fn active_columns(&self) -> &[String] {
        &self.active_columns
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// The filter value of an active column. Empty when nothing was typed yet.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.active_columns.is_empty()
    }

    /// Resolves every active column against the catalog and returns the combined
    /// row test. Fails on the first column the catalog does not know.
    pub fn predicate(&self, catalog: &ColumnCatalog) -> Result<RowPredicate, TVError> {
        let clauses = self
            .active_columns
            .iter()
            .map(|name| {
                Ok(Clause {
                    position: catalog.position(name)?,
                    needle: self.value(name).unwrap_or_default().to_lowercase(),
                })
            })
            .collect::<Result<Vec<_>, TVError>>()?;
        Ok(RowPredicate { clauses })
    }
}

#[derive(Debug, Clone)]
struct Clause {
    position: usize,
    needle: String,
}

/// Logical AND over the active filter columns, with column positions already resolved.
#[derive(Debug, Clone)]
pub struct RowPredicate {
    clauses: Vec<Clause>,
}

impl RowPredicate {
    /// A null (or missing) cell in a filtered column never matches, not even an
    /// empty filter value. Otherwise the match is a case-insensitive substring test.
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses.iter().all(|clause| {
            row.get(clause.position)
                .and_then(|cell| cell.display_text())
                .is_some_and(|text| text.to_lowercase().contains(&clause.needle))
        })
    }
}
