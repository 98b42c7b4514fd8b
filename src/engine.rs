use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::catalog::ColumnCatalog;
use crate::cell::{Dataset, Row};
use crate::domain::TVError;
use crate::filter::FilterState;
use crate::pagination::PaginationState;

/// Rows of the dataset that passed the filters, in their original order.
///
/// Holds positions into the shared dataset rather than copies of the rows.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Dataset,
    rows: Arc<Vec<usize>>,
}

impl FilteredView {
    /// A view showing every row.
    pub fn identity(dataset: Dataset) -> Self {
        let rows = Arc::new((0..dataset.len()).collect());
        Self { dataset, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn total_rows(&self) -> usize {
        self.dataset.len()
    }

    /// Dataset positions of the filtered rows.
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn get(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx).map(|&ridx| &self.dataset[ridx])
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().map(|&ridx| &self.dataset[ridx])
    }

    /// The rows of the current page.
    pub fn page<'a>(&'a self, pagination: &PaginationState) -> impl Iterator<Item = &'a Row> {
        pagination
            .window(self.rows.as_slice())
            .iter()
            .map(|&ridx| &self.dataset[ridx])
    }
}

/// Produces the filtered view from the full dataset.
///
/// Every apply re-scans the whole dataset, so clearing or loosening a filter
/// brings back rows an earlier filter removed.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    catalog: Arc<ColumnCatalog>,
    view: FilteredView,
}

impl FilterEngine {
    pub fn new(catalog: Arc<ColumnCatalog>) -> Self {
        let view = FilteredView::identity(Arc::clone(catalog.rows()));
        Self { catalog, view }
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Recomputes the filtered rows and moves the pagination back to the first page.
    ///
    /// On error (an active column the catalog does not know) the previous view and
    /// the pagination are left untouched.
    pub fn apply(
        &mut self,
        filter: &FilterState,
        pagination: &mut PaginationState,
    ) -> Result<&FilteredView, TVError> {
        let start_time = Instant::now();
        let predicate = filter.predicate(&self.catalog)?;

        let dataset = self.catalog.rows();
        let matches: Vec<usize> = dataset
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(idx, _)| idx)
            .collect();

        info!(
            "Filter on {} columns kept {}/{} rows in {}ms",
            filter.active_columns().len(),
            matches.len(),
            dataset.len(),
            start_time.elapsed().as_millis()
        );

        self.view = FilteredView {
            dataset: Arc::clone(dataset),
            rows: Arc::new(matches),
        };
        pagination.reset(self.view.row_count());
        Ok(&self.view)
    }
}
