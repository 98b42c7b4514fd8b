use std::fmt;

use tracing::{debug, trace};

use crate::domain::{ALL_ROWS_OPTION, TVError};

/// Number of pages needed for `row_count` rows. Zero rows means zero pages.
pub fn page_count(row_count: usize, max_rows: usize) -> usize {
    if row_count == 0 {
        0
    } else {
        row_count.div_ceil(max_rows.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Rows(usize),
    All,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Rows(n) => write!(f, "{n}"),
            PageSize::All => f.write_str(ALL_ROWS_OPTION),
        }
    }
}

/// Page window over the filtered rows.
///
/// `max_rows` stays within `1..=total_rows` (at least 1 for an empty table) and
/// `page_position` always points at an existing page, or 0 when there are no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    page_position: usize,
    max_rows: usize,
    total_rows: usize,
    row_count: usize,
}

impl PaginationState {
    pub fn new(total_rows: usize, default_max_rows: usize) -> Self {
        Self {
            page_position: 0,
            max_rows: default_max_rows.min(total_rows).max(1),
            total_rows,
            row_count: total_rows,
        }
    }

    pub fn page_position(&self) -> usize {
        self.page_position
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn page_count(&self) -> usize {
        page_count(self.row_count, self.max_rows)
    }

    /// Called whenever the filtered row set was recomputed. The old page index
    /// means nothing for the new rows, so it goes back to the first page.
    pub fn reset(&mut self, row_count: usize) {
        trace!("Reset pagination for {row_count} rows");
        self.row_count = row_count;
        self.page_position = 0;
    }

    pub fn set_max_rows(&mut self, n: i64) -> Result<(), TVError> {
        if n <= 0 {
            return Err(TVError::InvalidPageSize(n.to_string()));
        }
        let upper = self.total_rows.max(1);
        self.max_rows = usize::try_from(n).map_or(upper, |n| n.min(upper));
        self.page_position = 0;
        debug!("Page size set to {} (requested {n})", self.max_rows);
        Ok(())
    }

    /// Applies a page size option as shown to the user: a number or `All`.
    pub fn select_page_size(&mut self, selection: &str) -> Result<(), TVError> {
        let selection = selection.trim();
        if selection.eq_ignore_ascii_case(ALL_ROWS_OPTION) {
            return self.set_max_rows(self.total_rows.max(1) as i64);
        }
        let n = selection
            .parse::<i64>()
            .map_err(|_| TVError::InvalidPageSize(selection.to_string()))?;
        self.set_max_rows(n)
    }

    pub fn selected_page_size(&self) -> PageSize {
        if self.max_rows == self.total_rows {
            PageSize::All
        } else {
            PageSize::Rows(self.max_rows)
        }
    }

    /// Moves to the option after the current page size, wrapping from `All` back
    /// to the smallest option.
    pub fn cycle_page_size(&mut self, options: &[usize]) {
        let next = match self.selected_page_size() {
            PageSize::All => options.first().copied(),
            PageSize::Rows(current) => options.iter().copied().find(|&o| o > current),
        };
        let result = match next {
            Some(n) => self.set_max_rows(n as i64),
            None => self.select_page_size(ALL_ROWS_OPTION),
        };
        if let Err(e) = result {
            debug!("Ignoring page size option: {e}");
        }
    }

    pub fn is_last_page(&self) -> bool {
        self.page_position + 1 >= self.page_count()
    }

    pub fn next(&mut self) {
        if self.page_count() == 0 || self.is_last_page() {
            return;
        }
        self.page_position += 1;
    }

    pub fn previous(&mut self) {
        self.page_position = self.page_position.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.page_position = 0;
    }

    pub fn last(&mut self) {
        self.page_position = self.page_count().saturating_sub(1);
    }

    pub fn window<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let begin = (self.page_position * self.max_rows).min(rows.len());
        let end = ((self.page_position + 1) * self.max_rows).min(rows.len());
        &rows[begin..end]
    }

    pub fn summary(&self) -> String {
        format!(
            "Displaying {} of {} rows",
            self.max_rows.min(self.row_count),
            self.total_rows
        )
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_position + 1, self.page_count())
    }
}
