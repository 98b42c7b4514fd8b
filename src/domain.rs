use std::fmt;
use std::io;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TVError {
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),
    #[error("column \"{0}\" is not an active filter")]
    InactiveColumn(String),
    #[error("invalid page size \"{0}\"")]
    InvalidPageSize(String),

    #[error("{0}")]
    IoError(#[from] io::Error),
    #[error("{0}")]
    PolarsError(#[from] PolarsError),
    #[error("loading failed: {0}")]
    LoadingFailed(String),
    #[error("file not found")]
    FileNotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("unknown file type \"{0}\"")]
    UnknownFileType(String),
}

pub const ALL_ROWS_OPTION: &str = "All";

#[derive(Debug, Clone, Setters)]
pub struct TVConfig {
    pub event_poll_time: u64,
    /// Page size used when a table is opened. Capped by the number of rows.
    pub default_max_rows: usize,
    /// Pagination controls are only offered above this many rows.
    pub pagination_threshold: usize,
    pub page_size_options: Vec<usize>,
    pub max_column_width: usize,
}

impl Default for TVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            default_max_rows: 500,
            pagination_threshold: 500,
            page_size_options: vec![10, 20, 50],
            max_column_width: 30,
        }
    }
}

pub type RefreshQuery = Box<dyn FnMut()>;

/// Host supplied options for a table session. Apart from `searchable` these are
/// handed to the renderer as they are.
#[derive(Default, Setters)]
#[setters(prefix = "with_")]
pub struct TableProps {
    pub searchable: bool,
    pub persist_search: bool,
    #[setters(into)]
    pub searchable_description: String,
    #[setters(into)]
    pub download_url: String,
    #[setters(skip)]
    pub refresh_query: Option<RefreshQuery>,
}

impl TableProps {
    pub fn with_refresh_query(mut self, callback: impl FnMut() + 'static) -> Self {
        self.refresh_query = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for TableProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableProps")
            .field("searchable", &self.searchable)
            .field("persist_search", &self.persist_search)
            .field("searchable_description", &self.searchable_description)
            .field("download_url", &self.download_url)
            .field("refresh_query", &self.refresh_query.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CMDMode {
    FilterValue,
    PageSize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    Enter,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    MoveUp,
    MoveDown,
    SelectNextColumn,
    SelectPreviousColumn,
    ToggleFilterColumn,
    EditFilterValue,
    ClearFilterValue,
    ApplyFilter,
    CyclePageSize,
    EnterPageSize,
    DistinctValues,
    RefreshQuery,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  n / →        next page
  p / ←        previous page
  g / G        first / last page
  j / ↓        scroll down
  k / ↑        scroll up
  Tab / S-Tab  select next / previous column

Filtering
  a            add or remove the selected column as a filter
  /            edit the filter value of the selected column
  x            clear the filter value of the selected column
  Enter        apply filters
  f            search (searchable tables only)
  h            browse distinct values of the selected column

Page size
  s            cycle page size
  S            type a page size (number or All)

Other
  r            refresh query
  ?            help
  Esc          close popup / cancel input
  q            quit";
