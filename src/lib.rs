//! Column filtering and pagination over an in-memory table.
//!
//! A [`ColumnCatalog`] holds the columns and rows, a [`FilterState`] tracks which
//! columns filter the table and with what text, the [`FilterEngine`] turns both into
//! a [`FilteredView`], and a [`PaginationState`] keeps a valid page window over it.
//! [`Model`] bundles them into a session that a renderer (the `tabview` binary, or
//! any other host) drives.
//!
//! ```
//! use tabview::{Cell, Column, ColumnCatalog, FilterEngine, FilterState, PaginationState};
//! use std::sync::Arc;
//!
//! let catalog = ColumnCatalog::new(
//!     vec![Column::new("x"), Column::new("y")],
//!     vec![
//!         vec![Cell::from("a"), Cell::from(1)],
//!         vec![Cell::from("b"), Cell::from(2)],
//!         vec![Cell::Null, Cell::from(3)],
//!     ],
//! );
//! let mut pagination = PaginationState::new(catalog.total_rows(), 500);
//! let mut engine = FilterEngine::new(Arc::new(catalog));
//!
//! let mut filter = FilterState::new();
//! filter.add_column("x");
//! filter.set_value("x", "a").unwrap();
//! let view = engine.apply(&filter, &mut pagination).unwrap();
//! assert_eq!(view.row_count(), 1);
//! ```

pub mod catalog;
pub mod cell;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod inputter;
pub mod loader;
pub mod model;
pub mod pagination;
pub mod ui;

pub use catalog::ColumnCatalog;
pub use cell::{Cell, Column, Dataset, Row};
pub use domain::{Message, TVConfig, TVError, TableProps};
pub use engine::{FilterEngine, FilteredView};
pub use filter::{FilterState, RowPredicate};
pub use model::{Model, Status, UIData};
pub use pagination::{PageSize, PaginationState, page_count};
