use std::sync::Arc;

use proptest::prelude::*;
use tabview::{
    Cell, Column, ColumnCatalog, FilterEngine, FilterState, PaginationState, Row, page_count,
};

const COLUMNS: [&str; 3] = ["a", "b", "c"];

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Null),
        "[xyXY]{0,3}".prop_map(Cell::from),
        (0i64..20).prop_map(Cell::from),
        "[xy]{1,2}".prop_map(|t| Cell::structured(t).with_attr("k", "v")),
    ]
}

fn dataset() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(prop::collection::vec(cell(), COLUMNS.len()), 0..40)
}

fn filters() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0..COLUMNS.len(), "[xyXY1]{0,2}"), 0..4)
}

fn setup(rows: Vec<Row>) -> (FilterEngine, PaginationState) {
    let columns = COLUMNS.iter().map(|&c| Column::new(c)).collect();
    let catalog = ColumnCatalog::new(columns, rows);
    let pagination = PaginationState::new(catalog.total_rows(), 7);
    (FilterEngine::new(Arc::new(catalog)), pagination)
}

fn state_from(filters: &[(usize, String)]) -> FilterState {
    let mut state = FilterState::new();
    for (cidx, value) in filters {
        state.add_column(COLUMNS[*cidx]);
        state.set_value(COLUMNS[*cidx], value.as_str()).unwrap();
    }
    state
}

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Last,
    SetMaxRows(i64),
    Apply(Vec<(usize, String)>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Last),
        (-2i64..60).prop_map(Op::SetMaxRows),
        filters().prop_map(Op::Apply),
    ]
}

proptest! {
    #[test]
    fn filtered_rows_are_an_ordered_subsequence(rows in dataset(), f in filters()) {
        let (mut engine, mut pagination) = setup(rows.clone());
        let view = engine.apply(&state_from(&f), &mut pagination).unwrap();

        prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        for (ridx, row) in view.indices().iter().zip(view.rows()) {
            prop_assert_eq!(&rows[*ridx], row);
        }
    }

    #[test]
    fn clearing_a_value_never_removes_rows(rows in dataset(), f in filters(), pick in 0usize..4) {
        prop_assume!(!f.is_empty());
        let (mut engine, mut pagination) = setup(rows);
        let mut state = state_from(&f);
        let narrow = engine.apply(&state, &mut pagination).unwrap().row_count();

        let column = state.active_columns()[pick % state.active_columns().len()].clone();
        state.set_value(&column, "").unwrap();
        let wide = engine.apply(&state, &mut pagination).unwrap().row_count();
        prop_assert!(wide >= narrow);
    }

    #[test]
    fn null_cells_never_pass_an_active_filter(rows in dataset(), f in filters()) {
        let (mut engine, mut pagination) = setup(rows);
        let state = state_from(&f);
        let view = engine.apply(&state, &mut pagination).unwrap();

        for row in view.rows() {
            for name in state.active_columns() {
                let cidx = COLUMNS.iter().position(|c| c == name).unwrap();
                prop_assert!(!row[cidx].is_null());
            }
        }
    }

    #[test]
    fn no_filter_keeps_every_row(rows in dataset()) {
        let (mut engine, mut pagination) = setup(rows.clone());
        let view = engine.apply(&FilterState::new(), &mut pagination).unwrap();
        let kept: Vec<Row> = view.rows().cloned().collect();
        prop_assert_eq!(kept, rows);
    }

    #[test]
    fn page_position_stays_in_bounds(rows in dataset(), ops in prop::collection::vec(op(), 0..30)) {
        let (mut engine, mut pagination) = setup(rows);
        for op in ops {
            match op {
                Op::Next => pagination.next(),
                Op::Previous => pagination.previous(),
                Op::Last => pagination.last(),
                Op::SetMaxRows(n) => {
                    let before = pagination.clone();
                    match pagination.set_max_rows(n) {
                        Ok(()) => {
                            prop_assert_eq!(pagination.page_position(), 0);
                        }
                        Err(_) => {
                            prop_assert_eq!(&pagination, &before);
                        }
                    }
                }
                Op::Apply(f) => {
                    engine.apply(&state_from(&f), &mut pagination).unwrap();
                    prop_assert_eq!(pagination.page_position(), 0);
                }
            }
            let pages = page_count(pagination.row_count(), pagination.max_rows());
            prop_assert!(pagination.page_position() < pages.max(1));
            prop_assert!(pagination.max_rows() >= 1);
            prop_assert!(pagination.max_rows() <= pagination.total_rows().max(1));
        }
    }

    #[test]
    fn distinct_values_are_unique_and_non_null(rows in dataset(), cidx in 0..COLUMNS.len()) {
        let (engine, _) = setup(rows.clone());
        let values = engine.catalog().distinct_values(COLUMNS[cidx]).unwrap();

        prop_assert!(values.iter().all(|v| !v.is_null()));
        for (i, v) in values.iter().enumerate() {
            prop_assert!(!values[..i].contains(v));
        }
        for row in &rows {
            prop_assert!(row[cidx].is_null() || values.contains(&row[cidx]));
        }
    }
}
