use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace, warn};

use crate::catalog::ColumnCatalog;
use crate::cell::{Cell, Row};
use crate::domain::{CMDMode, HELP_TEXT, Message, TVConfig, TVError, TableProps};
use crate::engine::{FilterEngine, FilteredView};
use crate::filter::FilterState;
use crate::inputter::{InputResult, Inputter};
use crate::pagination::{PageSize, PaginationState};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    DISTINCT,
    CMDINPUT,
}

#[derive(Debug)]
struct DistinctView {
    column: String,
    values: Vec<Cell>,
    cursor: usize,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct UIData {
    pub name: String,
    pub columns: Vec<String>,
    /// Visible part of the current page, already turned into display strings.
    pub rows: Vec<Vec<String>>,
    /// Dataset row numbers (1 based) of `rows`.
    pub row_numbers: Vec<usize>,
    pub selected_column: Option<usize>,
    pub filters: Vec<(String, String)>,
    pub pending_filter: bool,
    pub row_count: usize,
    pub total_rows: usize,
    pub page_position: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub pagination_enabled: bool,
    pub summary: String,
    pub page_label: String,
    pub search_enabled: bool,
    pub searchable_description: String,
    pub download_url: String,
    pub persist_search: bool,
    pub show_popup: bool,
    pub popup_title: String,
    pub popup_lines: Vec<String>,
    pub popup_cursor: Option<usize>,
    pub cmdinput: InputResult,
    pub cmd_mode: Option<CMDMode>,
    pub active_cmdinput: bool,
    pub status_message: String,
    pub last_update: Instant,
}

/// A table session: the immutable data plus the filter and page state over it.
///
/// Host code can call the operations directly; the terminal viewer goes through
/// [`Model::update`], which turns errors into status messages.
pub struct Model {
    config: TVConfig,
    props: TableProps,
    name: String,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    engine: FilterEngine,
    filter: FilterState,
    pagination: PaginationState,
    selected_column: Option<usize>,
    row_offset: usize,
    viewport_height: usize,
    distinct: Option<DistinctView>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    pending_filter: bool,
    status_message: String,
    uidata: UIData,
}

impl Model {
    pub fn new(
        catalog: ColumnCatalog,
        props: TableProps,
        config: &TVConfig,
        name: impl Into<String>,
    ) -> Self {
        let total_rows = catalog.total_rows();
        let selected_column = (!catalog.columns().is_empty()).then_some(0);
        let mut model = Self {
            config: config.clone(),
            props,
            name: name.into(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            engine: FilterEngine::new(Arc::new(catalog)),
            filter: FilterState::new(),
            pagination: PaginationState::new(total_rows, config.default_max_rows),
            selected_column,
            row_offset: 0,
            viewport_height: usize::MAX,
            distinct: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            pending_filter: false,
            status_message: format!("Loaded {total_rows} rows"),
            uidata: UIData::empty(),
        };
        model.refresh_uidata();
        model
    }

    // -------------------- Engine operations ---------------------- //

    pub fn catalog(&self) -> &ColumnCatalog {
        self.engine.catalog()
    }

    pub fn props(&self) -> &TableProps {
        &self.props
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn filtered_view(&self) -> &FilteredView {
        self.engine.view()
    }

    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> {
        self.engine.view().rows()
    }

    pub fn page_rows(&self) -> impl Iterator<Item = &Row> {
        self.engine.view().page(&self.pagination)
    }

    pub fn row_count(&self) -> usize {
        self.engine.view().row_count()
    }

    pub fn total_rows(&self) -> usize {
        self.engine.view().total_rows()
    }

    pub fn page_position(&self) -> usize {
        self.pagination.page_position()
    }

    pub fn max_rows(&self) -> usize {
        self.pagination.max_rows()
    }

    pub fn active_columns(&self) -> &[String] {
        self.filter.active_columns()
    }

    pub fn values(&self) -> &HashMap<String, String> {
        self.filter.values()
    }

    /// Whether pagination controls are offered for this table at all.
    pub fn pagination_enabled(&self) -> bool {
        self.total_rows() > self.config.pagination_threshold
    }

    pub fn distinct_values(&self, column: &str) -> Result<Vec<Cell>, TVError> {
        self.catalog().distinct_values(column)
    }

    pub fn add_column(&mut self, name: &str) -> Result<(), TVError> {
        if !self.catalog().contains(name) {
            return Err(TVError::UnknownColumn(name.to_string()));
        }
        if !self.filter.is_active(name) {
            self.filter.add_column(name);
            self.pending_filter = true;
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) {
        if self.filter.is_active(name) {
            self.filter.remove_column(name);
            self.pending_filter = true;
        }
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), TVError> {
        self.filter.set_value(name, value)?;
        self.pending_filter = true;
        Ok(())
    }

    /// Re-runs the filters over the full dataset and returns to the first page.
    pub fn apply_filters(&mut self) -> Result<&FilteredView, TVError> {
        self.engine.apply(&self.filter, &mut self.pagination)?;
        self.pending_filter = false;
        self.row_offset = 0;
        Ok(self.engine.view())
    }

    pub fn set_max_rows(&mut self, n: i64) -> Result<(), TVError> {
        self.pagination.set_max_rows(n)?;
        self.row_offset = 0;
        Ok(())
    }

    pub fn select_page_size(&mut self, selection: &str) -> Result<(), TVError> {
        self.pagination.select_page_size(selection)?;
        self.row_offset = 0;
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.pagination.next();
        self.row_offset = 0;
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
        self.row_offset = 0;
    }

    /// Hands control to the host's refresh callback. Nothing waits for it.
    pub fn refresh_query(&mut self) -> bool {
        match self.props.refresh_query.as_mut() {
            Some(callback) => {
                info!("Refreshing query ...");
                callback();
                true
            }
            None => false,
        }
    }

    // -------------------- Message handling ---------------------- //

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TVError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        let result = match self.modus {
            Modus::TABLE => self.handle_table_message(msg),
            Modus::DISTINCT => self.handle_distinct_message(msg),
            Modus::POPUP => {
                match msg {
                    Message::Quit => self.quit(),
                    Message::Exit | Message::Enter | Message::Help => self.close_popup(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                }
                Ok(())
            }
            Modus::CMDINPUT => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::Resize(width, height) => {
                    self.ui_resize(width, height);
                    Ok(())
                }
                _ => Ok(()),
            },
        };

        if let Err(e) = result {
            warn!("{e}");
            self.set_status_message(format!("Error: {e}"));
        }
        self.refresh_uidata();
        Ok(())
    }

    fn handle_table_message(&mut self, msg: Message) -> Result<(), TVError> {
        match msg {
            Message::Quit => self.quit(),
            Message::Help => self.show_help(),
            Message::Enter => return self.apply_and_report(),
            Message::ApplyFilter => return self.search(),
            Message::NextPage
            | Message::PreviousPage
            | Message::FirstPage
            | Message::LastPage
            | Message::CyclePageSize
            | Message::EnterPageSize
                if !self.pagination_enabled() =>
            {
                self.set_status_message(format!(
                    "All {} rows fit on one page",
                    self.total_rows()
                ));
            }
            Message::NextPage => self.next_page(),
            Message::PreviousPage => self.previous_page(),
            Message::FirstPage => self.goto_page(false),
            Message::LastPage => self.goto_page(true),
            Message::MoveUp => self.scroll(-1),
            Message::MoveDown => self.scroll(1),
            Message::SelectNextColumn => self.select_column(1),
            Message::SelectPreviousColumn => self.select_column(-1),
            Message::ToggleFilterColumn => return self.toggle_selected_column(),
            Message::EditFilterValue => self.edit_filter_value(),
            Message::ClearFilterValue => return self.clear_filter_value(),
            Message::CyclePageSize => self.cycle_page_size(),
            Message::EnterPageSize => self.enter_cmd_mode(CMDMode::PageSize, ""),
            Message::DistinctValues => return self.show_distinct_values(),
            Message::RefreshQuery => self.request_refresh(),
            Message::Resize(width, height) => self.ui_resize(width, height),
            _ => (),
        }
        Ok(())
    }

    fn handle_distinct_message(&mut self, msg: Message) -> Result<(), TVError> {
        match msg {
            Message::Quit => self.quit(),
            Message::MoveUp => self.move_distinct_cursor(-1),
            Message::MoveDown => self.move_distinct_cursor(1),
            Message::Enter => return self.pick_distinct_value(),
            Message::Exit => self.close_popup(),
            Message::Resize(width, height) => self.ui_resize(width, height),
            _ => (),
        }
        Ok(())
    }

    fn selected_column_name(&self) -> Option<String> {
        self.selected_column
            .and_then(|idx| self.catalog().columns().get(idx))
            .map(|c| c.name.clone())
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn apply_and_report(&mut self) -> Result<(), TVError> {
        let rows = self.apply_filters()?.row_count();
        let total = self.total_rows();
        self.set_status_message(format!("Filter matched {rows} of {total} rows"));
        Ok(())
    }

    /// The query row search action. Only offered on searchable tables.
    fn search(&mut self) -> Result<(), TVError> {
        if !self.props.searchable {
            self.set_status_message("Search is not enabled for this table");
            return Ok(());
        }
        self.apply_and_report()
    }

    fn goto_page(&mut self, last: bool) {
        if last {
            self.pagination.last();
        } else {
            self.pagination.first();
        }
        self.row_offset = 0;
    }

    fn scroll(&mut self, step: isize) {
        let page_len = self.pagination.window(self.filtered_view().indices()).len();
        let max_offset = page_len.saturating_sub(self.viewport_height.min(page_len));
        self.row_offset = self.row_offset.saturating_add_signed(step).min(max_offset);
    }

    fn select_column(&mut self, step: isize) {
        let ncols = self.catalog().columns().len();
        if ncols == 0 {
            return;
        }
        let current = self.selected_column.unwrap_or(0) as isize;
        self.selected_column = Some((current + step).rem_euclid(ncols as isize) as usize);
    }

    fn toggle_selected_column(&mut self) -> Result<(), TVError> {
        let Some(name) = self.selected_column_name() else {
            return Ok(());
        };
        if self.filter.is_active(&name) {
            self.remove_column(&name);
            self.set_status_message(format!("Removed filter on \"{name}\""));
        } else {
            self.add_column(&name)?;
            self.set_status_message(format!("Filtering on \"{name}\""));
        }
        Ok(())
    }

    fn edit_filter_value(&mut self) {
        let Some(name) = self.selected_column_name() else {
            return;
        };
        let current = self.filter.value(&name).unwrap_or_default().to_string();
        self.enter_cmd_mode(CMDMode::FilterValue, &current);
    }

    fn clear_filter_value(&mut self) -> Result<(), TVError> {
        let Some(name) = self.selected_column_name() else {
            return Ok(());
        };
        if self.filter.is_active(&name) {
            self.set_value(&name, "")?;
        }
        Ok(())
    }

    fn cycle_page_size(&mut self) {
        let options = self.config.page_size_options.clone();
        self.pagination.cycle_page_size(&options);
        self.row_offset = 0;
        self.set_status_message(format!(
            "Rows to display: {}",
            self.pagination.selected_page_size()
        ));
    }

    fn request_refresh(&mut self) {
        if self.refresh_query() {
            self.set_status_message("Refresh requested");
        } else {
            self.set_status_message("No refresh available");
        }
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{width}, h:{height}");
        // Title, filter bar, header, footer and status line.
        self.viewport_height = height.saturating_sub(7).max(1);
        self.row_offset = 0;
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.distinct = None;
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::POPUP;
    }

    fn show_distinct_values(&mut self) -> Result<(), TVError> {
        let Some(column) = self.selected_column_name() else {
            return Ok(());
        };
        let values = self.distinct_values(&column)?;
        debug!("{} distinct values for \"{}\"", values.len(), column);
        self.distinct = Some(DistinctView {
            column,
            values,
            cursor: 0,
        });
        self.previous_modus = self.modus;
        self.modus = Modus::DISTINCT;
        Ok(())
    }

    fn move_distinct_cursor(&mut self, step: isize) {
        if let Some(view) = self.distinct.as_mut() {
            let last = view.values.len().saturating_sub(1);
            view.cursor = view.cursor.saturating_add_signed(step).min(last);
        }
    }

    fn pick_distinct_value(&mut self) -> Result<(), TVError> {
        let Some(view) = self.distinct.take() else {
            return Ok(());
        };
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::DISTINCT;
        let Some(value) = view.values.get(view.cursor).and_then(|c| c.display_text()) else {
            return Ok(());
        };
        self.add_column(&view.column)?;
        self.set_value(&view.column, value.into_owned())?;
        self.apply_and_report()
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode, prefill: &str) {
        trace!("Entering command mode {mode:?} ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.input.set(prefill);
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) -> Result<(), TVError> {
        self.last_input = self.input.read(key);
        if self.last_input.finished {
            return self.handle_cmd_input();
        }
        Ok(())
    }

    fn handle_cmd_input(&mut self) -> Result<(), TVError> {
        trace!("Handle cmd input {}", self.last_input.input);
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;
        let mode = self.cmd_mode.take();
        let input = std::mem::take(&mut self.last_input);
        self.input.clear();

        if input.canceled {
            return Ok(());
        }
        match mode {
            Some(CMDMode::FilterValue) => {
                if let Some(name) = self.selected_column_name() {
                    // Committing a value is the explicit step that activates a column.
                    self.add_column(&name)?;
                    self.set_value(&name, input.input)?;
                    self.set_status_message("Press Enter to apply the filter");
                }
            }
            Some(CMDMode::PageSize) => {
                self.select_page_size(&input.input)?;
                self.set_status_message(format!(
                    "Rows to display: {}",
                    self.pagination.selected_page_size()
                ));
            }
            None => info!("Cmd mode is none!"),
        }
        Ok(())
    }

    // -------------------- UI projection ---------------------- //

    fn refresh_uidata(&mut self) {
        let view = self.engine.view();
        let page = self.pagination.window(view.indices());
        let visible = page
            .iter()
            .skip(self.row_offset)
            .take(self.viewport_height)
            .copied()
            .collect::<Vec<usize>>();
        let dataset = self.catalog().rows();
        let rows = visible
            .iter()
            .map(|&ridx| dataset[ridx].iter().map(display_cell).collect())
            .collect();

        let filters = self
            .filter
            .active_columns()
            .iter()
            .map(|c| (c.clone(), self.filter.value(c).unwrap_or_default().to_string()))
            .collect();

        let (show_popup, popup_title, popup_lines, popup_cursor) = match self.modus {
            Modus::POPUP => (
                true,
                "Help".to_string(),
                HELP_TEXT.lines().map(str::to_string).collect(),
                None,
            ),
            Modus::DISTINCT => match &self.distinct {
                Some(d) => (
                    true,
                    format!("Distinct values of \"{}\"", d.column),
                    d.values.iter().map(display_cell).collect(),
                    Some(d.cursor),
                ),
                None => (false, String::new(), Vec::new(), None),
            },
            _ => (false, String::new(), Vec::new(), None),
        };

        self.uidata = UIData {
            name: self.name.clone(),
            columns: self.catalog().column_names().map(str::to_string).collect(),
            rows,
            row_numbers: visible.iter().map(|idx| idx + 1).collect(),
            selected_column: self.selected_column,
            filters,
            pending_filter: self.pending_filter,
            row_count: view.row_count(),
            total_rows: view.total_rows(),
            page_position: self.pagination.page_position(),
            page_count: self.pagination.page_count(),
            page_size: self.pagination.selected_page_size(),
            pagination_enabled: self.pagination_enabled(),
            summary: self.pagination.summary(),
            page_label: self.pagination.page_label(),
            search_enabled: self.props.searchable,
            searchable_description: self.props.searchable_description.clone(),
            download_url: self.props.download_url.clone(),
            persist_search: self.props.persist_search,
            show_popup,
            popup_title,
            popup_lines,
            popup_cursor,
            cmdinput: self.last_input.clone(),
            cmd_mode: self.cmd_mode,
            active_cmdinput: self.modus == Modus::CMDINPUT,
            status_message: self.status_message.clone(),
            last_update: Instant::now(),
        };
    }
}

fn display_cell(cell: &Cell) -> String {
    cell.to_string().replace("\r\n", " ↵ ").replace('\n', " ↵ ")
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            row_numbers: Vec::new(),
            selected_column: None,
            filters: Vec::new(),
            pending_filter: false,
            row_count: 0,
            total_rows: 0,
            page_position: 0,
            page_count: 0,
            page_size: PageSize::All,
            pagination_enabled: false,
            summary: String::new(),
            page_label: String::new(),
            search_enabled: false,
            searchable_description: String::new(),
            download_url: String::new(),
            persist_search: false,
            show_popup: false,
            popup_title: String::new(),
            popup_lines: Vec::new(),
            popup_cursor: None,
            cmdinput: InputResult::default(),
            cmd_mode: None,
            active_cmdinput: false,
            status_message: String::new(),
            last_update: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Column;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::Cell as Counter;
    use std::rc::Rc;

    fn model() -> Model {
        let catalog = ColumnCatalog::new(
            vec![Column::new("x"), Column::new("y")],
            vec![
                vec![Cell::from("a"), Cell::from(1)],
                vec![Cell::from("b"), Cell::from(2)],
                vec![Cell::Null, Cell::from(3)],
            ],
        );
        Model::new(catalog, TableProps::default(), &TVConfig::default(), "test")
    }

    fn numbered_model(rows: i64, props: TableProps) -> Model {
        let data = (0..rows).map(|i| vec![Cell::from(i)]).collect();
        let catalog = ColumnCatalog::new(vec![Column::new("n")], data);
        Model::new(catalog, props, &TVConfig::default(), "numbers")
    }

    fn send(model: &mut Model, message: Message) {
        model.update(Some(message)).unwrap();
    }

    fn type_keys(model: &mut Model, s: &str) {
        for chr in s.chars() {
            send(model, Message::RawKey(KeyEvent::new(KeyCode::Char(chr), KeyModifiers::NONE)));
        }
        send(model, Message::RawKey(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn filters_apply_only_on_request() {
        let mut m = model();
        m.add_column("x").unwrap();
        m.set_value("x", "a").unwrap();
        assert_eq!(m.row_count(), 3);
        assert!(m.get_uidata().rows.len() == 3);

        m.apply_filters().unwrap();
        assert_eq!(m.row_count(), 1);
    }

    #[test]
    fn add_column_checks_the_catalog() {
        let mut m = model();
        assert!(matches!(m.add_column("z"), Err(TVError::UnknownColumn(_))));
        assert!(m.active_columns().is_empty());
    }

    #[test]
    fn edit_value_through_messages() {
        let mut m = model();
        send(&mut m, Message::EditFilterValue);
        assert!(m.raw_keyevents());
        type_keys(&mut m, "B");
        assert!(!m.raw_keyevents());
        assert_eq!(m.filter().value("x"), Some("B"));
        assert!(m.get_uidata().pending_filter);

        send(&mut m, Message::Enter);
        let ui = m.get_uidata();
        assert_eq!(ui.row_count, 1);
        assert_eq!(ui.rows, vec![vec!["b".to_string(), "2".to_string()]]);
        assert_eq!(ui.row_numbers, vec![2]);
        assert!(!ui.pending_filter);
    }

    #[test]
    fn errors_become_status_messages() {
        let mut m = numbered_model(600, TableProps::default());
        send(&mut m, Message::EnterPageSize);
        type_keys(&mut m, "zero");
        assert!(m.get_uidata().status_message.contains("invalid page size"));
        assert_eq!(m.max_rows(), 500);
    }

    #[test]
    fn cancelled_edit_leaves_the_filter_alone() {
        let mut m = model();
        send(&mut m, Message::EditFilterValue);
        send(&mut m, Message::RawKey(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)));
        send(&mut m, Message::RawKey(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!m.raw_keyevents());
        assert!(m.active_columns().is_empty());
        assert!(!m.get_uidata().pending_filter);
    }

    #[test]
    fn search_action_requires_a_searchable_table() {
        let mut m = model();
        m.add_column("x").unwrap();
        m.set_value("x", "a").unwrap();
        send(&mut m, Message::ApplyFilter);
        assert_eq!(m.row_count(), 3);
        assert!(m.get_uidata().pending_filter);

        send(&mut m, Message::Enter);
        assert_eq!(m.row_count(), 1);

        let mut m = numbered_model(20, TableProps::default().with_searchable(true));
        m.add_column("n").unwrap();
        m.set_value("n", "1").unwrap();
        send(&mut m, Message::ApplyFilter);
        assert_eq!(m.row_count(), 11);
    }

    #[test]
    fn small_tables_stay_on_one_page() {
        let mut m = numbered_model(120, TableProps::default());
        send(&mut m, Message::CyclePageSize);
        send(&mut m, Message::NextPage);
        send(&mut m, Message::EnterPageSize);
        assert!(!m.raw_keyevents());

        let ui = m.get_uidata();
        assert!(!ui.pagination_enabled);
        assert_eq!(ui.page_position, 0);
        assert_eq!(ui.page_count, 1);
        assert_eq!(m.max_rows(), 120);
        assert_eq!(ui.summary, "Displaying 120 of 120 rows");
    }

    #[test]
    fn distinct_value_pick_filters_the_table() {
        let mut m = model();
        send(&mut m, Message::DistinctValues);
        assert_eq!(m.get_uidata().popup_lines, vec!["a".to_string(), "b".to_string()]);
        send(&mut m, Message::MoveDown);
        send(&mut m, Message::MoveDown);
        send(&mut m, Message::Enter);
        assert_eq!(m.filter().value("x"), Some("b"));
        assert_eq!(m.row_count(), 1);
        assert!(!m.get_uidata().show_popup);
    }

    #[test]
    fn toggle_adds_and_removes_the_selected_column() {
        let mut m = model();
        send(&mut m, Message::SelectNextColumn);
        send(&mut m, Message::ToggleFilterColumn);
        assert_eq!(m.active_columns(), ["y".to_string()]);
        send(&mut m, Message::ToggleFilterColumn);
        assert!(m.active_columns().is_empty());
        send(&mut m, Message::SelectNextColumn);
        assert_eq!(m.get_uidata().selected_column, Some(0));
    }

    #[test]
    fn refresh_calls_the_host_callback() {
        let calls = Rc::new(Counter::new(0));
        let counter = Rc::clone(&calls);
        let props = TableProps::default()
            .with_searchable(true)
            .with_refresh_query(move || counter.set(counter.get() + 1));
        let catalog = ColumnCatalog::new(vec![Column::new("x")], vec![vec![Cell::from("a")]]);
        let mut m = Model::new(catalog, props, &TVConfig::default(), "t");

        send(&mut m, Message::RefreshQuery);
        assert_eq!(calls.get(), 1);
        assert!(m.get_uidata().search_enabled);
    }

    #[test]
    fn pagination_is_only_enabled_for_large_tables() {
        let m = model();
        assert!(!m.pagination_enabled());

        let rows = (0i64..501).map(|i| vec![Cell::from(i)]).collect();
        let big = ColumnCatalog::new(vec![Column::new("n")], rows);
        let m = Model::new(big, TableProps::default(), &TVConfig::default(), "big");
        assert!(m.pagination_enabled());
        assert_eq!(m.max_rows(), 500);
        assert_eq!(m.pagination().page_count(), 2);
    }
}
