use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListState, Paragraph, Row, Table},
};

use crate::domain::{CMDMode, TVConfig};
use crate::model::UIData;

pub const COLUMN_WIDTH_MARGIN: usize = 1;
const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 24;

pub struct TableUI {
    max_column_width: usize,
}

impl TableUI {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            max_column_width: cfg.max_column_width,
        }
    }

    pub fn draw(&mut self, uidata: &UIData, frame: &mut Frame) {
        let [title_area, filter_area, table_area, footer_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Self::title(uidata), title_area);
        frame.render_widget(Self::filter_bar(uidata), filter_area);
        frame.render_widget(self.table(uidata), table_area);
        frame.render_widget(Self::footer(uidata), footer_area);
        self.render_statusline(uidata, frame, status_area);

        if uidata.show_popup {
            self.render_popup(uidata, frame);
        }
    }

    fn title(uidata: &UIData) -> Paragraph<'_> {
        let mut spans = vec![format!(" {} ", uidata.name).bold()];
        if uidata.search_enabled && !uidata.searchable_description.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(uidata.searchable_description.as_str().italic());
        }
        Paragraph::new(Line::from(spans))
    }

    fn filter_bar(uidata: &UIData) -> Paragraph<'_> {
        let mut spans = vec![Span::raw(" Filters: ")];
        if uidata.filters.is_empty() {
            spans.push("none".dark_gray());
        }
        for (idx, (column, value)) in uidata.filters.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(", "));
            }
            spans.push(column.as_str().yellow());
            spans.push(Span::raw(format!("~\"{value}\"")));
        }
        if uidata.pending_filter {
            spans.push("  (press Enter to apply)".red());
        }
        Paragraph::new(Line::from(spans))
    }

    fn table<'a>(&self, uidata: &'a UIData) -> Table<'a> {
        let index_width = uidata
            .row_numbers
            .last()
            .map(|n| n.to_string().len())
            .unwrap_or(1);
        let mut widths = vec![Constraint::Length(index_width as u16)];
        widths.extend(
            (0..uidata.columns.len()).map(|cidx| Constraint::Length(self.column_width(uidata, cidx))),
        );

        let header = std::iter::once(Span::raw("#")).chain(uidata.columns.iter().enumerate().map(
            |(cidx, name)| {
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if uidata.filters.iter().any(|(c, _)| c == name) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if uidata.selected_column == Some(cidx) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(name.as_str(), style)
            },
        ));

        let rows = uidata
            .rows
            .iter()
            .zip(uidata.row_numbers.iter())
            .map(|(cells, number)| {
                Row::new(
                    std::iter::once(number.to_string().dark_gray())
                        .chain(cells.iter().map(|c| Span::raw(c.as_str()))),
                )
            });

        Table::new(rows, widths)
            .header(Row::new(header))
            .column_spacing(COLUMN_WIDTH_MARGIN as u16)
            .block(Block::bordered())
    }

    fn column_width(&self, uidata: &UIData, cidx: usize) -> u16 {
        let header = uidata.columns[cidx].chars().count();
        let cells = uidata
            .rows
            .iter()
            .filter_map(|row| row.get(cidx))
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0);
        header.max(cells).min(self.max_column_width) as u16
    }

    fn footer(uidata: &UIData) -> Paragraph<'_> {
        let mut spans = vec![Span::raw(format!(" {}", uidata.summary))];
        if uidata.pagination_enabled {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(uidata.page_label.as_str()));
            spans.push(Span::raw(" | Rows to display: "));
            spans.push(uidata.page_size.to_string().bold());
        }
        if uidata.row_count != uidata.total_rows {
            spans.push(format!(" ({} matching)", uidata.row_count).dark_gray());
        }
        if !uidata.download_url.is_empty() {
            spans.push(Span::raw(" | Download: "));
            spans.push(uidata.download_url.as_str().underlined());
        }
        Paragraph::new(Line::from(spans))
    }

    fn render_statusline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        if uidata.active_cmdinput {
            let prompt = match uidata.cmd_mode {
                Some(CMDMode::FilterValue) => {
                    let column = uidata
                        .selected_column
                        .and_then(|idx| uidata.columns.get(idx))
                        .map(String::as_str)
                        .unwrap_or_default();
                    format!("filter {column}: ")
                }
                Some(CMDMode::PageSize) => "rows to display: ".to_string(),
                None => ": ".to_string(),
            };
            let cursor_x = area.x + (prompt.chars().count() + uidata.cmdinput.cursor_pos) as u16;
            let line = Line::from(vec![prompt.blue().bold(), Span::raw(uidata.cmdinput.input.as_str())]);
            frame.render_widget(Paragraph::new(line), area);
            frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
        } else {
            let line = Line::from(vec![
                Span::raw(uidata.status_message.as_str()),
                "  <?> help <q> quit".dark_gray(),
            ]);
            frame.render_widget(Paragraph::new(line), area);
        }
    }

    fn render_popup(&self, uidata: &UIData, frame: &mut Frame) {
        let area = popup_area(frame.area(), POPUP_WIDTH, POPUP_HEIGHT);
        let block = Block::bordered().title(Line::from(uidata.popup_title.as_str()).centered());
        frame.render_widget(Clear, area);

        match uidata.popup_cursor {
            Some(cursor) => {
                let list = List::new(uidata.popup_lines.iter().map(String::as_str))
                    .block(block)
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
                let mut state = ListState::default().with_selected(Some(cursor));
                frame.render_stateful_widget(list, area, &mut state);
            }
            None => {
                let text: Vec<Line> = uidata
                    .popup_lines
                    .iter()
                    .map(|l| Line::from(l.as_str()))
                    .collect();
                frame.render_widget(Paragraph::new(text).block(block), area);
            }
        }
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
