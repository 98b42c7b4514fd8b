use std::time::Duration;
use tracing::trace;

use crate::domain::{Message, TVConfig, TVError};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TVError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            // crossterm also emits key release and repeat events on Windows.
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if model.raw_keyevents() {
                    Some(Message::RawKey(key))
                } else {
                    Self::handle_key(key)
                }
            }
            Event::Resize(width, height) => Some(Message::Resize(width.into(), height.into())),
            _ => None,
        };
        Ok(message)
    }

    pub fn handle_key(key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Char('f'), _) => Some(Message::ApplyFilter),
            (KeyCode::Char('n'), _) | (KeyCode::Right, _) | (KeyCode::PageDown, _) => {
                Some(Message::NextPage)
            }
            (KeyCode::Char('p'), _) | (KeyCode::Left, _) | (KeyCode::PageUp, _) => {
                Some(Message::PreviousPage)
            }
            (KeyCode::Char('g'), _) => Some(Message::FirstPage),
            (KeyCode::Char('G'), _) => Some(Message::LastPage),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Tab, _) => Some(Message::SelectNextColumn),
            (KeyCode::BackTab, _) => Some(Message::SelectPreviousColumn),
            (KeyCode::Char('a'), _) => Some(Message::ToggleFilterColumn),
            (KeyCode::Char('/'), _) => Some(Message::EditFilterValue),
            (KeyCode::Char('x'), _) => Some(Message::ClearFilterValue),
            (KeyCode::Char('s'), _) => Some(Message::CyclePageSize),
            (KeyCode::Char('S'), _) => Some(Message::EnterPageSize),
            (KeyCode::Char('h'), _) => Some(Message::DistinctValues),
            (KeyCode::Char('r'), _) => Some(Message::RefreshQuery),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HELP_TEXT;

    #[test]
    fn keys_map_to_messages() {
        let press = |code| Controller::handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(press(KeyCode::Char('n')), Some(Message::NextPage));
        assert_eq!(press(KeyCode::Left), Some(Message::PreviousPage));
        assert_eq!(press(KeyCode::Char('/')), Some(Message::EditFilterValue));
        assert_eq!(press(KeyCode::Enter), Some(Message::Enter));
        assert_eq!(press(KeyCode::Char('z')), None);
    }

    #[test]
    fn help_lists_every_mapped_key() {
        let keys = [
            "n", "p", "g / G", "j", "k", "Tab", "a", "/", "x", "Enter", "f", "h", "s", "S", "r",
            "?", "q",
        ];
        for key in keys {
            assert!(
                HELP_TEXT.lines().any(|l| l.trim_start().starts_with(key)),
                "{key} missing from help"
            );
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Controller::handle_key(key), Some(Message::Quit));
    }
}
