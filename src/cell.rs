use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single value in a row.
///
/// Filtering and display only ever look at [`Cell::display_text`]; the raw value
/// is kept so distinct values can be handed back exactly as they appear in the data.
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    /// A cell carrying extra attributes. `text` is its canonical display string.
    Structured {
        text: String,
        attrs: BTreeMap<String, String>,
    },
}

impl Cell {
    pub fn structured(text: impl Into<String>) -> Self {
        Cell::Structured {
            text: text.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Cell::Structured { text, mut attrs } => {
                attrs.insert(key.into(), value.into());
                Cell::Structured { text, attrs }
            }
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The string used for display and for filter matching. `None` for null cells.
    pub fn display_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(Cow::Borrowed(s)),
            Cell::Structured { text, .. } => Some(Cow::Borrowed(text)),
            Cell::Integer(n) => Some(Cow::Owned(n.to_string())),
            Cell::Number(n) => Some(Cow::Owned(format_number(*n))),
            Cell::Bool(b) => Some(Cow::Owned(b.to_string())),
        }
    }
}

/// Formats a float the way `String(number)` does in a browser: no negative zero,
/// and exponent notation outside `1e-6..1e21`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

// Numbers compare by bit pattern so a cell can be used as a hash key.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => a.to_bits() == b.to_bits(),
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (
                Cell::Structured { text: ta, attrs: aa },
                Cell::Structured { text: tb, attrs: ab },
            ) => ta == tb && aa == ab,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Text(s) => s.hash(state),
            Cell::Integer(n) => n.hash(state),
            Cell::Number(n) => n.to_bits().hash(state),
            Cell::Bool(b) => b.hash(state),
            Cell::Structured { text, attrs } => {
                text.hash(state);
                attrs.hash(state);
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("∅"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One value per column, in column order.
pub type Row = Vec<Cell>;

/// The immutable source rows. Shared between the catalog and every filtered view.
pub type Dataset = Arc<Vec<Row>>;
