use serde::Serialize;

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Plain(String),
    Emphasized(String),
}

impl Span {
    /// The literal text of the span, without delimiters.
    pub fn text(&self) -> &str {
        match self {
            Span::Plain(text) | Span::Emphasized(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// A single table cell: its trimmed source text and the spans parsed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    pub content: Vec<Span>,
}

/// A table with one header row and any number of body rows.
///
/// Body rows are not required to match the header width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// Block-level elements parsed from chat markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { content: Vec<Span> },
    Table(Table),
}
