use std::str::Split;

use crate::block::Block;
use crate::emphasis::inline_spans;
use crate::table;

/// Parse chat markdown into a list of blocks
pub fn assemble(text: &str) -> Vec<Block> {
    Blocks::new(text).collect()
}

/// Lazy block iterator over a document.
///
/// Lines are consumed one at a time; a table run is emitted when the first
/// non-table line after it is seen, or at the end of input.
pub struct Blocks<'a> {
    lines: Split<'a, char>,
    // Trimmed rows of the current table run; non-empty means "in a table".
    table_rows: Vec<&'a str>,
    // Paragraph produced by the line that closed a table run.
    pending: Option<Block>,
    done: bool,
}

impl<'a> Blocks<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n'),
            table_rows: Vec::new(),
            pending: None,
            done: false,
        }
    }

    fn flush_table(&mut self) -> Option<Block> {
        if self.table_rows.is_empty() {
            return None;
        }
        let rows = std::mem::take(&mut self.table_rows);
        table::materialize(rows.as_slice()).map(Block::Table)
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if let Some(block) = self.pending.take() {
            return Some(block);
        }

        while !self.done {
            let Some(line) = self.lines.next() else {
                self.done = true;
                return self.flush_table();
            };

            let trimmed = trim_line(line);
            if is_table_row(trimmed) {
                self.table_rows.push(trimmed);
                continue;
            }

            let paragraph = (!trimmed.is_empty()).then(|| Block::Paragraph {
                content: inline_spans(line),
            });

            match self.flush_table() {
                Some(table) => {
                    self.pending = paragraph;
                    return Some(table);
                }
                None if paragraph.is_some() => return paragraph,
                None => {}
            }
        }

        None
    }
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(is_trim_whitespace)
}

// The set JavaScript's `String.prototype.trim` removes: line terminators,
// space separators (Zs) and the byte-order mark. NEL (U+0085) is not in it.
fn is_trim_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{b}' | '\u{c}' | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.starts_with('|') && trimmed.ends_with('|')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Cell, Span, Table};
    use pretty_assertions::assert_eq;

    fn plain(s: &str) -> Span {
        Span::Plain(s.to_string())
    }

    fn bold(s: &str) -> Span {
        Span::Emphasized(s.to_string())
    }

    fn paragraph(spans: Vec<Span>) -> Block {
        Block::Paragraph { content: spans }
    }

    fn cell(s: &str) -> Cell {
        Cell {
            text: s.to_string(),
            content: vec![plain(s)],
        }
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Block {
        Block::Table(Table {
            headers: headers.iter().map(|h| cell(h)).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| cell(c)).collect())
                .collect(),
        })
    }

    #[test]
    fn empty_input() {
        assert!(assemble("").is_empty());
        assert!(assemble("\n\n   \n").is_empty());
    }

    #[test]
    fn paragraph_with_emphasis() {
        assert_eq!(
            assemble("Hello **world**"),
            vec![paragraph(vec![plain("Hello "), bold("world")])]
        );
    }

    #[test]
    fn prose_lines_become_one_paragraph_each() {
        assert_eq!(
            assemble("first\n\nsecond\nthird"),
            vec![
                paragraph(vec![plain("first")]),
                paragraph(vec![plain("second")]),
                paragraph(vec![plain("third")]),
            ]
        );
    }

    #[test]
    fn paragraph_keeps_untrimmed_line() {
        assert_eq!(
            assemble("  indented text  "),
            vec![paragraph(vec![plain("  indented text  ")])]
        );
    }

    #[test]
    fn simple_table() {
        let md = "| A | B |\n|---|---|\n| 1 | 2 |";
        assert_eq!(assemble(md), vec![table(&["A", "B"], &[&["1", "2"]])]);
    }

    #[test]
    fn table_then_blank_then_text() {
        let md = "| only pipe row |\n\ntext";
        assert_eq!(
            assemble(md),
            vec![
                table(&["only pipe row"], &[]),
                paragraph(vec![plain("text")]),
            ]
        );
    }

    #[test]
    fn table_flushes_before_the_closing_paragraph() {
        let md = "intro\n| h |\n| v |\noutro";
        assert_eq!(
            assemble(md),
            vec![
                paragraph(vec![plain("intro")]),
                table(&["h"], &[&["v"]]),
                paragraph(vec![plain("outro")]),
            ]
        );
    }

    #[test]
    fn blank_line_splits_table_runs() {
        let md = "| a |\n\n| b |";
        assert_eq!(assemble(md), vec![table(&["a"], &[]), table(&["b"], &[])]);
    }

    #[test]
    fn separator_only_run_emits_nothing() {
        let md = "|---|\nafter";
        assert_eq!(assemble(md), vec![paragraph(vec![plain("after")])]);
    }

    #[test]
    fn separator_heuristic_is_substring_based() {
        let md = "| h | x |\n| a--b | c |\n| a---b | c |";
        assert_eq!(assemble(md), vec![table(&["h", "x"], &[&["a--b", "c"]])]);
    }

    #[test]
    fn indented_rows_and_crlf_are_table_rows() {
        let md = "  | A |\r\n\t| 1 |  \r\n";
        assert_eq!(assemble(md), vec![table(&["A"], &[&["1"]])]);
    }

    #[test]
    fn carriage_return_stays_in_paragraph_text() {
        assert_eq!(assemble("line\r\n"), vec![paragraph(vec![plain("line\r")])]);
    }

    #[test]
    fn trimming_follows_javascript_whitespace() {
        assert_eq!(
            assemble("\u{feff}\u{a0}| a |\u{3000}"),
            vec![table(&["a"], &[])]
        );
        assert_eq!(
            assemble("| a |\u{85}"),
            vec![paragraph(vec![plain("| a |\u{85}")])]
        );
    }

    #[test]
    fn lone_pipe_is_a_table_row_without_cells() {
        assert_eq!(
            assemble("|"),
            vec![Block::Table(Table {
                headers: vec![],
                rows: vec![],
            })]
        );
    }

    #[test]
    fn contiguous_rows_form_one_table() {
        let md = "| a |\n| b |\n| c |\n| d |";
        let blocks = assemble(md);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Table(t) if t.rows.len() == 3));
    }

    #[test]
    fn iterator_is_lazy_and_ordered() {
        let mut blocks = Blocks::new("a\n| t |\nb");
        assert_eq!(blocks.next(), Some(paragraph(vec![plain("a")])));
        assert!(matches!(blocks.next(), Some(Block::Table(_))));
        assert_eq!(blocks.next(), Some(paragraph(vec![plain("b")])));
        assert_eq!(blocks.next(), None);
        assert_eq!(blocks.next(), None);
    }
}
