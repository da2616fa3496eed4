use html_escape::encode_text;

use crate::block::{Block, Cell, Span, Table};
use crate::config::RenderConfig;

const DOCUMENT_CLASS: &str = "text-sm md:text-base leading-relaxed text-gray-800 space-y-4";
const PARAGRAPH_CLASS: &str = "mb-2 min-h-[1em]";
const PARAGRAPH_STRONG_CLASS: &str = "font-bold text-gray-900";
const TABLE_WRAPPER_CLASS: &str = "overflow-x-auto my-4 border border-gray-300 rounded-lg shadow-sm";
const TABLE_CLASS: &str = "min-w-full divide-y divide-gray-200";
const THEAD_CLASS: &str = "bg-gray-100";
const TH_CLASS: &str = "px-6 py-3 text-left text-xs font-bold text-gray-700 uppercase tracking-wider border-r border-gray-200 last:border-r-0";
const TBODY_CLASS: &str = "bg-white divide-y divide-gray-200";
const TD_CLASS: &str = "px-6 py-4 whitespace-normal text-sm text-gray-700 border-r border-gray-200 last:border-r-0";
const CELL_STRONG_CLASS: &str = "text-black";
const ROW_EVEN_CLASS: &str = "bg-white";
const ROW_ODD_CLASS: &str = "bg-gray-50";

/// Convert blocks to HTML markup
pub fn blocks_to_html(blocks: &[Block], config: &RenderConfig) -> String {
    let mut out = String::new();

    if config.wrap_document {
        out.push_str(&format!("<div class=\"{DOCUMENT_CLASS}\">\n"));
    }

    for block in blocks {
        emit_block(block, config, &mut out);
    }

    if config.wrap_document {
        out.push_str("</div>\n");
    }

    out
}

fn emit_block(block: &Block, config: &RenderConfig, out: &mut String) {
    match block {
        Block::Paragraph { content } => {
            out.push_str(&format!("<p class=\"{PARAGRAPH_CLASS}\">"));
            spans_to_html(content, PARAGRAPH_STRONG_CLASS, out);
            out.push_str("</p>\n");
        }
        Block::Table(table) => {
            table_to_html(table, config, out);
        }
    }
}

fn spans_to_html(spans: &[Span], strong_class: &str, out: &mut String) {
    for span in spans {
        match span {
            Span::Plain(text) => out.push_str(&encode_text(text)),
            Span::Emphasized(text) => {
                out.push_str(&format!("<strong class=\"{strong_class}\">"));
                out.push_str(&encode_text(text));
                out.push_str("</strong>");
            }
        }
    }
}

fn cell_to_html(tag: &str, cell: &Cell, attrs: &str, out: &mut String) {
    out.push_str(&format!("<{tag}{attrs}>"));
    spans_to_html(&cell.content, CELL_STRONG_CLASS, out);
    out.push_str(&format!("</{tag}>\n"));
}

fn table_to_html(table: &Table, config: &RenderConfig, out: &mut String) {
    out.push_str(&format!("<div class=\"{TABLE_WRAPPER_CLASS}\">\n"));
    out.push_str(&format!("<table class=\"{TABLE_CLASS}\">\n"));

    out.push_str(&format!("<thead class=\"{THEAD_CLASS}\">\n<tr>\n"));
    let th_attrs = format!(" scope=\"col\" class=\"{TH_CLASS}\"");
    for cell in &table.headers {
        cell_to_html("th", cell, &th_attrs, out);
    }
    out.push_str("</tr>\n</thead>\n");

    out.push_str(&format!("<tbody class=\"{TBODY_CLASS}\">\n"));
    let td_attrs = format!(" class=\"{TD_CLASS}\"");
    for (i, row) in table.rows.iter().enumerate() {
        out.push_str(&format!("<tr class=\"{}\">\n", row_class(i, config)));
        for cell in row {
            cell_to_html("td", cell, &td_attrs, out);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n");

    out.push_str("</table>\n</div>\n");
}

fn row_class(index: usize, config: &RenderConfig) -> &'static str {
    if config.striped_rows && index % 2 == 1 {
        ROW_ODD_CLASS
    } else {
        ROW_EVEN_CLASS
    }
}
