mod assistant;
mod block;
mod config;
mod emphasis;
mod gemini;
mod html;
mod parser;
mod service;
mod table;

pub use assistant::Assistant;
pub use block::{Block, Cell, Span, Table};
pub use config::{
    Config, ConfigError, LogConfig, MessagesConfig, RenderConfig, ServiceConfig, mask_api_key,
};
pub use emphasis::split_emphasis;
pub use gemini::GeminiClient;
pub use html::blocks_to_html;
pub use parser::{Blocks, assemble};
pub use service::{
    CompletionError, CompletionRequest, CompletionService, InlineImage, RESOURCE_NOT_FOUND_MARKER,
};
pub use table::materialize;

/// Parse chat markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::assemble(markdown)
}

/// Iterate over the blocks of a document without collecting them.
pub fn blocks(markdown: &str) -> Blocks<'_> {
    Blocks::new(markdown)
}

/// Convert chat markdown to HTML using the compiled default render config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, &Config::compiled_default().render)
}

/// Convert chat markdown to HTML with a custom render config.
pub fn markdown_to_html_with_config(markdown: &str, config: &RenderConfig) -> String {
    let blocks = parse(markdown);
    html::blocks_to_html(&blocks, config)
}
