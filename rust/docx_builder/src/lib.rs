//! Markdown/HTML to Word document conversion.
//!
//! Markup is parsed into a tree of [`BlockNode`]s, flattened by the
//! [`DocumentBuilder`] into [`Block`]s (headings, paragraphs, styled list
//! items, grid tables) and finally written out as a `.docx` package by
//! [`DocxWriter`].
//!
//! ```no_run
//! use docx_builder::{ConvertConfig, render_docx};
//!
//! let config = ConvertConfig::default();
//! let (bytes, warnings) = render_docx("# Scope\n\n- A\n  1. A1\n- B\n", &config)?;
//! assert!(warnings.is_empty());
//! std::fs::write("out.docx", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod docx;
pub mod error;
pub mod frontend;
pub mod list;
pub mod model;
pub mod node;
pub mod outline;
pub mod styles;
pub mod table;

pub use builder::{convert, Conversion, DocumentBuilder};
pub use config::{ConvertConfig, DocumentConfig, TemplateConfig};
pub use docx::DocxWriter;
pub use error::{Error, Result};
pub use frontend::InputFormat;
pub use model::{Block, StyledListBlock, TableBlock};
pub use node::{
    BlockNode, HeadingNode, ListItemNode, ListNode, ParagraphNode, TableNode, TableRowNode,
};
pub use styles::{FallbackPolicy, ListKind, StyleRegistry, StyleWarning};

/// Parse `input` per `config.document.input` and convert it.
pub fn convert_markup(input: &str, config: &ConvertConfig) -> Conversion {
    let nodes = frontend::parse(input, config.document.input);
    convert(&nodes, &config.registry())
}

/// Markup straight to `.docx` bytes, with the style downgrades that happened
/// on the way.
pub fn render_docx(input: &str, config: &ConvertConfig) -> Result<(Vec<u8>, Vec<StyleWarning>)> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let registry = config.registry();
    let nodes = frontend::parse(input, config.document.input);
    let Conversion { blocks, warnings } = convert(&nodes, &registry);
    let bytes = DocxWriter::new(&registry)
        .with_title(config.document.title.clone())
        .to_bytes(&blocks)?;
    Ok((bytes, warnings))
}
