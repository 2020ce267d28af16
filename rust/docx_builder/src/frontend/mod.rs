//! Markup front-end: Markdown or HTML text in, block nodes out.

pub mod html;
pub mod markdown;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::BlockNode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Sniff the text: HTML if it opens with a known block tag.
    #[default]
    Auto,
    Markdown,
    Html,
}

impl InputFormat {
    /// Pick a concrete format for `input`. Never returns `Auto`.
    pub fn detect(self, input: &str) -> InputFormat {
        static HTML_START: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                r"(?i)^<(!doctype|html|head|body|div|p|h[1-9]|ul|ol|table|section|article|main)[\s>/]",
            )
            .expect("valid regex")
        });

        match self {
            InputFormat::Auto if HTML_START.is_match(input.trim_start()) => InputFormat::Html,
            InputFormat::Auto => InputFormat::Markdown,
            other => other,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Auto => "auto",
            InputFormat::Markdown => "markdown",
            InputFormat::Html => "html",
        })
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "markdown" | "md" => Ok(InputFormat::Markdown),
            "html" | "htm" => Ok(InputFormat::Html),
            other => Err(format!("unknown input format '{other}'")),
        }
    }
}

/// Parse markup into top-level block nodes.
pub fn parse(input: &str, format: InputFormat) -> Vec<BlockNode> {
    let format = format.detect(input);
    debug!(%format, len = input.len(), "parsing markup");
    match format {
        InputFormat::Html => html::parse_html(input),
        _ => html::parse_html(&markdown::markdown_to_html(input)),
    }
}
