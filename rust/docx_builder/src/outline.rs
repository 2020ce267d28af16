//! Section outlines: a JSON list of `{ "title", "level" }` objects, often
//! wrapped in chatter by whatever produced it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::BlockNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default = "top_level")]
    pub level: i64,
}

/// Entries may be bare strings (`"1. Scope"`), which become top-level titles.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Title(String),
    Entry(OutlineEntry),
}

impl From<RawEntry> for OutlineEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Title(title) => OutlineEntry {
                title,
                level: top_level(),
            },
            RawEntry::Entry(entry) => entry,
        }
    }
}

fn untitled() -> String {
    "Untitled".to_string()
}

fn top_level() -> i64 {
    1
}

/// Pull the first `[` ... last `]` span out of `raw` and parse it.
pub fn parse_outline(raw: &str) -> Result<Vec<OutlineEntry>> {
    static ARRAY: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

    let json = ARRAY
        .find(raw)
        .map(|m| m.as_str())
        .unwrap_or_else(|| raw.trim());
    if json.is_empty() {
        return Err(Error::EmptyInput);
    }
    let raw: Vec<RawEntry> =
        serde_json::from_str(json).map_err(|e| Error::outline(e.to_string()))?;
    Ok(raw.into_iter().map(OutlineEntry::from).collect())
}

/// One heading node per entry, in order. Levels are not checked here.
pub fn outline_nodes(entries: &[OutlineEntry]) -> Vec<BlockNode> {
    entries
        .iter()
        .map(|e| BlockNode::heading(e.level, e.title.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_array_inside_prose() {
        let raw = r#"Sure! Here is the outline:
[
  {"title": "Scope", "level": 1},
  {"title": "In Scope", "level": 2},
  {"title": "Risk Analysis"}
]
Let me know if you need more."#;
        let entries = parse_outline(raw).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].level, 2);
        assert_eq!(entries[2].level, 1);
        assert_eq!(
            outline_nodes(&entries)[0],
            BlockNode::heading(1, "Scope")
        );
    }

    #[test]
    fn plain_string_entries_are_top_level() {
        let entries = parse_outline(r#"["1. Scope", {"title": "Tools", "level": 2}, "2. Risk Analysis"]"#)
            .unwrap();
        assert_eq!(
            outline_nodes(&entries),
            vec![
                BlockNode::heading(1, "1. Scope"),
                BlockNode::heading(2, "Tools"),
                BlockNode::heading(1, "2. Risk Analysis"),
            ]
        );
    }

    #[test]
    fn missing_title_defaults() {
        let entries = parse_outline(r#"[{"level": 3}]"#).unwrap();
        assert_eq!(entries[0].title, "Untitled");
    }

    #[test]
    fn garbage_is_an_outline_error() {
        assert!(matches!(parse_outline("no json here"), Err(Error::Outline { .. })));
        assert!(matches!(parse_outline("   "), Err(Error::EmptyInput)));
        assert!(matches!(parse_outline("[{\"title\": 3}]"), Err(Error::Outline { .. })));
    }
}
