//! Output document model handed to the serializer.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// One flattened list item.
    StyledList { text: String, style_name: String },
    Table(TableBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledListBlock {
    pub text: String,
    pub style_name: String,
}

/// A rectangular grid: every row holds exactly `col_count` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub row_count: usize,
    pub col_count: usize,
    pub cells: Vec<Vec<String>>,
    /// Per-row emphasis flag; a flagged row is bolded as a whole.
    pub header_rows: Vec<bool>,
}

impl TableBlock {
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    pub fn is_header_row(&self, row: usize) -> bool {
        self.header_rows.get(row).copied().unwrap_or(false)
    }

    /// True when the first row carries header emphasis.
    pub fn has_header_row(&self) -> bool {
        self.is_header_row(0)
    }
}

impl From<StyledListBlock> for Block {
    fn from(b: StyledListBlock) -> Self {
        Block::StyledList {
            text: b.text,
            style_name: b.style_name,
        }
    }
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn styled_list(text: impl Into<String>, style_name: impl Into<String>) -> Self {
        Block::StyledList {
            text: text.into(),
            style_name: style_name.into(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Block::StyledList { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&Block::styled_list("A", "List Bullet")).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"styled_list","text":"A","style_name":"List Bullet"}"#
        );
    }

    #[test]
    fn table_accessors_tolerate_out_of_range() {
        let t = TableBlock {
            row_count: 1,
            col_count: 1,
            cells: vec![vec!["x".to_string()]],
            header_rows: vec![true],
        };
        assert_eq!(t.cell(0, 0), Some("x"));
        assert_eq!(t.cell(3, 0), None);
        assert!(t.has_header_row());
        assert!(!t.is_header_row(5));
    }
}
