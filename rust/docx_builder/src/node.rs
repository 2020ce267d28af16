//! Block tree produced by the markup front-end and consumed by the builder.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Heading(HeadingNode),
    Paragraph(ParagraphNode),
    List(ListNode),
    Table(TableNode),
    /// Anything the front-end saw but could not classify (`<pre>`, `<hr>`, ...).
    Other { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    /// Raw level as written in the source; may be out of range.
    pub level: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphNode {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub ordered: bool,
    pub items: Vec<ListItemNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemNode {
    /// Direct inline content of the item, excluding nested lists.
    pub inline_text: String,
    pub nested_lists: Vec<ListNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNode {
    pub rows: Vec<TableRowNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowNode {
    pub cells: Vec<String>,
    /// Set when any cell of the row was a header cell.
    pub is_header_row: bool,
}

impl BlockNode {
    pub fn heading(level: i64, text: impl Into<String>) -> Self {
        BlockNode::Heading(HeadingNode {
            level,
            text: text.into(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        BlockNode::Paragraph(ParagraphNode { text: text.into() })
    }
}

impl ListNode {
    pub fn unordered(items: Vec<ListItemNode>) -> Self {
        Self {
            ordered: false,
            items,
        }
    }

    pub fn ordered(items: Vec<ListItemNode>) -> Self {
        Self {
            ordered: true,
            items,
        }
    }
}

// Nested lists can be thousands of levels deep; the derived drop glue would
// recurse once per level.
impl Drop for ListNode {
    fn drop(&mut self) {
        let mut pending: Vec<ListNode> = Vec::new();
        for item in self.items.iter_mut() {
            pending.append(&mut item.nested_lists);
        }
        while let Some(mut list) = pending.pop() {
            for item in list.items.iter_mut() {
                pending.append(&mut item.nested_lists);
            }
        }
    }
}

impl ListItemNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inline_text: text.into(),
            nested_lists: Vec::new(),
        }
    }

    pub fn with_nested(text: impl Into<String>, nested_lists: Vec<ListNode>) -> Self {
        Self {
            inline_text: text.into(),
            nested_lists,
        }
    }
}

impl TableRowNode {
    pub fn data<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            is_header_row: false,
        }
    }

    pub fn header<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            is_header_row: true,
        }
    }
}
