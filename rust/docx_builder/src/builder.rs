//! Top-level dispatch from block nodes to output blocks.

use tracing::debug;

use crate::list;
use crate::model::Block;
use crate::node::{BlockNode, HeadingNode};
use crate::styles::{StyleRegistry, StyleWarning, MAX_HEADING_LEVEL};
use crate::table;

/// Result of one conversion: the blocks plus any non-fatal style downgrades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub blocks: Vec<Block>,
    pub warnings: Vec<StyleWarning>,
}

/// Accumulates the blocks for a single document. Build a fresh one for
/// every conversion; the registry may be shared between them.
pub struct DocumentBuilder<'a> {
    styles: &'a StyleRegistry,
    blocks: Vec<Block>,
    warnings: Vec<StyleWarning>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(styles: &'a StyleRegistry) -> Self {
        Self {
            styles,
            blocks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push(&mut self, node: &BlockNode) {
        match node {
            BlockNode::Heading(h) => self.push_heading(h),
            BlockNode::Paragraph(p) => self.blocks.push(Block::paragraph(p.text.clone())),
            BlockNode::List(l) => {
                let items = list::resolve(l, 1, self.styles, &mut self.warnings);
                self.blocks.extend(items.into_iter().map(Block::from));
            }
            BlockNode::Table(t) => {
                if let Some(t) = table::extract(t) {
                    self.blocks.push(Block::Table(t));
                }
            }
            BlockNode::Other { tag } => debug!(%tag, "ignoring unsupported block"),
        }
    }

    fn push_heading(&mut self, h: &HeadingNode) {
        match u8::try_from(h.level) {
            Ok(level) if (1..=MAX_HEADING_LEVEL).contains(&level) => {
                self.blocks.push(Block::heading(level, h.text.clone()));
            }
            _ => debug!(level = h.level, text = %h.text, "dropping heading with invalid level"),
        }
    }

    pub fn extend<'n>(&mut self, nodes: impl IntoIterator<Item = &'n BlockNode>) {
        for node in nodes {
            self.push(node);
        }
    }

    pub fn finish(self) -> Conversion {
        Conversion {
            blocks: self.blocks,
            warnings: self.warnings,
        }
    }

    /// Convert a whole node sequence in one go.
    pub fn convert<'n>(mut self, nodes: impl IntoIterator<Item = &'n BlockNode>) -> Conversion {
        self.extend(nodes);
        self.finish()
    }
}

/// Shorthand for `DocumentBuilder::new(styles).convert(nodes)`.
pub fn convert(nodes: &[BlockNode], styles: &StyleRegistry) -> Conversion {
    DocumentBuilder::new(styles).convert(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ListItemNode as Item, ListNode, TableNode, TableRowNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(9)]
    fn valid_heading_levels_are_kept(#[case] level: i64) {
        let out = convert(&[BlockNode::heading(level, "Title")], &StyleRegistry::default());
        assert_eq!(out.blocks, vec![Block::heading(level as u8, "Title")]);
    }

    #[rstest]
    #[case(0)]
    #[case(10)]
    #[case(-1)]
    #[case(300)]
    fn invalid_heading_levels_are_dropped(#[case] level: i64) {
        let out = convert(
            &[BlockNode::heading(level, "Nope"), BlockNode::paragraph("after")],
            &StyleRegistry::default(),
        );
        assert_eq!(out.blocks, vec![Block::paragraph("after")]);
    }

    #[test]
    fn scope_example_round_trip() {
        let nodes = vec![
            BlockNode::heading(1, "Scope"),
            BlockNode::paragraph("Intro text"),
            BlockNode::List(ListNode::unordered(vec![
                Item::with_nested("A", vec![ListNode::ordered(vec![Item::new("A1")])]),
                Item::new("B"),
            ])),
        ];
        let out = convert(&nodes, &StyleRegistry::default());
        assert_eq!(
            out.blocks,
            vec![
                Block::heading(1, "Scope"),
                Block::paragraph("Intro text"),
                Block::styled_list("A", "List Bullet"),
                Block::styled_list("A1", "List Number 2"),
                Block::styled_list("B", "List Bullet"),
            ]
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn paragraph_text_is_verbatim() {
        let out = convert(
            &[BlockNode::paragraph("  a < b & c  ")],
            &StyleRegistry::default(),
        );
        assert_eq!(out.blocks, vec![Block::paragraph("  a < b & c  ")]);
    }

    #[test]
    fn empty_tables_and_unknown_nodes_vanish() {
        let nodes = vec![
            BlockNode::Table(TableNode { rows: vec![] }),
            BlockNode::Other { tag: "pre".into() },
            BlockNode::Table(TableNode {
                rows: vec![TableRowNode::header(["x"])],
            }),
        ];
        let out = convert(&nodes, &StyleRegistry::default());
        assert_eq!(out.blocks.len(), 1);
        assert!(matches!(&out.blocks[0], Block::Table(t) if t.has_header_row()));
    }

    #[test]
    fn conversion_is_repeatable() {
        let nodes = vec![
            BlockNode::heading(2, "Risks"),
            BlockNode::List(ListNode::ordered(vec![Item::with_nested(
                "r1",
                vec![ListNode::ordered(vec![Item::with_nested(
                    "r1a",
                    vec![ListNode::ordered(vec![Item::with_nested(
                        "r1a-i",
                        vec![ListNode::ordered(vec![Item::new("too deep")])],
                    )])],
                )])],
            )])),
        ];
        let styles = StyleRegistry::default();
        let first = convert(&nodes, &styles);
        let second = convert(&nodes, &styles);
        assert_eq!(first, second);
        assert_eq!(first.warnings.len(), 1);
        assert_eq!(
            first.blocks.last(),
            Some(&Block::styled_list("too deep", "List Number"))
        );
    }

    #[test]
    fn incremental_push_matches_convert() {
        let nodes = vec![BlockNode::heading(3, "h"), BlockNode::paragraph("p")];
        let styles = StyleRegistry::default();
        let mut b = DocumentBuilder::new(&styles);
        for n in &nodes {
            b.push(n);
        }
        assert_eq!(b.finish(), convert(&nodes, &styles));
    }
}
