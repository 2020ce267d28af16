//! Flattening of nested lists into styled list paragraphs.

use std::slice;

use crate::model::StyledListBlock;
use crate::node::{ListItemNode, ListNode};
use crate::styles::{StyleRegistry, StyleWarning};

struct Frame<'a> {
    items: slice::Iter<'a, ListItemNode>,
    ordered: bool,
    level: u32,
}

impl<'a> Frame<'a> {
    fn new(list: &'a ListNode, level: u32) -> Self {
        Self {
            items: list.items.iter(),
            ordered: list.ordered,
            level,
        }
    }
}

/// Walk `list` depth-first, pre-order, starting at `level`.
///
/// Every item with non-blank own text becomes one block; its nested lists
/// follow it at `level + 1` before the next sibling. Style downgrades are
/// pushed onto `warnings`.
///
/// Uses a heap-allocated stack, so nesting depth is not limited by the call
/// stack.
pub fn resolve(
    list: &ListNode,
    level: u32,
    styles: &StyleRegistry,
    warnings: &mut Vec<StyleWarning>,
) -> Vec<StyledListBlock> {
    let mut out = Vec::new();
    let mut stack = vec![Frame::new(list, level)];

    while let Some(frame) = stack.last_mut() {
        let Some(item) = frame.items.next() else {
            stack.pop();
            continue;
        };
        let (ordered, level) = (frame.ordered, frame.level);

        let text = item.inline_text.trim();
        if !text.is_empty() {
            let style = styles.resolve_ordered(ordered, level);
            warnings.extend(style.warning());
            out.push(StyledListBlock {
                text: text.to_string(),
                style_name: style.name,
            });
        }

        // reversed so the first nested list is popped first
        for nested in item.nested_lists.iter().rev() {
            stack.push(Frame::new(nested, level + 1));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ListItemNode as Item, ListNode};
    use pretty_assertions::assert_eq;

    fn flat(blocks: &[StyledListBlock]) -> Vec<(&str, &str)> {
        blocks
            .iter()
            .map(|b| (b.text.as_str(), b.style_name.as_str()))
            .collect()
    }

    #[test]
    fn three_levels_of_bullets() {
        let list = ListNode::unordered(vec![Item::with_nested(
            "one",
            vec![ListNode::unordered(vec![Item::with_nested(
                "two",
                vec![ListNode::unordered(vec![Item::new("three")])],
            )])],
        )]);
        let mut warnings = Vec::new();
        let out = resolve(&list, 1, &StyleRegistry::default(), &mut warnings);
        assert_eq!(
            flat(&out),
            vec![
                ("one", "List Bullet"),
                ("two", "List Bullet 2"),
                ("three", "List Bullet 3"),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn children_come_before_next_sibling() {
        let list = ListNode::ordered(vec![
            Item::with_nested(
                "a",
                vec![
                    ListNode::unordered(vec![Item::new("a.x"), Item::new("a.y")]),
                    ListNode::ordered(vec![Item::new("a.1")]),
                ],
            ),
            Item::new("b"),
        ]);
        let mut warnings = Vec::new();
        let out = resolve(&list, 1, &StyleRegistry::default(), &mut warnings);
        assert_eq!(
            flat(&out),
            vec![
                ("a", "List Number"),
                ("a.x", "List Bullet 2"),
                ("a.y", "List Bullet 2"),
                ("a.1", "List Number 2"),
                ("b", "List Number"),
            ]
        );
    }

    #[test]
    fn blank_item_still_descends() {
        let list = ListNode::unordered(vec![Item::with_nested(
            "  \n ",
            vec![ListNode::unordered(vec![Item::new("inner")])],
        )]);
        let mut warnings = Vec::new();
        let out = resolve(&list, 1, &StyleRegistry::default(), &mut warnings);
        assert_eq!(flat(&out), vec![("inner", "List Bullet 2")]);
    }

    #[test]
    fn text_is_trimmed() {
        let list = ListNode::unordered(vec![Item::new("  spaced out\n")]);
        let out = resolve(&list, 1, &StyleRegistry::default(), &mut Vec::new());
        assert_eq!(out[0].text, "spaced out");
    }

    #[test]
    fn deep_levels_record_warnings() {
        let list = ListNode::ordered(vec![Item::new("deep")]);
        let mut warnings = Vec::new();
        let out = resolve(&list, 5, &StyleRegistry::with_list_levels(3), &mut warnings);
        assert_eq!(flat(&out), vec![("deep", "List Number")]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].requested, "List Number 5");
    }

    #[test]
    fn survives_very_deep_nesting() {
        let depth = 20_000;
        let mut list = ListNode::unordered(vec![Item::new("leaf")]);
        for i in 0..depth {
            list = ListNode::unordered(vec![Item::with_nested(format!("n{i}"), vec![list])]);
        }
        let mut warnings = Vec::new();
        let out = resolve(&list, 1, &StyleRegistry::default(), &mut warnings);
        assert_eq!(out.len(), depth + 1);
        assert_eq!(out.last().unwrap().text, "leaf");
        // levels past the template depth fall back to the base style
        assert_eq!(out.last().unwrap().style_name, "List Bullet");
        assert_eq!(warnings.len(), depth + 1 - 3);
    }
}
