//! HTML to block-node tree.
//!
//! Only the top level of `<body>` is classified. Plain wrappers are looked
//! through, everything else that is not a heading, paragraph, list or table
//! becomes [`BlockNode::Other`]. Lists are rebuilt without recursion so that
//! pathological nesting cannot overflow the stack.

use std::vec;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::trace;

use crate::node::{BlockNode, HeadingNode, ListItemNode, ListNode, TableNode, TableRowNode};

/// Elements whose children are read as if they sat directly in `<body>`.
const TRANSPARENT: &[&str] = &["div", "section", "article", "main", "center"];

/// Inline elements that join the surrounding loose text into one paragraph.
const INLINE: &[&str] = &[
    "a", "abbr", "b", "br", "code", "del", "em", "i", "mark", "s", "small", "span", "strong",
    "sub", "sup", "u",
];

fn html5_parse(input: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(input)
}

fn tag_lower(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn is_list_tag(tag: &str) -> bool {
    tag == "ul" || tag == "ol"
}

fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().iter().cloned().collect()
}

fn find_body(node: &Handle) -> Option<Handle> {
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        if tag_lower(&n).as_deref() == Some("body") {
            return Some(n);
        }
        stack.extend(n.children.borrow().iter().rev().cloned());
    }
    None
}

fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// Append the raw text below `node`. `<br>` becomes a newline, every other
/// line break is plain whitespace.
fn collect_text(node: &Handle, out: &mut String) {
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        match &n.data {
            NodeData::Text { contents } => {
                out.extend(contents.borrow().chars().map(|c| match c {
                    '\n' | '\r' => ' ',
                    c => c,
                }));
            }
            NodeData::Element { .. } => {
                match tag_lower(&n).as_deref() {
                    Some("br") => out.push('\n'),
                    Some("script") | Some("style") | Some("template") => continue,
                    _ => {}
                }
                stack.extend(n.children.borrow().iter().rev().cloned());
            }
            _ => {}
        }
    }
}

/// Collapse runs of whitespace and trim each line.
fn normalize_text(raw: &str) -> String {
    raw.split('\n')
        .map(|line| collapse_ws(line).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn text_of(node: &Handle) -> String {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    normalize_text(&raw)
}

/// `h1`..`h9` style tags. Anything after the `h` that is not a number is not
/// a heading at all; out-of-range numbers are passed through for the builder
/// to reject.
fn heading_level(tag: &str) -> Option<i64> {
    let digits = tag.strip_prefix('h')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

struct ItemFrame {
    text: String,
    nested: vec::IntoIter<Handle>,
    lists: Vec<ListNode>,
}

impl ItemFrame {
    fn new(li: &Handle) -> Self {
        let mut raw = String::new();
        let mut nested = Vec::new();
        for c in li.children.borrow().iter() {
            match tag_lower(c) {
                Some(tag) if is_list_tag(&tag) => nested.push(c.clone()),
                _ => collect_text(c, &mut raw),
            }
        }
        Self {
            text: normalize_text(&raw),
            nested: nested.into_iter(),
            lists: Vec::new(),
        }
    }

    fn finish(self) -> ListItemNode {
        ListItemNode {
            inline_text: self.text,
            nested_lists: self.lists,
        }
    }
}

struct ListFrame {
    ordered: bool,
    items_in: vec::IntoIter<Handle>,
    items: Vec<ListItemNode>,
    current: Option<ItemFrame>,
}

impl ListFrame {
    fn new(list: &Handle) -> Self {
        let lis: Vec<Handle> = list
            .children
            .borrow()
            .iter()
            .filter(|c| tag_lower(c).as_deref() == Some("li"))
            .cloned()
            .collect();
        Self {
            ordered: tag_lower(list).as_deref() == Some("ol"),
            items_in: lis.into_iter(),
            items: Vec::new(),
            current: None,
        }
    }
}

/// Build a [`ListNode`] from a `<ul>`/`<ol>` element.
fn parse_list(list: &Handle) -> ListNode {
    let mut stack = vec![ListFrame::new(list)];
    loop {
        let Some(top) = stack.last_mut() else {
            // only reachable if the root frame vanished without returning
            return ListNode::unordered(Vec::new());
        };

        match top.current.as_mut().map(|item| item.nested.next()) {
            Some(Some(nested)) => stack.push(ListFrame::new(&nested)),
            Some(None) => {
                if let Some(item) = top.current.take() {
                    top.items.push(item.finish());
                }
            }
            None => match top.items_in.next() {
                Some(li) => top.current = Some(ItemFrame::new(&li)),
                None => {
                    let Some(done) = stack.pop() else { continue };
                    let list = ListNode {
                        ordered: done.ordered,
                        items: done.items,
                    };
                    match stack.last_mut().and_then(|parent| parent.current.as_mut()) {
                        Some(item) => item.lists.push(list),
                        None => return list,
                    }
                }
            },
        }
    }
}

fn collect_rows(node: &Handle) -> Vec<Handle> {
    let mut rows = Vec::new();
    let mut stack = vec![node.clone()];
    while let Some(n) = stack.pop() {
        if tag_lower(&n).as_deref() == Some("tr") {
            rows.push(n.clone());
        }
        stack.extend(n.children.borrow().iter().rev().cloned());
    }
    rows
}

fn parse_table(node: &Handle) -> TableNode {
    let rows = collect_rows(node)
        .iter()
        .map(|tr| {
            let mut cells = Vec::new();
            let mut is_header_row = false;
            for c in tr.children.borrow().iter() {
                match tag_lower(c).as_deref() {
                    Some("th") => {
                        is_header_row = true;
                        cells.push(text_of(c));
                    }
                    Some("td") => cells.push(text_of(c)),
                    _ => {}
                }
            }
            TableRowNode {
                cells,
                is_header_row,
            }
        })
        .collect();
    TableNode { rows }
}

fn classify(node: &Handle, tag: &str) -> BlockNode {
    if let Some(level) = heading_level(tag) {
        return BlockNode::Heading(HeadingNode {
            level,
            text: text_of(node),
        });
    }
    match tag {
        "p" => BlockNode::paragraph(text_of(node)),
        "ul" | "ol" => BlockNode::List(parse_list(node)),
        "table" => BlockNode::Table(parse_table(node)),
        other => BlockNode::Other {
            tag: other.to_string(),
        },
    }
}

/// Parse an HTML fragment or document into top-level block nodes.
pub fn parse_html(input: &str) -> Vec<BlockNode> {
    let wrapped = if input.to_ascii_lowercase().contains("<html") {
        input.to_string()
    } else {
        format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            input
        )
    };

    let dom = html5_parse(&wrapped);
    let top = find_body(&dom.document)
        .map(|body| children(&body))
        .unwrap_or_else(|| children(&dom.document));

    let mut nodes = Vec::new();
    let mut run = String::new();
    let mut pending: Vec<Pending> = top.into_iter().rev().map(Pending::Node).collect();
    while let Some(next) = pending.pop() {
        let node = match next {
            Pending::Node(node) => node,
            Pending::Break => {
                flush_run(&mut run, &mut nodes);
                continue;
            }
        };
        match &node.data {
            NodeData::Text { .. } => collect_text(&node, &mut run),
            NodeData::Element { .. } => {
                let Some(tag) = tag_lower(&node) else { continue };
                if INLINE.contains(&tag.as_str()) {
                    collect_text(&node, &mut run);
                    continue;
                }
                flush_run(&mut run, &mut nodes);
                if TRANSPARENT.contains(&tag.as_str()) {
                    // close the wrapper's own run before its next sibling
                    pending.push(Pending::Break);
                    pending.extend(node.children.borrow().iter().rev().cloned().map(Pending::Node));
                    continue;
                }
                trace!(%tag, "top-level element");
                nodes.push(classify(&node, &tag));
            }
            _ => {}
        }
    }
    flush_run(&mut run, &mut nodes);
    nodes
}

enum Pending {
    Node(Handle),
    Break,
}

/// Emit loose top-level text gathered so far as one paragraph.
fn flush_run(run: &mut String, nodes: &mut Vec<BlockNode>) {
    let text = normalize_text(run);
    run.clear();
    if !text.is_empty() {
        nodes.push(BlockNode::paragraph(text));
    }
}
