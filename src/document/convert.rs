//! Markdown nodes → document blocks.
//!
//! Dispatch is on a node's own kind only. Inline styling is never combined:
//! `**bold _and italic_**` becomes a single bold run of the flattened text,
//! and a link keeps its display text but loses its URL. Nested lists are
//! flattened into their parent item's text.
//!
//! The converter is total. Kinds without a styling rule fall back to a plain
//! run of their raw value, or contribute nothing when they have none.

use crate::document::model::{Border, DocumentBlock, StyledRun};
use crate::document::styles::{
    heading_size, ACCENT_COLOR, CODE_BLOCK_COLOR, CODE_BLOCK_SIZE, CODE_INDENT, CODE_SHADING,
    CODE_SPACING, INLINE_CODE_COLOR, INLINE_CODE_SIZE, LINK_COLOR, LIST_INDENT, MUTED_COLOR,
    QUOTE_INDENT, RULE_SPACING, RULE_WIDTH,
};
use crate::markdown::MarkdownNode;
use tracing::warn;

/// Nesting below this depth is dropped rather than descended into.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Convert top-level markdown nodes into blocks, preserving order.
///
/// Each node yields one block, except lists (one block per item) and
/// unrecognised valueless nodes (none).
pub fn markdown_to_blocks(nodes: &[MarkdownNode]) -> Vec<DocumentBlock> {
    let mut blocks = Vec::with_capacity(nodes.len());
    for node in nodes {
        convert_block(node, &mut blocks);
    }
    blocks
}

fn convert_block(node: &MarkdownNode, out: &mut Vec<DocumentBlock>) {
    match node {
        MarkdownNode::Heading { depth, .. } => out.push(heading_block(*depth, node)),
        MarkdownNode::Paragraph { children, value } => {
            out.push(paragraph_block(children, value.as_deref()))
        }
        MarkdownNode::List { ordered, children } => out.extend(list_blocks(*ordered, children)),
        MarkdownNode::Code { value, .. } => out.push(code_block(value)),
        MarkdownNode::Blockquote { .. } => out.push(quote_block(node)),
        MarkdownNode::ThematicBreak => out.push(rule_block()),
        other => {
            if let Some(value) = other.value() {
                out.push(DocumentBlock::new(vec![StyledRun::plain(value)]));
            }
        }
    }
}

/// Depths outside 1–6 are rendered as level 6.
pub fn heading_level(depth: u8) -> u8 {
    if (1..=6).contains(&depth) {
        depth
    } else {
        6
    }
}

fn heading_block(depth: u8, node: &MarkdownNode) -> DocumentBlock {
    let level = heading_level(depth);
    let run = StyledRun::plain(flatten_text(node))
        .bold()
        .size(heading_size(level))
        .color(ACCENT_COLOR);
    DocumentBlock::new(vec![run]).with_heading(level)
}

fn paragraph_block(children: &[MarkdownNode], value: Option<&str>) -> DocumentBlock {
    let runs = match (children.is_empty(), value) {
        (true, Some(value)) => vec![StyledRun::plain(value)],
        _ => children.iter().flat_map(inline_runs).collect(),
    };
    DocumentBlock::new(runs)
}

fn list_blocks(ordered: bool, items: &[MarkdownNode]) -> Vec<DocumentBlock> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}. ", i + 1)
            } else {
                "• ".to_string()
            };
            DocumentBlock::new(vec![
                StyledRun::plain(marker).bold(),
                StyledRun::plain(flatten_text(item)),
            ])
            .indent_left(LIST_INDENT)
        })
        .collect()
}

fn code_block(value: &str) -> DocumentBlock {
    let run = StyledRun::plain(value)
        .monospace()
        .size(CODE_BLOCK_SIZE)
        .color(CODE_BLOCK_COLOR);
    DocumentBlock::new(vec![run])
        .spacing(CODE_SPACING.0, CODE_SPACING.1)
        .indent_left(CODE_INDENT)
        .shading(CODE_SHADING)
}

fn quote_block(node: &MarkdownNode) -> DocumentBlock {
    let run = StyledRun::plain(flatten_text(node))
        .italic()
        .color(MUTED_COLOR);
    DocumentBlock::new(vec![run])
        .border_left(Border {
            color: MUTED_COLOR.to_string(),
            size: 12,
            space: 8,
        })
        .indent_left(QUOTE_INDENT)
}

fn rule_block() -> DocumentBlock {
    DocumentBlock::new(vec![StyledRun::plain("_".repeat(RULE_WIDTH))])
        .centered()
        .spacing(RULE_SPACING.0, RULE_SPACING.1)
}

/// Styled runs for an inline node (the run converter).
pub fn inline_runs(node: &MarkdownNode) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    collect_runs(node, 0, &mut runs);
    runs
}

fn collect_runs(node: &MarkdownNode, depth: usize, out: &mut Vec<StyledRun>) {
    if depth > MAX_NESTING_DEPTH {
        warn!("markdown nested deeper than {MAX_NESTING_DEPTH} levels; dropping inner content");
        return;
    }
    match node {
        MarkdownNode::Text { value } => out.push(StyledRun::plain(value)),
        MarkdownNode::Strong { .. } => out.push(StyledRun::plain(flatten_text(node)).bold()),
        MarkdownNode::Emphasis { .. } => out.push(StyledRun::plain(flatten_text(node)).italic()),
        MarkdownNode::InlineCode { value } => out.push(
            StyledRun::plain(value)
                .monospace()
                .color(INLINE_CODE_COLOR)
                .size(INLINE_CODE_SIZE),
        ),
        MarkdownNode::Link { .. } => out.push(
            StyledRun::plain(flatten_text(node))
                .underline()
                .color(LINK_COLOR),
        ),
        other if !other.children().is_empty() => {
            for child in other.children() {
                collect_runs(child, depth + 1, out);
            }
        }
        other => {
            if let Some(value) = other.value() {
                out.push(StyledRun::plain(value));
            }
        }
    }
}

/// All leaf text under a node: its own value if it has one, otherwise its
/// children's text concatenated without separators.
pub fn flatten_text(node: &MarkdownNode) -> String {
    let mut text = String::new();
    collect_text(node, 0, &mut text);
    text
}

fn collect_text(node: &MarkdownNode, depth: usize, out: &mut String) {
    if depth > MAX_NESTING_DEPTH {
        warn!("markdown nested deeper than {MAX_NESTING_DEPTH} levels; dropping inner text");
        return;
    }
    if let Some(value) = node.value() {
        out.push_str(value);
        return;
    }
    for child in node.children() {
        collect_text(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::styles::{BODY_SIZE, MONOSPACE_FONT};
    use crate::markdown::parse_markdown;

    fn strong(children: Vec<MarkdownNode>) -> MarkdownNode {
        MarkdownNode::Strong { children }
    }

    fn emphasis(children: Vec<MarkdownNode>) -> MarkdownNode {
        MarkdownNode::Emphasis { children }
    }

    fn item(text: &str) -> MarkdownNode {
        MarkdownNode::ListItem {
            children: vec![MarkdownNode::paragraph(vec![MarkdownNode::text(text)])],
        }
    }

    #[test]
    fn heading_becomes_single_bold_run() {
        let blocks = markdown_to_blocks(&[MarkdownNode::heading(
            1,
            vec![MarkdownNode::text("Title")],
        )]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].heading, Some(1));
        assert_eq!(blocks[0].runs().len(), 1);
        assert_eq!(blocks[0].runs()[0].text, "Title");
        assert!(blocks[0].runs()[0].bold);
        assert_eq!(blocks[0].runs()[0].color.as_deref(), Some(ACCENT_COLOR));
    }

    #[test]
    fn unordered_list_items_get_bullets() {
        let list = MarkdownNode::list(
            false,
            vec![
                MarkdownNode::other("listItem", Some("x")),
                MarkdownNode::other("listItem", Some("y")),
            ],
        );
        let blocks = markdown_to_blocks(&[list]);
        assert_eq!(blocks.len(), 2);
        for (block, expected) in blocks.iter().zip(["x", "y"]) {
            let runs = block.runs();
            assert_eq!(runs[0].text, "• ");
            assert!(runs[0].bold);
            assert_eq!(runs[1].text, expected);
            assert!(!runs[1].bold);
            assert_eq!(block.indent_left, Some(LIST_INDENT));
        }
    }

    #[test]
    fn empty_paragraph_has_one_empty_run() {
        let blocks = markdown_to_blocks(&[MarkdownNode::paragraph(vec![])]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs().len(), 1);
        assert_eq!(blocks[0].runs()[0].text, "");
    }

    #[test]
    fn paragraph_value_without_children() {
        let node = MarkdownNode::Paragraph {
            children: vec![],
            value: Some("raw".into()),
        };
        let blocks = markdown_to_blocks(&[node]);
        assert_eq!(blocks[0].text(), "raw");
    }

    #[test]
    fn code_block_is_monospace_and_coloured() {
        let blocks = markdown_to_blocks(&[MarkdownNode::code("const x = 1;")]);
        assert_eq!(blocks.len(), 1);
        let runs = blocks[0].runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "const x = 1;");
        assert!(runs[0].monospace);
        assert!(runs[0].color.is_some());
        assert_ne!(runs[0].color, StyledRun::plain("").color);
        assert!(runs[0].size < BODY_SIZE);
        assert_eq!(blocks[0].shading.as_deref(), Some(CODE_SHADING));
        assert_eq!(MONOSPACE_FONT, "Courier New");
    }

    #[test]
    fn out_of_range_heading_depths_use_level_six() {
        for depth in [0u8, 7, 9, 255] {
            let blocks =
                markdown_to_blocks(&[MarkdownNode::heading(depth, vec![MarkdownNode::text("h")])]);
            assert_eq!(blocks.len(), 1);
            assert_eq!(blocks[0].heading, Some(6), "depth {depth}");
            assert_eq!(blocks[0].runs()[0].size, heading_size(6));
        }
    }

    #[test]
    fn heading_sizes_never_grow_with_depth() {
        let sizes: Vec<usize> = (1..=6)
            .map(|d| markdown_to_blocks(&[MarkdownNode::heading(d, vec![MarkdownNode::text("h")])]))
            .map(|b| b[0].runs()[0].size)
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "{sizes:?}");
    }

    #[test]
    fn unknown_kind_with_value_becomes_plain_block() {
        let blocks = markdown_to_blocks(&[MarkdownNode::other("mystery", Some("payload"))]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs(), &[StyledRun::plain("payload")]);
    }

    #[test]
    fn unknown_kind_without_value_is_skipped() {
        let blocks = markdown_to_blocks(&[
            MarkdownNode::other("mystery", None),
            MarkdownNode::paragraph(vec![MarkdownNode::text("after")]),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "after");
    }

    #[test]
    fn one_block_per_node_except_lists() {
        let nodes = vec![
            MarkdownNode::heading(2, vec![MarkdownNode::text("Q1")]),
            MarkdownNode::paragraph(vec![MarkdownNode::text("body")]),
            MarkdownNode::list(true, vec![item("a"), item("b"), item("c")]),
            MarkdownNode::code("fn main() {}"),
            MarkdownNode::Blockquote {
                children: vec![MarkdownNode::paragraph(vec![MarkdownNode::text("q")])],
            },
            MarkdownNode::ThematicBreak,
        ];
        assert_eq!(markdown_to_blocks(&nodes).len(), 5 + 3);
    }

    #[test]
    fn ordered_numbering_is_positional() {
        let nodes = parse_markdown("3. c\n4. d\n5. e\n").unwrap();
        let markers: Vec<String> = markdown_to_blocks(&nodes)
            .iter()
            .map(|b| b.runs()[0].text.clone())
            .collect();
        assert_eq!(markers, vec!["1. ", "2. ", "3. "]);
    }

    #[test]
    fn nested_list_is_flattened_into_item_text() {
        let nodes = parse_markdown("- outer\n  - inner one\n  - inner two\n- next\n").unwrap();
        let blocks = markdown_to_blocks(&nodes);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].runs()[1].text, "outerinner oneinner two");
        assert_eq!(blocks[1].runs()[1].text, "next");
    }

    #[test]
    fn strong_discards_inner_emphasis() {
        let node = strong(vec![
            MarkdownNode::text("very "),
            emphasis(vec![MarkdownNode::text("important")]),
        ]);
        let runs = inline_runs(&node);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "very important");
        assert!(runs[0].bold);
        assert!(!runs[0].italic);
    }

    #[test]
    fn link_keeps_display_text_only() {
        let node = MarkdownNode::Link {
            url: "https://classroom.google.com".into(),
            children: vec![MarkdownNode::text("Classroom")],
        };
        let runs = inline_runs(&node);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Classroom");
        assert!(runs[0].underline);
        assert_eq!(runs[0].color.as_deref(), Some(LINK_COLOR));
    }

    #[test]
    fn inline_code_run() {
        let runs = inline_runs(&MarkdownNode::InlineCode {
            value: "Vec<T>".into(),
        });
        assert!(runs[0].monospace);
        assert_eq!(runs[0].size, INLINE_CODE_SIZE);
        assert!(INLINE_CODE_SIZE < BODY_SIZE);
    }

    #[test]
    fn paragraph_mixes_inline_runs() {
        let nodes = parse_markdown("Use `Rc` for **shared** ownership.").unwrap();
        let blocks = markdown_to_blocks(&nodes);
        let texts: Vec<&str> = blocks[0].runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Use ", "Rc", " for ", "shared", " ownership."]);
        assert!(blocks[0].runs()[1].monospace);
        assert!(blocks[0].runs()[3].bold);
    }

    #[test]
    fn blockquote_is_italic_with_border() {
        let nodes = parse_markdown("> quoted **text**").unwrap();
        let blocks = markdown_to_blocks(&nodes);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs()[0].text, "quoted text");
        assert!(blocks[0].runs()[0].italic);
        assert!(blocks[0].border_left.is_some());
    }

    #[test]
    fn thematic_break_is_centered_rule() {
        let blocks = markdown_to_blocks(&[MarkdownNode::ThematicBreak]);
        assert_eq!(blocks[0].text(), "_".repeat(RULE_WIDTH));
        assert_eq!(blocks[0].alignment, crate::document::model::Alignment::Center);
    }

    #[test]
    fn conversion_is_repeatable() {
        let nodes = parse_markdown(
            "# H\n\npara *em*\n\n1. a\n2. b\n\n```\ncode\n```\n\n> q\n\n---\n\n| t |\n|---|\n| 1 |\n",
        )
        .unwrap();
        assert_eq!(markdown_to_blocks(&nodes), markdown_to_blocks(&nodes));
    }

    #[test]
    fn pathological_nesting_does_not_panic() {
        let mut node = MarkdownNode::text("deep");
        for _ in 0..(MAX_NESTING_DEPTH * 2) {
            node = MarkdownNode::Other {
                kind: "wrapper".into(),
                value: None,
                children: vec![node],
            };
        }
        let para = MarkdownNode::paragraph(vec![node.clone()]);
        let blocks = markdown_to_blocks(&[para]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].runs().len(), 1);
        assert_eq!(flatten_text(&node), "");
    }

    #[test]
    fn top_level_text_falls_back_to_plain_block() {
        let blocks = markdown_to_blocks(&[MarkdownNode::text("loose")]);
        assert_eq!(blocks[0].runs(), &[StyledRun::plain("loose")]);
    }
}
