//! Markdown node tree consumed by the block converter.
//!
//! The `markdown` crate parses solution text into an `mdast` tree with some
//! forty node kinds. The converter only styles twelve of them, so the tree is
//! lowered once into [`MarkdownNode`]: the twelve recognised kinds become
//! their own variants and everything else lands in [`MarkdownNode::Other`],
//! keeping its raw `value` (if any) and its lowered children. The converter
//! then matches exhaustively with a single fallback arm.

use crate::error::SolveError;
use ::markdown::mdast;
use ::markdown::ParseOptions;

/// One node of a parsed markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownNode {
    Text {
        value: String,
    },
    Heading {
        depth: u8,
        children: Vec<MarkdownNode>,
    },
    /// `value` is only set by callers building trees by hand; the parser
    /// always produces children.
    Paragraph {
        children: Vec<MarkdownNode>,
        value: Option<String>,
    },
    List {
        ordered: bool,
        children: Vec<MarkdownNode>,
    },
    ListItem {
        children: Vec<MarkdownNode>,
    },
    Code {
        value: String,
        lang: Option<String>,
    },
    InlineCode {
        value: String,
    },
    Strong {
        children: Vec<MarkdownNode>,
    },
    Emphasis {
        children: Vec<MarkdownNode>,
    },
    Link {
        url: String,
        children: Vec<MarkdownNode>,
    },
    Blockquote {
        children: Vec<MarkdownNode>,
    },
    ThematicBreak,
    /// Any kind outside the set above (tables, images, html, math, ...).
    Other {
        kind: String,
        value: Option<String>,
        children: Vec<MarkdownNode>,
    },
}

impl MarkdownNode {
    pub fn text(value: impl Into<String>) -> Self {
        MarkdownNode::Text {
            value: value.into(),
        }
    }

    pub fn paragraph(children: Vec<MarkdownNode>) -> Self {
        MarkdownNode::Paragraph {
            children,
            value: None,
        }
    }

    pub fn heading(depth: u8, children: Vec<MarkdownNode>) -> Self {
        MarkdownNode::Heading { depth, children }
    }

    pub fn list(ordered: bool, children: Vec<MarkdownNode>) -> Self {
        MarkdownNode::List { ordered, children }
    }

    pub fn code(value: impl Into<String>) -> Self {
        MarkdownNode::Code {
            value: value.into(),
            lang: None,
        }
    }

    pub fn other(kind: impl Into<String>, value: Option<&str>) -> Self {
        MarkdownNode::Other {
            kind: kind.into(),
            value: value.map(str::to_string),
            children: Vec::new(),
        }
    }

    /// The mdast-style kind name, e.g. `"inlineCode"`.
    pub fn kind(&self) -> &str {
        match self {
            MarkdownNode::Text { .. } => "text",
            MarkdownNode::Heading { .. } => "heading",
            MarkdownNode::Paragraph { .. } => "paragraph",
            MarkdownNode::List { .. } => "list",
            MarkdownNode::ListItem { .. } => "listItem",
            MarkdownNode::Code { .. } => "code",
            MarkdownNode::InlineCode { .. } => "inlineCode",
            MarkdownNode::Strong { .. } => "strong",
            MarkdownNode::Emphasis { .. } => "emphasis",
            MarkdownNode::Link { .. } => "link",
            MarkdownNode::Blockquote { .. } => "blockquote",
            MarkdownNode::ThematicBreak => "thematicBreak",
            MarkdownNode::Other { kind, .. } => kind,
        }
    }

    /// Raw string payload of leaf nodes.
    pub fn value(&self) -> Option<&str> {
        match self {
            MarkdownNode::Text { value }
            | MarkdownNode::Code { value, .. }
            | MarkdownNode::InlineCode { value } => Some(value),
            MarkdownNode::Paragraph { value, .. } | MarkdownNode::Other { value, .. } => {
                value.as_deref()
            }
            _ => None,
        }
    }

    /// Ordered children of container nodes; empty for leaves.
    pub fn children(&self) -> &[MarkdownNode] {
        match self {
            MarkdownNode::Heading { children, .. }
            | MarkdownNode::Paragraph { children, .. }
            | MarkdownNode::List { children, .. }
            | MarkdownNode::ListItem { children }
            | MarkdownNode::Strong { children }
            | MarkdownNode::Emphasis { children }
            | MarkdownNode::Link { children, .. }
            | MarkdownNode::Blockquote { children }
            | MarkdownNode::Other { children, .. } => children,
            MarkdownNode::Text { .. }
            | MarkdownNode::Code { .. }
            | MarkdownNode::InlineCode { .. }
            | MarkdownNode::ThematicBreak => &[],
        }
    }
}

/// Parse markdown (GFM flavour) into its top-level nodes.
pub fn parse_markdown(source: &str) -> Result<Vec<MarkdownNode>, SolveError> {
    let root = ::markdown::to_mdast(source, &ParseOptions::gfm())
        .map_err(|e| SolveError::MarkdownParse(e.to_string()))?;

    Ok(match root {
        mdast::Node::Root(root) => lower_all(&root.children),
        other => vec![lower(&other)],
    })
}

fn lower_all(nodes: &[mdast::Node]) -> Vec<MarkdownNode> {
    nodes.iter().map(lower).collect()
}

fn lower(node: &mdast::Node) -> MarkdownNode {
    use mdast::Node;

    match node {
        Node::Text(t) => MarkdownNode::text(t.value.clone()),
        Node::Heading(h) => MarkdownNode::heading(h.depth, lower_all(&h.children)),
        Node::Paragraph(p) => MarkdownNode::paragraph(lower_all(&p.children)),
        // `start` is dropped: numbering is positional.
        Node::List(l) => MarkdownNode::list(l.ordered, lower_all(&l.children)),
        Node::ListItem(li) => MarkdownNode::ListItem {
            children: lower_all(&li.children),
        },
        Node::Code(c) => MarkdownNode::Code {
            value: c.value.clone(),
            lang: c.lang.clone(),
        },
        Node::InlineCode(c) => MarkdownNode::InlineCode {
            value: c.value.clone(),
        },
        Node::Strong(s) => MarkdownNode::Strong {
            children: lower_all(&s.children),
        },
        Node::Emphasis(e) => MarkdownNode::Emphasis {
            children: lower_all(&e.children),
        },
        Node::Link(l) => MarkdownNode::Link {
            url: l.url.clone(),
            children: lower_all(&l.children),
        },
        Node::Blockquote(b) => MarkdownNode::Blockquote {
            children: lower_all(&b.children),
        },
        Node::ThematicBreak(_) => MarkdownNode::ThematicBreak,
        Node::Break(_) => MarkdownNode::other("break", Some("\n")),
        Node::Html(h) => MarkdownNode::other("html", Some(&h.value)),
        Node::InlineMath(m) => MarkdownNode::other("inlineMath", Some(&m.value)),
        Node::Math(m) => MarkdownNode::other("math", Some(&m.value)),
        Node::Yaml(y) => MarkdownNode::other("yaml", Some(&y.value)),
        Node::Toml(t) => MarkdownNode::other("toml", Some(&t.value)),
        Node::Image(i) => MarkdownNode::other("image", Some(&i.alt)),
        Node::ImageReference(i) => MarkdownNode::other("imageReference", Some(&i.alt)),
        other => MarkdownNode::Other {
            kind: other_kind(other).to_string(),
            value: None,
            children: other.children().map(|c| lower_all(c)).unwrap_or_default(),
        },
    }
}

fn other_kind(node: &mdast::Node) -> &'static str {
    use mdast::Node;

    match node {
        Node::Table(_) => "table",
        Node::TableRow(_) => "tableRow",
        Node::TableCell(_) => "tableCell",
        Node::Delete(_) => "delete",
        Node::LinkReference(_) => "linkReference",
        Node::FootnoteDefinition(_) => "footnoteDefinition",
        Node::FootnoteReference(_) => "footnoteReference",
        Node::Definition(_) => "definition",
        _ => "unknown",
    }
}
