//! Document tree and rendering-context types (spec §3, §4.5).
//!
//! Invariants (enforced by the parser, relied on everywhere else in the
//! workspace — see spec §3/§8):
//! * A text node never has children.
//! * An element's `context` is fixed at parse time by its tag and its
//!   parent's context and is never mutated afterward.
//! * Children of `p` and `li` are always `Context::Inline`, regardless of
//!   their tag's default, so inline formatting flows uniformly inside
//!   paragraphs and list items.
//!
//! The tree carries no parent back-pointers (spec §9: arena/back-pointer
//! avoidance). Parent context is threaded top-down through `RenderContext`
//! during layout instead of stored on the node.

use core_host::{Color, FontHandle, Rect};
use std::collections::HashMap;

/// Tags that are recognized as container elements (spec §6). Anything else
/// becomes a generic element node and renders as plain text via the Text
/// handler fallback.
pub const CONTAINER_TAGS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "a", "b", "i", "strong",
    "em", "span", "pre", "code", "dl", "dt", "dd", "table", "thead", "tbody", "tr", "th", "td",
];

/// Self-closing/void tags (spec §6): create a node but never push to the
/// parser stack.
pub const VOID_TAGS: &[&str] = &["br", "hr"];

/// Tags that receive `Context::Block` when their parent is `Block` or
/// `Root` (spec §3).
pub const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "pre", "hr", "table",
    "thead", "tbody", "tr",
];

/// Tags whose direct children are always `Context::Inline` regardless of
/// the child's own tag default (spec §3).
pub const FORCES_INLINE_CHILDREN: &[&str] = &["p", "li"];

/// Formatting tags normalized at parse time into `span` + a style
/// attribute (spec §3, §4.3).
pub const NORMALIZED_FORMATTING_TAGS: &[&str] = &["b", "i", "strong", "em"];

/// Tags whose text content is captured into `Metadata` instead of becoming
/// a renderable node (spec SPEC_FULL §3 supplement).
pub const METADATA_TAGS: &[&str] = &["title", "meta", "style", "script"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Element,
    DocumentRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Root,
    Block,
    Inline,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub tag: String,
    pub content: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Node>,
    pub context: Context,
}

impl Node {
    pub fn text(content: impl Into<String>, context: Context) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: String::new(),
            content: content.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context,
        }
    }

    pub fn element(tag: impl Into<String>, context: Context) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into(),
            content: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context,
        }
    }

    pub fn root() -> Self {
        Self {
            kind: NodeKind::DocumentRoot,
            tag: String::new(),
            content: String::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
            context: Context::Root,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenate the text of all descendant Text nodes, depth-first —
    /// used by handlers (link, heading, dt) that render their children's
    /// text as a single run.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.kind {
            NodeKind::Text => out.push_str(&self.content),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Block-context rule from spec §3: a tag in `BLOCK_TAGS` becomes
    /// `Block` when the parent is `Block` or `Root`; everything else
    /// (including block tags inside an inline parent, and any tag whose
    /// parent forces inline children) is `Inline`.
    pub fn context_for(tag: &str, parent_context: Context) -> Context {
        if matches!(parent_context, Context::Block | Context::Root) && BLOCK_TAGS.contains(&tag) {
            Context::Block
        } else {
            Context::Inline
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub meta: Vec<(String, String)>,
    pub style_blocks: Vec<String>,
    pub script_blocks: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub root: Node,
    pub metadata: Metadata,
}

impl Document {
    pub fn empty() -> Self {
        Self {
            root: Node::root(),
            metadata: Metadata::default(),
        }
    }
}

/// A resolved font + size pair threaded through rendering; the opaque
/// `FontHandle` comes from `core-fonts::Provider`, the engine itself never
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub handle: FontHandle,
    pub size: f32,
}

/// A link hit rectangle in document space (spec §3). Rebuilt every render
/// pass; `hover` is filled in by the viewport controller, never by a
/// render handler.
#[derive(Debug, Clone)]
pub struct LinkRect {
    pub bounds: Rect,
    pub url: String,
    pub hover: bool,
}

impl LinkRect {
    pub fn new(bounds: Rect, url: impl Into<String>) -> Self {
        Self {
            bounds,
            url: url.into(),
            hover: false,
        }
    }
}

/// Cursor + inherited state threaded top-down through the layout walk
/// (spec §4.5). `current_x` is seeded to `x` at the start of each
/// block-level handler and advanced by inline handlers; `y` is the only
/// field every handler must advance before returning.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub current_x: f32,
    pub parent_font: Font,
    pub parent_color: Color,
    pub indent: f32,
}

impl RenderContext {
    pub fn new(x: f32, y: f32, width: f32, default_font: Font) -> Self {
        Self {
            x,
            y,
            width,
            current_x: x,
            parent_font: default_font,
            parent_color: Color::BLACK,
            indent: 0.0,
        }
    }

    /// A child context seeded for a fresh block: `current_x` reset to the
    /// left edge plus the accumulated indent.
    pub fn seed_block(&self, y: f32) -> Self {
        Self {
            x: self.x,
            y,
            width: self.width,
            current_x: self.x + self.indent,
            parent_font: self.parent_font,
            parent_color: self.parent_color,
            indent: self.indent,
        }
    }

    pub fn content_width(&self) -> f32 {
        (self.width - self.indent).max(0.0)
    }
}

/// Outcome of rendering one node (spec §4.4): the advanced cursors, the
/// line height consumed, and any link rectangles discovered in the
/// subtree. Handlers that cannot compute anything meaningful (spec §4.4
/// failure semantics) return `RenderResult::unchanged(ctx)`.
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    pub next_y: f32,
    pub next_x: f32,
    pub line_height: f32,
    pub links: Vec<LinkRect>,
}

impl RenderResult {
    pub fn unchanged(ctx: &RenderContext) -> Self {
        Self {
            next_y: ctx.y,
            next_x: ctx.current_x,
            line_height: 0.0,
            links: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tag_under_root_is_block() {
        assert_eq!(Node::context_for("p", Context::Root), Context::Block);
        assert_eq!(Node::context_for("div", Context::Block), Context::Block);
    }

    #[test]
    fn block_tag_under_inline_parent_is_inline() {
        assert_eq!(Node::context_for("div", Context::Inline), Context::Inline);
    }

    #[test]
    fn non_block_tag_is_always_inline() {
        assert_eq!(Node::context_for("span", Context::Root), Context::Inline);
        assert_eq!(Node::context_for("a", Context::Block), Context::Inline);
    }

    #[test]
    fn text_content_concatenates_depth_first() {
        let mut p = Node::element("p", Context::Block);
        p.children.push(Node::text("Hello ", Context::Inline));
        let mut span = Node::element("span", Context::Inline);
        span.children.push(Node::text("bold", Context::Inline));
        p.children.push(span);
        p.children.push(Node::text(" world", Context::Inline));
        assert_eq!(p.text_content(), "Hello bold world");
    }
}
