//! Stateless layout dispatcher (spec §4.5). Generalized from the
//! teacher's `scheduler`, which picked a render strategy from a coalesced
//! `RenderDelta`; here the dispatch key is simply the node's tag name and
//! the "strategies" are the handlers in `crate::handlers`.

use core_model::{Context, Node, NodeKind, RenderContext, RenderResult};
use core_text::split_words; // re-exported for handlers::list marker width probes
use std::collections::HashMap;

use crate::draw::Services;

/// Two-method trait per spec §9 "Polymorphic handlers": no class
/// hierarchy, one lookup per tag per render.
pub trait RenderHandler {
    fn can_render(&self, node: &Node) -> bool;
    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult;
}

/// Tag → handler registry, exposed by the widget facade for extension
/// (spec §4.5 "the widget facade exposes [it] for extension").
pub struct Engine {
    handlers: HashMap<String, Box<dyn RenderHandler>>,
    text_handler: Box<dyn RenderHandler>,
}

impl Engine {
    /// Construct the engine with the built-in handler set registered
    /// under their spec tag names (list/dl handle their own `li`/`dt`/`dd`
    /// dispatch internally, so those three tags are deliberately not
    /// registered at the top level — spec §4.4 List: "the li handler is
    /// not registered separately at the top level").
    pub fn new() -> Self {
        let mut engine = Self {
            handlers: HashMap::new(),
            text_handler: Box::new(crate::handlers::text::TextHandler),
        };
        engine.register_handler("span", Box::new(crate::handlers::span::SpanHandler));
        engine.register_handler("a", Box::new(crate::handlers::link::LinkHandler));
        for level in 1..=6 {
            engine.register_handler(
                &format!("h{level}"),
                Box::new(crate::handlers::heading::HeadingHandler),
            );
        }
        engine.register_handler("p", Box::new(crate::handlers::paragraph::ParagraphHandler));
        engine.register_handler("ul", Box::new(crate::handlers::list::ListHandler));
        engine.register_handler("ol", Box::new(crate::handlers::list::ListHandler));
        engine.register_handler("hr", Box::new(crate::handlers::hr::HrHandler));
        engine.register_handler("br", Box::new(crate::handlers::br::BrHandler));
        engine.register_handler("pre", Box::new(crate::handlers::pre::PreHandler));
        engine.register_handler("code", Box::new(crate::handlers::code::CodeHandler));
        engine.register_handler("dl", Box::new(crate::handlers::dl::DlHandler));
        engine.register_handler("div", Box::new(crate::handlers::callout::CalloutOrDivHandler));
        engine.register_handler("table", Box::new(crate::handlers::table::TableHandler));
        engine
    }

    pub fn register_handler(&mut self, tag: &str, handler: Box<dyn RenderHandler>) {
        self.handlers.insert(tag.to_string(), handler);
    }

    /// Walk `root`'s children, dispatching each to its handler (fallback =
    /// Text handler) and accumulating `ctx.y`/link rectangles (spec §4.5).
    pub fn render_document(
        &self,
        root: &Node,
        ctx: RenderContext,
        services: &mut Services,
    ) -> RenderResult {
        self.render_children(root, &ctx, services)
    }

    pub fn render_children(
        &self,
        node: &Node,
        ctx: &RenderContext,
        services: &mut Services,
    ) -> RenderResult {
        let mut cursor = *ctx;
        let mut result = RenderResult {
            next_y: ctx.y,
            next_x: ctx.current_x,
            line_height: 0.0,
            links: Vec::new(),
        };
        for child in &node.children {
            let child_ctx = cursor.seed_block(cursor.y);
            let outcome = self.dispatch(child, &child_ctx, services);
            cursor.y = outcome.next_y;
            cursor.current_x = outcome.next_x;
            result.next_y = outcome.next_y;
            result.next_x = outcome.next_x;
            result.line_height = outcome.line_height;
            result.links.extend(outcome.links);
        }
        result
    }

    /// Dispatch a single node to its handler (fallback = Text handler).
    /// Public so a flattened inline run (spec §4.4) can hand a
    /// block-level child it encounters back to the registry instead of
    /// folding it into plain text — see `crate::wrap::FlatPiece::Block`.
    pub fn dispatch(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        if matches!(node.kind, NodeKind::Text) {
            return self.text_handler.render(node, ctx, services);
        }
        let handler = self
            .handlers
            .get(node.tag.as_str())
            .unwrap_or(&self.text_handler);
        handler.render(node, ctx, services)
    }

    /// Re-dispatch `node`'s children with `ctx` seeded for inline flow
    /// (used by `Span` in block context, spec §4.4 Span: "recursively
    /// dispatches children in a freshly seeded child context").
    pub fn render_inline_children(
        &self,
        node: &Node,
        ctx: &RenderContext,
        services: &mut Services,
    ) -> RenderResult {
        debug_assert!(matches!(node.context, Context::Inline) || node.children.iter().all(|c| matches!(c.context, Context::Inline)));
        self.render_children(node, ctx, services)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Used by handlers that need to probe a single word's width without a
/// full segment flatten (list markers).
pub fn first_word(text: &str) -> Option<String> {
    split_words(text).into_iter().next()
}
