//! Span handler (spec §4.4 Span). In the data model `span` is always
//! `Context::Inline` (spec §3: not a member of `BLOCK_TAGS`), so the Block
//! branch below is unreachable with the built-in parser but kept because
//! the handler registry is user-extensible (spec §4.5) and a host adding
//! its own block-context producer for `span` must see the documented
//! contract honored.

use core_host::Point;
use core_model::{Context, Node, RenderContext, RenderResult};

use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::wrap::resolve_span_style;

pub struct SpanHandler;

impl RenderHandler for SpanHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "span"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        if matches!(node.context, Context::Block) {
            let engine = services.engine;
            return engine.render_children(node, ctx, services);
        }

        let style = node.attr("style").unwrap_or("");
        let bold = style.contains("font-weight: bold");
        let italic = style.contains("font-style: italic");
        let (stem, color) = resolve_span_style(bold, italic, ctx.parent_color);
        let text = node.text_content();
        if text.is_empty() {
            return RenderResult::unchanged(ctx);
        }

        let font = services.font(stem, ctx.parent_font.size);
        let origin = Point::new(ctx.current_x, ctx.y);
        let advance = draw_text_dual_path(services, stem, font, &text, origin, color);
        RenderResult {
            next_y: ctx.y,
            next_x: ctx.current_x + advance,
            line_height: font.size * 1.2,
            links: Vec::new(),
        }
    }
}
