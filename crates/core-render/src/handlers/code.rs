//! Code handler (spec §4.4 Code): delegates to `Pre` in block context,
//! draws an inline padded box in inline context.

use core_host::{Color, Point, Rect};
use core_model::{Context, Node, RenderContext, RenderResult};

use crate::constants::{CODE_INLINE_PADDING, MONOSPACE_SMALL_SIZE, PRE_BACKGROUND};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::handlers::pre::PreHandler;

pub struct CodeHandler;

impl RenderHandler for CodeHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "code"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        if matches!(node.context, Context::Block) {
            return PreHandler.render(node, ctx, services);
        }

        let text = node.text_content();
        if text.is_empty() {
            return RenderResult::unchanged(ctx);
        }

        let font = services.font("monospace", MONOSPACE_SMALL_SIZE);
        let (w, h) = services.measure("monospace", font, &text);
        let rect = Rect::new(
            ctx.current_x,
            ctx.y,
            w + CODE_INLINE_PADDING * 2.0,
            h + CODE_INLINE_PADDING * 2.0,
        );
        services.painter.fill_rect(rect, PRE_BACKGROUND);
        draw_text_dual_path(
            services,
            "monospace",
            font,
            &text,
            Point::new(ctx.current_x + CODE_INLINE_PADDING, ctx.y + CODE_INLINE_PADDING),
            Color::BLACK,
        );

        RenderResult {
            next_y: ctx.y,
            next_x: ctx.current_x + w + CODE_INLINE_PADDING * 2.0,
            line_height: h + CODE_INLINE_PADDING * 2.0,
            links: Vec::new(),
        }
    }
}
