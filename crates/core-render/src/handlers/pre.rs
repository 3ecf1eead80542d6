//! Pre handler (spec §4.4 Pre), and its reuse by `Code` in block context.

use core_host::{Color, Point, Rect};
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{MONOSPACE_LARGE_SIZE, PRE_BACKGROUND, PRE_EXTRA, PRE_LINE_HEIGHT, PRE_PADDING};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;

pub struct PreHandler;

impl RenderHandler for PreHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "pre"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let text = node.text_content();
        if text.is_empty() {
            return RenderResult::unchanged(ctx);
        }
        let lines: Vec<&str> = text.split('\n').collect();
        let height = lines.len() as f32 * PRE_LINE_HEIGHT + PRE_EXTRA;

        let rect = Rect::new(ctx.x + ctx.indent, ctx.y, ctx.content_width(), height);
        services.painter.fill_rect(rect, PRE_BACKGROUND);

        let font = services.font("monospace", MONOSPACE_LARGE_SIZE);
        let mut y = ctx.y + PRE_PADDING;
        for line in &lines {
            draw_text_dual_path(
                services,
                "monospace",
                font,
                line,
                Point::new(ctx.x + ctx.indent + PRE_PADDING, y),
                Color::BLACK,
            );
            y += PRE_LINE_HEIGHT;
        }

        RenderResult {
            next_y: ctx.y + height,
            next_x: ctx.x + ctx.indent,
            line_height: height,
            links: Vec::new(),
        }
    }
}
