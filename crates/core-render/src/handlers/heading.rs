//! Heading handler (spec §4.4 Heading (h1..h6)).

use core_host::Point;
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{HEADING_COLOR, HEADING_LEVELS};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;

pub struct HeadingHandler;

impl RenderHandler for HeadingHandler {
    fn can_render(&self, node: &Node) -> bool {
        matches!(node.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let level = node
            .tag
            .as_bytes()
            .get(1)
            .map(|b| (b - b'1') as usize)
            .unwrap_or(0)
            .min(HEADING_LEVELS.len() - 1);
        let (size, before, after) = HEADING_LEVELS[level];

        let text = node.text_content();
        if text.is_empty() {
            return RenderResult::unchanged(ctx);
        }

        let font = services.font("arial", size);
        let y = ctx.y + before;
        draw_text_dual_path(
            services,
            "arial",
            font,
            &text,
            Point::new(ctx.x + ctx.indent, y),
            HEADING_COLOR,
        );

        RenderResult {
            next_y: y + size * 1.2 + after,
            next_x: ctx.x + ctx.indent,
            line_height: size * 1.2,
            links: Vec::new(),
        }
    }
}
