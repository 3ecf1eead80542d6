//! Link handler (spec §4.4 Link (a)).

use core_host::{Point, Rect};
use core_model::{Context, LinkRect, Node, RenderContext, RenderResult};

use crate::constants::LINK_COLOR;
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;

pub struct LinkHandler;

impl RenderHandler for LinkHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "a"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let href = node.attr("href").unwrap_or("").to_string();
        let text = node.text_content();
        if text.is_empty() {
            return RenderResult::unchanged(ctx);
        }

        let font = ctx.parent_font;
        let origin = Point::new(ctx.current_x, ctx.y);
        let advance = draw_text_dual_path(services, "inherited", font, &text, origin, LINK_COLOR);

        let baseline_y = ctx.y + font.size;
        services.painter.line(
            Point::new(ctx.current_x, baseline_y),
            Point::new(ctx.current_x + advance, baseline_y),
            1.0,
            LINK_COLOR,
        );

        let bounds = Rect::new(ctx.current_x, ctx.y, advance, font.size);
        let links = vec![LinkRect::new(bounds, href)];

        match node.context {
            Context::Inline => RenderResult {
                next_y: ctx.y,
                next_x: ctx.current_x + advance,
                line_height: font.size * 1.2,
                links,
            },
            _ => RenderResult {
                next_y: ctx.y + font.size * 1.2,
                next_x: ctx.x + ctx.indent,
                line_height: font.size * 1.2,
                links,
            },
        }
    }
}
