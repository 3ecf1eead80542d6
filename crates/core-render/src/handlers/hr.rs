//! Horizontal rule handler (spec §4.4 Horizontal rule (hr)).

use core_host::Point;
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{HR_BOTTOM_GAP, HR_COLOR, HR_THICKNESS, HR_TOP_GAP};
use crate::draw::Services;
use crate::engine::RenderHandler;

pub struct HrHandler;

impl RenderHandler for HrHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "hr"
    }

    fn render(&self, _node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let y = ctx.y + HR_TOP_GAP;
        services.painter.line(
            Point::new(ctx.x + ctx.indent, y),
            Point::new(ctx.x + ctx.indent + ctx.content_width(), y),
            HR_THICKNESS,
            HR_COLOR,
        );
        RenderResult {
            next_y: y + HR_BOTTOM_GAP,
            next_x: ctx.x + ctx.indent,
            line_height: HR_TOP_GAP + HR_BOTTOM_GAP,
            links: Vec::new(),
        }
    }
}
