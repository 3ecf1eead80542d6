//! Break handler (spec §4.4 Break (br)).

use core_model::{Node, RenderContext, RenderResult};

use crate::constants::BR_ADVANCE;
use crate::draw::Services;
use crate::engine::RenderHandler;

pub struct BrHandler;

impl RenderHandler for BrHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "br"
    }

    fn render(&self, _node: &Node, ctx: &RenderContext, _services: &mut Services) -> RenderResult {
        RenderResult {
            next_y: ctx.y + BR_ADVANCE,
            next_x: ctx.x + ctx.indent,
            line_height: BR_ADVANCE,
            links: Vec::new(),
        }
    }
}
