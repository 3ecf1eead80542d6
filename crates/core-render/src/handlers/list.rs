//! List handler (spec §4.4 List (ul/ol/li)). Not registered separately
//! for `li` — the container threads the list type and item index itself
//! (spec: "the li handler is not registered separately at the top level").

use core_host::Point;
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{LIST_BASE_INDENT, LIST_NESTED_INDENT, LIST_TOP_MARGIN, OL_MARKER_OFFSET, UL_MARKER_OFFSET, UL_MARKER_SIZE};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::handlers::paragraph::{render_flattened, INHERITED_STEM};
use crate::wrap::flatten;

pub struct ListHandler;

impl RenderHandler for ListHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "ul" || node.tag == "ol"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let ordered = node.tag == "ol";
        let nested = ctx.indent > 0.0;
        let indent = if nested {
            ctx.indent + LIST_NESTED_INDENT
        } else {
            LIST_BASE_INDENT
        };

        let mut y = ctx.y + LIST_TOP_MARGIN;
        let mut links = Vec::new();
        let marker_font = services.font("arial", UL_MARKER_SIZE);

        for (index, li) in node.children.iter().filter(|c| c.tag == "li").enumerate() {
            let li_ctx = RenderContext {
                x: ctx.x,
                y,
                width: ctx.width,
                current_x: ctx.x + indent,
                parent_font: ctx.parent_font,
                parent_color: ctx.parent_color,
                indent,
            };

            let marker = if ordered {
                format!("{}.", index + 1)
            } else {
                "\u{2022}".to_string()
            };
            let marker_x = if ordered {
                li_ctx.current_x - OL_MARKER_OFFSET
            } else {
                li_ctx.current_x - UL_MARKER_OFFSET
            };
            draw_text_dual_path(
                services,
                "arial",
                marker_font,
                &marker,
                Point::new(marker_x, y),
                ctx.parent_color,
            );

            let mut pieces = Vec::new();
            flatten(
                li,
                INHERITED_STEM,
                ctx.parent_font,
                ctx.parent_color,
                false,
                false,
                &mut pieces,
            );
            let result = render_flattened(&pieces, &li_ctx, services);
            y = result.next_y.max(y + marker_font.size * 1.2);
            links.extend(result.links);
        }

        RenderResult {
            next_y: y,
            next_x: ctx.x + ctx.indent,
            line_height: 0.0,
            links,
        }
    }
}
