//! Definition list handler (spec §4.4 Definition List (dl/dt/dd)).

use core_host::Point;
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{BOLD_COLOR, DD_INDENT, DL_MARGIN};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::handlers::paragraph::{render_flattened, INHERITED_STEM};
use crate::wrap::flatten;

pub struct DlHandler;

impl RenderHandler for DlHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "dl"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let mut y = ctx.y + DL_MARGIN;
        let mut links = Vec::new();

        for child in &node.children {
            match child.tag.as_str() {
                "dt" => {
                    let text = child.text_content();
                    if !text.is_empty() {
                        let font = services.font("arial-bold", ctx.parent_font.size);
                        draw_text_dual_path(
                            services,
                            "arial-bold",
                            font,
                            &text,
                            Point::new(ctx.x + ctx.indent, y),
                            BOLD_COLOR,
                        );
                        y += font.size * 1.2;
                    }
                }
                "dd" => {
                    let indent = ctx.indent + DD_INDENT;
                    let dd_ctx = RenderContext {
                        x: ctx.x,
                        y,
                        width: ctx.width,
                        current_x: ctx.x + indent,
                        parent_font: ctx.parent_font,
                        parent_color: ctx.parent_color,
                        indent,
                    };
                    let mut pieces = Vec::new();
                    flatten(
                        child,
                        INHERITED_STEM,
                        ctx.parent_font,
                        ctx.parent_color,
                        false,
                        false,
                        &mut pieces,
                    );
                    let result = render_flattened(&pieces, &dd_ctx, services);
                    y = result.next_y;
                    links.extend(result.links);
                }
                _ => {}
            }
        }

        y += DL_MARGIN;
        RenderResult {
            next_y: y,
            next_x: ctx.x + ctx.indent,
            line_height: 0.0,
            links,
        }
    }
}
