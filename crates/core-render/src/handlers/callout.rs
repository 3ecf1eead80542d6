//! Callout / generic div handler (spec §4.4 Callout). A `div` whose
//! `class` attribute contains one of `note|warning|tip|info|danger|success`
//! renders as a bordered callout box; any other `div` is a transparent
//! container that simply dispatches its children (spec §6: "`class` on
//! `div` (for callouts)" — no callout keyword, no special treatment).
//!
//! Resolved Open Question (spec §9): the measurement pass is **not**
//! memoized — the body is flattened and laid out once to size the box
//! (through a non-drawing painter stand-in, `with_measuring_painter`) and
//! a second time to paint it, exactly as the source does. Only the paint
//! pass's link list is kept, so the two passes cannot double-count link
//! rectangles.

use core_host::{Color, Point, Rect};
use core_model::{Node, RenderContext, RenderResult};

use crate::constants::{CALLOUT_BORDER, CALLOUT_BOTTOM_GAP, CALLOUT_INDENT, CALLOUT_PADDING};
use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::handlers::paragraph::{measure_flattened_height, render_flattened, INHERITED_STEM};
use crate::wrap::flatten;

const CALLOUT_KEYWORDS: [&str; 6] = ["note", "warning", "tip", "info", "danger", "success"];

struct CalloutStyle {
    background: Color,
    accent: Color,
    text: Color,
    icon: &'static str,
}

fn style_for(keyword: &str) -> CalloutStyle {
    match keyword {
        "warning" => CalloutStyle {
            background: Color::rgb(255, 244, 214),
            accent: Color::rgb(204, 142, 0),
            text: Color::rgb(102, 71, 0),
            icon: "!",
        },
        "danger" => CalloutStyle {
            background: Color::rgb(253, 226, 226),
            accent: Color::rgb(197, 48, 48),
            text: Color::rgb(120, 30, 30),
            icon: "\u{2716}",
        },
        "success" => CalloutStyle {
            background: Color::rgb(224, 247, 232),
            accent: Color::rgb(39, 145, 78),
            text: Color::rgb(20, 90, 50),
            icon: "\u{2714}",
        },
        "tip" => CalloutStyle {
            background: Color::rgb(232, 244, 253),
            accent: Color::rgb(30, 120, 200),
            text: Color::rgb(15, 70, 120),
            icon: "\u{2605}",
        },
        "info" => CalloutStyle {
            background: Color::rgb(235, 235, 250),
            accent: Color::rgb(90, 90, 200),
            text: Color::rgb(50, 50, 120),
            icon: "i",
        },
        _ => CalloutStyle {
            background: Color::rgb(240, 240, 240),
            accent: Color::rgb(120, 120, 120),
            text: Color::rgb(60, 60, 60),
            icon: "\u{2022}",
        },
    }
}

fn keyword_in_class(class: &str) -> Option<&'static str> {
    CALLOUT_KEYWORDS.into_iter().find(|k| class.contains(k))
}

pub struct CalloutOrDivHandler;

impl RenderHandler for CalloutOrDivHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "div"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let class = node.attr("class").unwrap_or("");
        let Some(keyword) = keyword_in_class(class) else {
            let engine = services.engine;
            return engine.render_children(node, ctx, services);
        };
        let style = style_for(keyword);

        let body_indent = ctx.indent + CALLOUT_INDENT;
        let body_ctx = RenderContext {
            x: ctx.x,
            y: ctx.y + CALLOUT_PADDING,
            width: ctx.width,
            current_x: ctx.x + body_indent,
            parent_font: ctx.parent_font,
            parent_color: style.text,
            indent: body_indent,
        };
        let mut pieces = Vec::new();
        flatten(
            node,
            INHERITED_STEM,
            ctx.parent_font,
            style.text,
            false,
            false,
            &mut pieces,
        );
        if pieces.is_empty() {
            return RenderResult::unchanged(ctx);
        }

        // Pass 1: measure.
        let box_height = measure_flattened_height(&pieces, &body_ctx, services) + CALLOUT_PADDING * 2.0;

        let box_rect = Rect::new(ctx.x + ctx.indent, ctx.y, ctx.content_width(), box_height);
        services.painter.fill_rect(box_rect, style.background);
        services.painter.fill_rect(
            Rect::new(box_rect.x, box_rect.y, CALLOUT_BORDER, box_height),
            style.accent,
        );
        services.painter.stroke_rect(box_rect, 1.0, style.accent);

        let icon_font = services.font("arial-bold", ctx.parent_font.size);
        draw_text_dual_path(
            services,
            "arial-bold",
            icon_font,
            style.icon,
            Point::new(box_rect.x + CALLOUT_PADDING, box_rect.y + CALLOUT_PADDING),
            style.accent,
        );

        // Pass 2: paint, independent of pass 1's line data.
        let result = render_flattened(&pieces, &body_ctx, services);

        RenderResult {
            next_y: ctx.y + box_height + CALLOUT_BOTTOM_GAP,
            next_x: ctx.x + ctx.indent,
            line_height: box_height,
            links: result.links,
        }
    }
}
