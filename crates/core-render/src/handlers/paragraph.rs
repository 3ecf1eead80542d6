//! Paragraph handler (spec §4.4 Paragraph), and the shared segment-render
//! routine reused verbatim by List, `dd`, and the Callout body (spec:
//! "applying the same segment-wrapping logic as paragraphs").

use core_host::{Point, Rect};
use core_model::{LinkRect, Node, RenderContext, RenderResult};

use crate::draw::{draw_text_dual_path, with_measuring_painter, Services};
use crate::engine::RenderHandler;
use crate::style::Segment;
use crate::wrap::{flatten, wrap_segments, FlatPiece};

/// Stem used whenever a segment inherits its font rather than resolving
/// one of its own through the provider (plain text, unstyled spans).
pub const INHERITED_STEM: &str = "inherited";

pub struct ParagraphHandler;

impl RenderHandler for ParagraphHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "p"
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let mut pieces = Vec::new();
        flatten(
            node,
            INHERITED_STEM,
            ctx.parent_font,
            ctx.parent_color,
            false,
            false,
            &mut pieces,
        );
        render_flattened(&pieces, ctx, services)
    }
}

/// Word-wrap `segs` against `ctx.content_width()` and draw each resulting
/// line, returning the advanced cursor and any link rectangles discovered.
pub fn render_segments(segs: &[Segment], ctx: &RenderContext, services: &mut Services) -> RenderResult {
    if segs.is_empty() || ctx.content_width() <= 0.0 {
        return RenderResult::unchanged(ctx);
    }

    let lines = wrap_segments(segs, ctx.content_width(), services);
    let mut y = ctx.y;
    let mut links = Vec::new();
    for line in &lines {
        let mut x = ctx.current_x;
        for piece in &line.pieces {
            let advance = draw_text_dual_path(
                services,
                &piece.stem,
                piece.font,
                &piece.text,
                Point::new(x, y),
                piece.color,
            );
            if let Some(href) = &piece.href {
                links.push(LinkRect::new(Rect::new(x, y, advance, piece.font.size), href.clone()));
            }
            x += advance;
        }
        y += line.height;
    }

    RenderResult {
        next_y: y,
        next_x: ctx.current_x,
        line_height: lines.last().map(|l| l.height).unwrap_or(0.0),
        links,
    }
}

/// Render a mix of inline segment runs and block-level children (spec
/// §4.4/§4.5): each contiguous run of [`FlatPiece::Inline`] pieces is
/// word-wrapped and painted exactly like a plain paragraph; each
/// [`FlatPiece::Block`] flushes the run built so far, then dispatches
/// through the engine at a freshly seeded block context so a nested
/// list/table/etc. renders with its own handler instead of losing its
/// structure to the inline flow. This is what `flatten`'s callers
/// (paragraph, list item, `dd`, callout body, table cell) use in place of
/// `render_segments` now that flattening can yield block pieces.
pub fn render_flattened(pieces: &[FlatPiece], ctx: &RenderContext, services: &mut Services) -> RenderResult {
    let mut y = ctx.y;
    let mut line_height = 0.0;
    let mut links = Vec::new();
    let mut run: Vec<Segment> = Vec::new();

    for piece in pieces {
        match piece {
            FlatPiece::Inline(seg) => run.push(seg.clone()),
            FlatPiece::Block(node) => {
                if !run.is_empty() {
                    let run_ctx = RenderContext { y, ..*ctx };
                    let result = render_segments(&run, &run_ctx, services);
                    y = result.next_y;
                    line_height = result.line_height;
                    links.extend(result.links);
                    run.clear();
                }
                let block_ctx = ctx.seed_block(y);
                let engine = services.engine;
                let result = engine.dispatch(*node, &block_ctx, services);
                y = result.next_y;
                line_height = result.line_height;
                links.extend(result.links);
            }
        }
    }
    if !run.is_empty() {
        let run_ctx = RenderContext { y, ..*ctx };
        let result = render_segments(&run, &run_ctx, services);
        y = result.next_y;
        line_height = result.line_height;
        links.extend(result.links);
    }

    RenderResult {
        next_y: y,
        next_x: ctx.current_x,
        line_height,
        links,
    }
}

/// Height `pieces` would consume if rendered through [`render_flattened`]
/// at `ctx`, without actually painting anything (spec §4.4 Table/Callout
/// two-pass sizing) — used to size a box or row before painting it for
/// real at its final position.
pub fn measure_flattened_height(pieces: &[FlatPiece], ctx: &RenderContext, services: &mut Services) -> f32 {
    let start_y = ctx.y;
    with_measuring_painter(services, |probe| render_flattened(pieces, ctx, probe).next_y - start_y)
}
