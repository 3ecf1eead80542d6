//! Text handler (spec §4.4 Text): applies to text nodes and to any
//! unrecognized tag — the dispatcher's fallback (`crate::engine::Engine`).

use core_host::{Point, Rect};
use core_model::{LinkRect, Node, NodeKind, RenderContext, RenderResult};

use crate::draw::{draw_text_dual_path, Services};
use crate::engine::RenderHandler;
use crate::style::Segment;
use crate::wrap::wrap_segments;

/// Plain text never resolves its own font through the provider — it
/// draws with whatever handle it inherited — so the stem name here only
/// exists to give the measurement cache a stable invalidation key.
const INHERITED_STEM: &str = "inherited";

pub struct TextHandler;

impl RenderHandler for TextHandler {
    fn can_render(&self, _node: &Node) -> bool {
        true
    }

    fn render(&self, node: &Node, ctx: &RenderContext, services: &mut Services) -> RenderResult {
        let text = match node.kind {
            NodeKind::Text => node.content.clone(),
            _ => node.text_content(),
        };
        if text.is_empty() || ctx.content_width() <= 0.0 {
            return RenderResult::unchanged(ctx);
        }

        let segs = vec![Segment::text(text, INHERITED_STEM, ctx.parent_font, ctx.parent_color)];
        let lines = wrap_segments(&segs, ctx.content_width(), services);

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
        if lines.is_empty() {
            return RenderResult::unchanged(ctx);
        }
        y += crate::constants::TEXT_TRAILING_GAP;
        RenderResult {
            next_y: y,
            next_x: ctx.current_x,
            line_height: lines.last().map(|l| l.height).unwrap_or(0.0),
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use core_fonts::{MeasurementCache, Provider};
    use core_host::{Color, CursorKind, FontHandle};
    use core_model::{Context, Font};

    struct NullPainter;
    impl core_host::Painter for NullPainter {
        fn fill_rect(&mut self, _: Rect, _: Color) {}
        fn stroke_rect(&mut self, _: Rect, _: f32, _: Color) {}
        fn line(&mut self, _: Point, _: Point, _: f32, _: Color) {}
        fn draw_text(&mut self, _: FontHandle, _: &str, _: Point, _: f32, _: f32, _: Color) {}
        fn draw_codepoint(&mut self, _: FontHandle, _: char, _: Point, _: f32, _: Color) {}
        fn measure_text(&mut self, _: FontHandle, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * size * 0.5, size * 1.2)
        }
        fn set_cursor(&mut self, _: CursorKind) {}
        fn scissor(&mut self, _: Rect) {}
        fn unscissor(&mut self) {}
    }
    struct NullLoader;
    impl core_host::FontLoader for NullLoader {
        fn load(&mut self, _: &str, _: f32, _: &[char]) -> Option<FontHandle> {
            Some(FontHandle(1))
        }
        fn unload(&mut self, _: FontHandle) {}
    }

    #[test]
    fn empty_text_node_is_unchanged() {
        let mut painter = NullPainter;
        let mut loader = NullLoader;
        let provider = Provider::global();
        let mut cache = MeasurementCache::new(10);
        let engine = Engine::new();
        let mut services = Services {
            painter: &mut painter,
            loader: &mut loader,
            provider,
            cache: &mut cache,
            engine: &engine,
        };
        let node = Node::text("", Context::Inline);
        let font = Font {
            handle: FontHandle(1),
            size: 16.0,
        };
        let ctx = RenderContext::new(0.0, 0.0, 400.0, font);
        let result = TextHandler.render(&node, &ctx, &mut services);
        assert_eq!(result.next_y, 0.0);
        assert!(result.links.is_empty());
    }
}
