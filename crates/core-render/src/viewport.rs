//! Viewport controller (spec §4.6): per-frame scroll/hover/click handling
//! plus the render flow that seeds the Layout Engine and paints the
//! scrollbar. Generalized from the teacher's `Viewport` (a plain
//! `first_line`/`height` window into a line buffer with a stubbed
//! `clamp_cursor_into_view`) into the float document-space scroll model
//! spec §4.6 requires; the teacher's "adjust to keep something visible"
//! shape survives as the wheel-delta clamp below.

use core_host::{Color, CursorKind, Input, Painter, Rect};
use core_model::{LinkRect, Node, RenderContext};

use crate::draw::Services;
use crate::engine::Engine;

const SCROLLBAR_TRACK_WIDTH: f32 = 10.0;
const SCROLLBAR_MIN_THUMB: f32 = 40.0;
const SCROLLBAR_ALPHA_SCALE: f32 = 120.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub scroll_y: f32,
    /// Reserved for smoothing (spec §4.6); held but not animated towards —
    /// no frame path currently diverges `scroll_y` from it.
    pub target_scroll_y: f32,
    pub total_height: f32,
    pub widget_height: f32,
    pub scrollbar_alpha: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            target_scroll_y: 0.0,
            total_height: 0.0,
            widget_height: 0.0,
            scrollbar_alpha: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    fn max_scroll(&self) -> f32 {
        (self.total_height - self.widget_height).max(0.0)
    }

    /// Per-frame control flow (spec §4.6 steps 1-3). `links` is the
    /// document-space hit list produced by the previous `render` call;
    /// hover flags are recomputed in place. `on_link_click` fires
    /// synchronously on a left click while hovering.
    pub fn update(
        &mut self,
        input: &dyn Input,
        painter: &mut dyn Painter,
        links: &mut [LinkRect],
        wheel_scroll_unit: f32,
        mut on_link_click: impl FnMut(&str),
    ) {
        painter.set_cursor(CursorKind::Default);

        self.scroll_y -= input.wheel_delta() * wheel_scroll_unit;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
        self.target_scroll_y = self.scroll_y;

        let mouse = input.mouse_position();
        let mut hovering_url: Option<String> = None;
        for link in links.iter_mut() {
            let screen_bounds = link.bounds.translated(0.0, -self.scroll_y);
            link.hover = screen_bounds.contains(mouse);
            if link.hover {
                hovering_url = Some(link.url.clone());
            }
        }

        if hovering_url.is_some() {
            painter.set_cursor(CursorKind::Pointer);
        }

        if input.left_button_pressed() {
            if let Some(url) = hovering_url {
                on_link_click(&url);
            }
        }
    }

    /// Per-frame render flow (spec §4.6 render steps 1-8). Returns the
    /// link rectangles discovered this pass, already converted back to
    /// document space (step 6).
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        engine: &Engine,
        root: &Node,
        services: &mut Services,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        margin: f32,
        border: f32,
        padding: f32,
    ) -> Vec<LinkRect> {
        self.widget_height = height;

        let widget_rect = Rect::new(x, y, width, height);
        services.painter.fill_rect(widget_rect, Color::WHITE);
        services.painter.stroke_rect(widget_rect, border, Color::GRAY);
        services.painter.scissor(widget_rect);

        let chrome = margin + padding;
        let content_x = x + chrome;
        let content_y = y + chrome - self.scroll_y;
        let content_width = (width - 2.0 * chrome).max(0.0);

        let default_font = services.font("arial", crate::constants::DEFAULT_FONT_SIZE);
        let ctx = RenderContext::new(content_x, content_y, content_width, default_font);
        let result = engine.render_document(root, ctx, services);

        self.total_height = result.next_y + self.scroll_y - content_y + 2.0 * chrome;

        let links: Vec<LinkRect> = result
            .links
            .into_iter()
            .map(|mut l| {
                l.bounds = l.bounds.translated(0.0, self.scroll_y);
                l
            })
            .collect();

        services.painter.unscissor();

        if self.total_height > self.widget_height {
            self.draw_scrollbar(services.painter, x, y, width, height, margin);
        }

        links
    }

    fn draw_scrollbar(&self, painter: &mut dyn Painter, x: f32, y: f32, width: f32, height: f32, margin: f32) {
        let track = Rect::new(x + width - margin - SCROLLBAR_TRACK_WIDTH, y, SCROLLBAR_TRACK_WIDTH, height);
        painter.fill_rect(track, Color::rgba(200, 200, 200, 80));

        let thumb_height = (0.8 * height).min(0.2 * height).max(SCROLLBAR_MIN_THUMB);
        let scrollable = self.max_scroll().max(1.0);
        let progress = (self.scroll_y / scrollable).clamp(0.0, 1.0);
        let thumb_y = y + progress * (height - thumb_height);
        let alpha = (self.scrollbar_alpha * SCROLLBAR_ALPHA_SCALE).clamp(0.0, 255.0) as u8;

        let thumb = Rect::new(track.x, thumb_y, SCROLLBAR_TRACK_WIDTH, thumb_height);
        painter.fill_rect(thumb, Color::rgba(90, 90, 90, alpha));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_host::Point;

    struct FakeInput {
        wheel: f32,
        mouse: Point,
        left: bool,
    }
    impl Input for FakeInput {
        fn mouse_position(&self) -> Point {
            self.mouse
        }
        fn wheel_delta(&self) -> f32 {
            self.wheel
        }
        fn left_button_pressed(&self) -> bool {
            self.left
        }
    }
    struct NullPainter;
    impl Painter for NullPainter {
        fn fill_rect(&mut self, _: Rect, _: Color) {}
        fn stroke_rect(&mut self, _: Rect, _: f32, _: Color) {}
        fn line(&mut self, _: core_host::Point, _: core_host::Point, _: f32, _: Color) {}
        fn draw_text(&mut self, _: core_host::FontHandle, _: &str, _: core_host::Point, _: f32, _: f32, _: Color) {}
        fn draw_codepoint(&mut self, _: core_host::FontHandle, _: char, _: core_host::Point, _: f32, _: Color) {}
        fn measure_text(&mut self, _: core_host::FontHandle, _: &str, size: f32) -> (f32, f32) {
            (0.0, size)
        }
        fn set_cursor(&mut self, _: CursorKind) {}
        fn scissor(&mut self, _: Rect) {}
        fn unscissor(&mut self) {}
    }

    fn viewport_at(total_height: f32, widget_height: f32) -> Viewport {
        Viewport {
            scroll_y: 0.0,
            target_scroll_y: 0.0,
            total_height,
            widget_height,
            scrollbar_alpha: 1.0,
        }
    }

    /// Spec §8 scenario 6: wheel deltas summing to -100, +1000, -10000
    /// against total_height=2000, widget_height=500 leave scroll_y at
    /// 1500 (clamped), 0, and 1500 respectively.
    #[test]
    fn scroll_clamps_to_document_bounds() {
        let mut vp = viewport_at(2000.0, 500.0);
        let mut painter = NullPainter;
        let mut links: Vec<LinkRect> = Vec::new();

        let mut input = FakeInput {
            wheel: -100.0,
            mouse: Point::new(0.0, 0.0),
            left: false,
        };
        vp.update(&input, &mut painter, &mut links, 1.0, |_| {});
        assert_eq!(vp.scroll_y, 100.0);

        input.wheel = 1000.0;
        vp.update(&input, &mut painter, &mut links, 1.0, |_| {});
        assert_eq!(vp.scroll_y, 0.0);

        input.wheel = -10000.0;
        vp.update(&input, &mut painter, &mut links, 1.0, |_| {});
        assert_eq!(vp.scroll_y, 1500.0);
    }

    #[test]
    fn hover_and_click_invoke_callback_exactly_once() {
        let mut vp = viewport_at(0.0, 500.0);
        let mut painter = NullPainter;
        let mut links = vec![LinkRect::new(Rect::new(10.0, 10.0, 50.0, 16.0), "https://x.y")];
        let input = FakeInput {
            wheel: 0.0,
            mouse: Point::new(20.0, 15.0),
            left: true,
        };
        let mut calls = Vec::new();
        vp.update(&input, &mut painter, &mut links, 20.0, |url| calls.push(url.to_string()));
        assert_eq!(calls, vec!["https://x.y".to_string()]);
        assert!(links[0].hover);
    }
}
