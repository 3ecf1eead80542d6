//! Drawing/measurement services threaded through every handler, and the
//! dual-path Unicode text-drawing routine (spec §4.4 "Unicode painting").

use core_fonts::{MeasurementCache, Provider};
use core_host::{Color, CursorKind, FontHandle, FontLoader, Painter, Point, Rect};
use core_model::Font;
use core_text::{estimate_em_width, needs_codepoint_path};

use crate::engine::Engine;

/// Everything a handler needs beyond the document tree itself: the
/// painter, the host's font loader, the process-wide font provider, this
/// widget's measurement cache, and the engine itself so a handler (Span
/// in block context) can recurse back through the dispatcher (spec §4.4
/// Span, §4.5).
pub struct Services<'a> {
    pub painter: &'a mut dyn Painter,
    pub loader: &'a mut dyn FontLoader,
    pub provider: &'a Provider,
    pub cache: &'a mut MeasurementCache,
    pub engine: &'a Engine,
}

impl<'a> Services<'a> {
    /// Resolve a logical font stem (`"arial"`, `"arial-bold"`,
    /// `"arial-italic"`, `"monospace"`) at `size` to a [`Font`] (spec
    /// §4.1).
    pub fn font(&mut self, stem: &str, size: f32) -> Font {
        let handle = if stem == "monospace" {
            self.provider.get_monospace(self.loader, size)
        } else {
            self.provider.get(self.loader, stem, size)
        };
        Font { handle, size }
    }

    /// `size_of` through the measurement cache (spec §4.2), keyed by the
    /// logical stem so a font-handle change for that stem invalidates
    /// correctly.
    pub fn measure(&mut self, stem: &str, font: Font, text: &str) -> (f32, f32) {
        self.cache
            .size_of(self.painter, stem, font.handle, font.size, text)
    }

    pub fn width(&mut self, stem: &str, font: Font, text: &str) -> f32 {
        self.measure(stem, font, text).0
    }
}

/// Draw `text` at `origin` with `font`/`color`, returning the width
/// consumed. Uses the bulk draw primitive unless the string contains a
/// codepoint ≥ 128, in which case it switches to the character-by-character
/// path: ASCII codepoints still go through the bulk primitive one at a
/// time, non-ASCII codepoints go through `draw_codepoint` and advance by
/// the per-category em-width estimate (spec §4.4).
pub fn draw_text_dual_path(
    services: &mut Services,
    stem: &str,
    font: Font,
    text: &str,
    origin: Point,
    color: Color,
) -> f32 {
    if !needs_codepoint_path(text) {
        services
            .painter
            .draw_text(font.handle, text, origin, font.size, 0.0, color);
        return services.width(stem, font, text);
    }

    let mut x = origin.x;
    for c in text.chars() {
        if (c as u32) < 128 {
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            services
                .painter
                .draw_text(font.handle, s, Point::new(x, origin.y), font.size, 0.0, color);
            x += services.width(stem, font, s);
        } else {
            services
                .painter
                .draw_codepoint(font.handle, c, Point::new(x, origin.y), font.size, color);
            x += estimate_em_width(c) * font.size;
        }
    }
    x - origin.x
}

/// A painter stand-in that swallows every drawing call but still forwards
/// `measure_text` to the real painter, so a dry-run layout pass can learn
/// how much vertical space a block-level child would consume (spec §4.4
/// Table/Callout two-pass sizing) without actually painting it.
struct MeasuringPainter<'a> {
    inner: &'a mut dyn Painter,
}

impl Painter for MeasuringPainter<'_> {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn stroke_rect(&mut self, _rect: Rect, _thickness: f32, _color: Color) {}
    fn line(&mut self, _from: Point, _to: Point, _thickness: f32, _color: Color) {}
    fn draw_text(&mut self, _font: FontHandle, _text: &str, _origin: Point, _size: f32, _tracking: f32, _color: Color) {}
    fn draw_codepoint(&mut self, _font: FontHandle, _codepoint: char, _origin: Point, _size: f32, _color: Color) {}
    fn measure_text(&mut self, font: FontHandle, text: &str, size: f32) -> (f32, f32) {
        self.inner.measure_text(font, text, size)
    }
    fn set_cursor(&mut self, _kind: CursorKind) {}
    fn scissor(&mut self, _rect: Rect) {}
    fn unscissor(&mut self) {}
}

/// Run `f` with this `Services`' painter swapped for [`MeasuringPainter`]:
/// font metrics stay accurate but nothing is actually drawn. Used to size
/// a block-level child before it is painted for real at its final
/// position (spec §4.4 Table row heights, Callout box height).
pub fn with_measuring_painter<R>(services: &mut Services, f: impl FnOnce(&mut Services) -> R) -> R {
    let mut measuring = MeasuringPainter { inner: &mut *services.painter };
    let mut probe = Services {
        painter: &mut measuring,
        loader: &mut *services.loader,
        provider: services.provider,
        cache: &mut *services.cache,
        engine: services.engine,
    };
    f(&mut probe)
}

/// Measure `text` the same way [`draw_text_dual_path`] would draw it,
/// without issuing any draw calls — used by word-wrap line-fitting, which
/// must know a word's width before deciding whether to draw it on the
/// current line.
pub fn measure_text_dual_path(services: &mut Services, stem: &str, font: Font, text: &str) -> f32 {
    if !needs_codepoint_path(text) {
        return services.width(stem, font, text);
    }
    let mut total = 0.0;
    for c in text.chars() {
        if (c as u32) < 128 {
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            total += services.width(stem, font, s);
        } else {
            total += estimate_em_width(c) * font.size;
        }
    }
    total
}
