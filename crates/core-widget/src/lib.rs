//! Widget Facade (spec §4.7, C8): one-shot construction from a content
//! string, owning the parsed document, the layout engine's handler
//! registry, the measurement cache and the viewport. Generalized from the
//! teacher's `AppStartup`/`EditorRuntime` split (one struct that owns every
//! piece of per-session state, driven by a thin host loop) into a single
//! struct, since this widget has no modal editing state to separate from
//! its render state.

use std::panic::{AssertUnwindSafe, catch_unwind};

use core_config::WidgetConfig;
use core_fonts::{MeasurementCache, Provider};
use core_host::{FontLoader, Input, Painter};
use core_model::{Context, Document, LinkRect, Node, NodeKind};
use core_parser::Parser;
use core_render::constants::{
    DEFAULT_FONT_SIZE, HEADING_LEVELS, MONOSPACE_LARGE_SIZE, MONOSPACE_SMALL_SIZE,
};
use core_render::draw::Services;
use core_render::{Engine, RenderHandler, Viewport};
use tracing::error;

const ARIAL_FAMILY: [&str; 4] = ["arial", "arial-bold", "arial-italic", "arial-bold-italic"];

/// spec §4.7: "one-shot construction with a content string; owns the
/// document, the layout engine (holding the handler registry), the
/// measurement cache, and the viewport state."
pub struct Widget {
    document: Document,
    engine: Engine,
    provider: &'static Provider,
    cache: MeasurementCache,
    viewport: Viewport,
    config: WidgetConfig,
    links: Vec<LinkRect>,
    on_link_click: Option<Box<dyn FnMut(&str)>>,
    pub body_margin: f32,
    pub body_border: f32,
    pub body_padding: f32,
}

impl Widget {
    /// `new_widget(content)` (spec §4.7 / §6), tuned by `WidgetConfig::default()`.
    pub fn new_widget(content: &str) -> Self {
        Self::with_config(content, WidgetConfig::default())
    }

    /// Same construction, with an explicitly loaded [`WidgetConfig`]
    /// (see `core_config::load_from`).
    pub fn with_config(content: &str, config: WidgetConfig) -> Self {
        let document = Parser::new(config.parser_limits()).parse_with(content);
        Self {
            document,
            engine: Engine::new(),
            provider: Provider::global(),
            cache: MeasurementCache::new(config.measurement_cache_capacity),
            viewport: Viewport::new(),
            links: Vec::new(),
            on_link_click: None,
            body_margin: config.body_margin,
            body_border: config.body_border,
            body_padding: config.body_padding,
            config,
        }
    }

    /// `register_handler(tag, handler)` (spec §4.7): extension point for
    /// custom element types.
    pub fn register_handler(&mut self, tag: &str, handler: Box<dyn RenderHandler>) {
        self.engine.register_handler(tag, handler);
    }

    /// `on_link_click = callback` (spec §4.7/§6).
    pub fn on_link_click(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_link_click = Some(Box::new(callback));
    }

    /// Currently hit-tested link rectangles, in document space (the same
    /// list `render` last returned internally), exposed for hosts that
    /// want their own hit-testing/tooltips.
    pub fn links(&self) -> &[LinkRect] {
        &self.links
    }

    pub fn scroll_y(&self) -> f32 {
        self.viewport.scroll_y
    }

    /// Scroll position is read/write "so hosts can restore prior
    /// positions" (spec §6).
    pub fn set_scroll_y(&mut self, value: f32) {
        self.viewport.scroll_y = value;
        self.viewport.target_scroll_y = value;
    }

    /// `update()` (spec §4.6 control flow, §4.7). A panicking
    /// `on_link_click` callback is caught and logged rather than
    /// propagated (spec §7 CallbackFault: "a faulting callback never
    /// disables rendering for future frames").
    pub fn update(&mut self, input: &dyn Input, painter: &mut dyn Painter) {
        let wheel_unit = self.config.wheel_scroll_unit;
        let callback = &mut self.on_link_click;
        self.viewport
            .update(input, painter, &mut self.links, wheel_unit, |url| {
                let Some(cb) = callback.as_mut() else {
                    return;
                };
                let url = url.to_string();
                if catch_unwind(AssertUnwindSafe(|| cb(&url))).is_err() {
                    error!(target: "widget.callback", url = %url, "on_link_click panicked, frame continues");
                }
            });
    }

    /// `render(x, y, width, height)` (spec §4.6 render flow, §4.7).
    pub fn render(
        &mut self,
        loader: &mut dyn FontLoader,
        painter: &mut dyn Painter,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        let mut services = Services {
            painter,
            loader,
            provider: self.provider,
            cache: &mut self.cache,
            engine: &self.engine,
        };
        self.links = self.viewport.render(
            &self.engine,
            &self.document.root,
            &mut services,
            x,
            y,
            width,
            height,
            self.body_margin,
            self.body_border,
            self.body_padding,
        );
    }

    /// `unload()` (spec §4.7): release font refs and clear the
    /// measurement cache. Tracks exactly the stem/size combinations the
    /// built-in handler set is known to request (the four Arial weights at
    /// body and heading sizes, monospace at both code sizes); a stem a
    /// custom handler registered through `register_handler` is that
    /// host's own responsibility to release.
    pub fn unload(&mut self, loader: &mut dyn FontLoader) {
        for stem in ARIAL_FAMILY {
            self.provider.release(loader, stem, DEFAULT_FONT_SIZE);
        }
        for (size, _before, _after) in HEADING_LEVELS {
            self.provider.release(loader, "arial", size);
        }
        self.provider.release_monospace(loader, MONOSPACE_LARGE_SIZE);
        self.provider.release_monospace(loader, MONOSPACE_SMALL_SIZE);
        self.cache.clear();
    }

    /// Diagnostic tree dump (spec §4.7).
    pub fn debug_document(&self) -> String {
        let mut out = String::new();
        write_node(&self.document.root, 0, &mut out);
        out
    }

    /// Diagnostic font-load status dump (spec §4.7): `(stem, size,
    /// loaded)` for the same stem/size set `unload` tracks.
    pub fn debug_fonts(&self) -> Vec<(String, f32, bool)> {
        let mut rows: Vec<(String, f32, bool)> = ARIAL_FAMILY
            .iter()
            .map(|stem| {
                (
                    stem.to_string(),
                    DEFAULT_FONT_SIZE,
                    self.provider.status(stem, DEFAULT_FONT_SIZE),
                )
            })
            .collect();
        for (size, _before, _after) in HEADING_LEVELS {
            rows.push(("arial".to_string(), size, self.provider.status("arial", size)));
        }
        rows
    }
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node.kind {
        NodeKind::Text => {
            out.push_str(&indent);
            out.push('"');
            out.push_str(&node.content);
            out.push_str("\"\n");
        }
        NodeKind::Element => {
            out.push_str(&indent);
            out.push('<');
            out.push_str(&node.tag);
            out.push_str("> (");
            out.push_str(match node.context {
                Context::Root => "root",
                Context::Block => "block",
                Context::Inline => "inline",
            });
            out.push_str(")\n");
            for child in &node.children {
                write_node(child, depth + 1, out);
            }
        }
        NodeKind::DocumentRoot => {
            for child in &node.children {
                write_node(child, depth, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_host::{Color, CursorKind, FontHandle, Point, Rect};

    struct NullPainter;
    impl Painter for NullPainter {
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
    impl FontLoader for NullLoader {
        fn load(&mut self, _path: &str, _size: f32, _codepoints: &[char]) -> Option<FontHandle> {
            Some(FontHandle(1))
        }
        fn unload(&mut self, _handle: FontHandle) {}
    }

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

    #[test]
    fn render_then_click_invokes_registered_callback() {
        let mut widget = Widget::new_widget("<p>See <a href=\"https://x.y\">this</a>.</p>");
        let mut painter = NullPainter;
        let mut loader = NullLoader;
        widget.render(&mut loader, &mut painter, 0.0, 0.0, 400.0, 100.0);
        assert_eq!(widget.links().len(), 1);
        let center = widget.links()[0].bounds;
        let clicked = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let clicked_cb = clicked.clone();
        widget.on_link_click(move |url| clicked_cb.lock().unwrap().push(url.to_string()));

        let input = FakeInput {
            wheel: 0.0,
            mouse: Point::new(center.x + 1.0, center.y + 1.0),
            left: true,
        };
        widget.update(&input, &mut painter);
        assert_eq!(*clicked.lock().unwrap(), vec!["https://x.y".to_string()]);
    }

    #[test]
    fn panicking_callback_is_caught_and_future_frames_still_render() {
        let mut widget = Widget::new_widget("<p>See <a href=\"https://x.y\">this</a>.</p>");
        let mut painter = NullPainter;
        let mut loader = NullLoader;
        widget.render(&mut loader, &mut painter, 0.0, 0.0, 400.0, 100.0);
        let center = widget.links()[0].bounds;
        widget.on_link_click(|_url| panic!("host callback exploded"));

        let input = FakeInput {
            wheel: 0.0,
            mouse: Point::new(center.x + 1.0, center.y + 1.0),
            left: true,
        };
        widget.update(&input, &mut painter);
        // a second frame must still render without issue
        widget.render(&mut loader, &mut painter, 0.0, 0.0, 400.0, 100.0);
        assert_eq!(widget.links().len(), 1);
    }

    #[test]
    fn debug_document_reflects_parsed_structure() {
        let widget = Widget::new_widget("<p>hi</p>");
        let dump = widget.debug_document();
        assert!(dump.contains("<p>"));
        assert!(dump.contains("\"hi\""));
    }

    #[test]
    fn set_scroll_y_is_read_back() {
        let mut widget = Widget::new_widget("<p>hi</p>");
        widget.set_scroll_y(42.0);
        assert_eq!(widget.scroll_y(), 42.0);
    }
}
