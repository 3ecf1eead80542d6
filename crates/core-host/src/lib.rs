//! Host backend abstraction.
//!
//! The engine never touches a window, a font file, or a raster primitive
//! directly. Every effect it has on the outside world flows through the
//! three traits in this crate: `Painter`, `FontLoader`, `Input`. A host
//! implements them against whatever windowing/graphics stack it already has
//! (wgpu, skia, a software framebuffer, a test harness); the engine is
//! generic over them and carries no platform dependency of its own.
//!
//! Design considerations:
//! * Zero dependencies. This crate sits at the base of the workspace DAG the
//!   way a capability-probe crate sits underneath a renderer: everything
//!   else depends on it, it depends on nothing.
//! * Geometry is plain `f32` document/screen units, not terminal cells —
//!   the engine's output is pixel-ish, not character-grid.
//! * Traits are intentionally minimal (one call per primitive operation);
//!   no builder patterns, no retained scene graph.

/// An axis-aligned rectangle in whatever coordinate space the caller is
/// working in (document space or screen space; never both at once).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Translate `self` by `(dx, dy)`; used to convert between document and
    /// screen space by passing `-scroll_y` or `scroll_y` as `dy`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGBA, 0..=255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(230, 230, 230);
    pub const BLUE: Color = Color::rgb(30, 100, 220);
}

/// Mouse cursor hint a host should apply; set during `Viewport::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Default,
    Pointer,
}

/// Opaque handle to a loaded font. Hosts are free to make this a newtype
/// around whatever texture-atlas id their backend uses; the engine only
/// ever compares handles for equality and threads them through `Painter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u64);

/// Loads font resources from the platform. Implemented by the host; the
/// engine's `core-fonts::Provider` is generic over this trait so it never
/// names a concrete font backend.
pub trait FontLoader {
    /// Load the font at `path` rasterized for `size`, prerasterizing the
    /// supplied codepoints. Returns `None` on failure (missing file,
    /// unsupported format) — never panics.
    fn load(&mut self, path: &str, size: f32, codepoints: &[char]) -> Option<FontHandle>;

    /// Release a previously loaded handle. A no-op if the handle is
    /// already gone.
    fn unload(&mut self, handle: FontHandle);
}

/// Draw and measurement primitives. Implemented by the host's raster layer;
/// every render handler in `core-render` draws exclusively through this
/// trait.
pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color);

    /// Draw `text` with `font` at `size`, baseline-origin `origin`, using
    /// `tracking` extra spacing between glyphs and `color`.
    fn draw_text(
        &mut self,
        font: FontHandle,
        text: &str,
        origin: Point,
        size: f32,
        tracking: f32,
        color: Color,
    );

    /// Draw a single codepoint (used by the dual-path Unicode renderer for
    /// non-ASCII code points, see `core-render::handlers::text`).
    fn draw_codepoint(&mut self, font: FontHandle, codepoint: char, origin: Point, size: f32, color: Color);

    /// Measure `text` set in `font` at `size`. Returns `(width, height)`.
    /// On an internal measurement failure hosts should return `(0.0, 0.0)`
    /// rather than propagate an error — see spec §7, MeasurementFailure.
    fn measure_text(&mut self, font: FontHandle, text: &str, size: f32) -> (f32, f32);

    fn set_cursor(&mut self, kind: CursorKind);

    /// Clip subsequent draw calls to `rect` until `unscissor` is called.
    fn scissor(&mut self, rect: Rect);
    fn unscissor(&mut self);
}

/// Per-frame input snapshot read by the viewport controller. Implemented by
/// the host; values are frame-local (pressed-this-frame, not held-state).
pub trait Input {
    fn mouse_position(&self) -> Point;
    fn wheel_delta(&self) -> f32;
    fn left_button_pressed(&self) -> bool;
}
