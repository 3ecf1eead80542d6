//! Rendering: the handler set, the stateless layout dispatcher, and the
//! per-widget viewport controller (spec §4.4-§4.6).
//!
//! Generalized from the teacher's terminal render pipeline: where the
//! teacher's `RenderEngine` owned a `Frame` of terminal cells and chose
//! between full/partial repaint strategies over a character grid, this
//! engine owns no frame at all — every draw call is issued directly
//! through the host's `Painter` (spec §6), and "partial repaint" has no
//! counterpart because a widget repaints its whole subtree every frame
//! (spec §5: "a frame is an atomic render of one immutable tree").
//!
//! What does carry over: the dispatcher-over-a-registry shape (the
//! teacher's `scheduler` picks a render path by tag-like classification;
//! here `engine::Engine` picks a handler by tag name), stateless handlers
//! (teacher's partial-repaint helpers hold no state across calls either),
//! and context threaded top-down rather than via parent pointers (spec §9).

pub mod constants;
pub mod draw;
pub mod engine;
pub mod handlers;
pub mod style;
pub mod viewport;
pub mod wrap;

pub use engine::{Engine, RenderHandler};
pub use viewport::Viewport;
