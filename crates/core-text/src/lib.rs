//! Text-shaping helpers shared by the parser and the render handlers:
//! the deterministic word splitter (spec §4.4) and the per-codepoint
//! advance-width estimate used by the dual-path Unicode text drawing.
//!
//! Neither module here touches a font or a painter; both are pure
//! functions over `&str`/`char`, kept dependency-light the way the corpus
//! keeps its lowest-level text crate free of anything but Unicode tables.

pub mod width;
pub mod wordsplit;

pub use width::{estimate_em_width, needs_codepoint_path};
pub use wordsplit::split_words;
