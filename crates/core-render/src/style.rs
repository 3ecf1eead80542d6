//! Inline segment styling (spec §4.4 paragraph contract), generalized from
//! the teacher's line-local `StyleSpan` overlay model: instead of a
//! terminal-attribute span over grid cells, a [`Segment`] is a run of text
//! carrying the font/color/href it inherited while flowing through the
//! inline flattening pass, to be consumed by [`crate::wrap`].

use core_host::Color;
use core_model::Font;

#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    /// Logical font stem (`"arial"`, `"arial-bold"`, ...) this segment was
    /// resolved from — threaded alongside `font` so the measurement cache
    /// can key its per-stem font-handle invalidation (spec §4.2).
    pub stem: String,
    pub font: Font,
    pub color: Color,
    pub href: Option<String>,
    /// `true` for the marker pushed by a `<br>` encountered mid-flow
    /// (spec has no explicit contract for `br` inside inline content;
    /// this generalizes the block-level "advance Y by 20" behavior into a
    /// forced line break within segment wrapping).
    pub hard_break: bool,
}

impl Segment {
    pub fn text(text: impl Into<String>, stem: impl Into<String>, font: Font, color: Color) -> Self {
        Self {
            text: text.into(),
            stem: stem.into(),
            font,
            color,
            href: None,
            hard_break: false,
        }
    }

    pub fn link(
        text: impl Into<String>,
        stem: impl Into<String>,
        font: Font,
        color: Color,
        href: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            stem: stem.into(),
            font,
            color,
            href: Some(href.into()),
            hard_break: false,
        }
    }

    pub fn hard_break(stem: impl Into<String>, font: Font, color: Color) -> Self {
        Self {
            text: String::new(),
            stem: stem.into(),
            font,
            color,
            href: None,
            hard_break: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_host::FontHandle;

    fn font() -> Font {
        Font {
            handle: FontHandle(1),
            size: 16.0,
        }
    }

    #[test]
    fn link_segment_carries_href() {
        let seg = Segment::link("click", "arial", font(), Color::BLUE, "https://example.com");
        assert_eq!(seg.href.as_deref(), Some("https://example.com"));
        assert!(!seg.hard_break);
    }

    #[test]
    fn hard_break_segment_has_empty_text() {
        let seg = Segment::hard_break("arial", font(), Color::BLACK);
        assert!(seg.hard_break);
        assert!(seg.text.is_empty());
    }
}
