//! Inline flattening and segment wrapping shared by the paragraph, list
//! item, definition-list `dd`, and callout body handlers (spec §4.4
//! "paragraph" contract, reused verbatim by the other segment-wrapping
//! handlers).

use crate::constants::{BOLD_COLOR, BOLD_ITALIC_COLOR, ITALIC_COLOR};
use crate::draw::{measure_text_dual_path, Services};
use crate::style::Segment;
use core_host::Color;
use core_model::{Context, Font, Node, NodeKind};
use core_text::split_words;

/// One piece of an inline-flattened subtree: either a run of styled text
/// (spec §4.4 "builds a flat sequence of inline segments") or a
/// block-level child that interrupts the flow and must be dispatched
/// through the handler registry instead of folded into plain text (spec
/// §4.5) — a nested list, table, or other registered block element never
/// belongs inside a word-wrapped line.
pub enum FlatPiece<'a> {
    Inline(Segment),
    Block(&'a Node),
}

/// Tags with their own registered handler that `flatten_node` hands off
/// to via [`FlatPiece::Block`] rather than recursing into as plain text.
/// `span`, `a`, and `br` are deliberately excluded here: they fold
/// directly into the inline run below so formatting and links keep
/// flowing in the same wrapped line as their surrounding text.
fn is_block_handled(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr" | "pre" | "code" | "dl" | "table"
    )
}

/// Flattens an inline subtree into a flat run of [`FlatPiece`]s (spec
/// §4.4: "Builds a flat sequence of inline segments from its children by
/// recursion"). `bold`/`italic` track the nearest ancestor span's
/// normalized style so nested formatting spans combine.
pub fn flatten<'a>(
    node: &'a Node,
    stem: &str,
    font: Font,
    color: Color,
    bold: bool,
    italic: bool,
    out: &mut Vec<FlatPiece<'a>>,
) {
    for child in &node.children {
        flatten_node(child, stem, font, color, bold, italic, out);
    }
}

fn flatten_node<'a>(
    node: &'a Node,
    stem: &str,
    font: Font,
    color: Color,
    bold: bool,
    italic: bool,
    out: &mut Vec<FlatPiece<'a>>,
) {
    match node.kind {
        NodeKind::Text => {
            if !node.content.is_empty() {
                out.push(FlatPiece::Inline(Segment::text(node.content.clone(), stem, font, color)));
            }
        }
        NodeKind::DocumentRoot => flatten(node, stem, font, color, bold, italic, out),
        NodeKind::Element => match node.tag.as_str() {
            "br" => out.push(FlatPiece::Inline(Segment::hard_break(stem, font, color))),
            "a" => {
                let href = node.attr("href").unwrap_or("").to_string();
                let text = node.text_content();
                if !text.is_empty() {
                    out.push(FlatPiece::Inline(Segment::link(text, stem, font, Color::BLUE, href)));
                }
            }
            "span" => {
                let style = node.attr("style").unwrap_or("");
                let span_bold = bold || style.contains("font-weight: bold");
                let span_italic = italic || style.contains("font-style: italic");
                let (new_stem, new_color) = resolve_span_style(span_bold, span_italic, color);
                let new_font = Font {
                    handle: font.handle,
                    size: font.size,
                };
                flatten(node, new_stem, new_font, new_color, span_bold, span_italic, out);
            }
            tag if is_block_handled(tag) => out.push(FlatPiece::Block(node)),
            _ => flatten(node, stem, font, color, bold, italic, out),
        },
    }
}

/// Resolve the `(stem, color)` pair for a normalized span (spec §4.4
/// Span): bold → darker blue, italic → darker green, both → combined.
/// Note: the font *handle* used for the combined face is resolved by the
/// caller via [`Services::font`] using the returned stem; this function
/// only picks the stem name and color.
pub(crate) fn resolve_span_style(bold: bool, italic: bool, inherited_color: Color) -> (&'static str, Color) {
    match (bold, italic) {
        (true, true) => ("arial-bold-italic", BOLD_ITALIC_COLOR),
        (true, false) => ("arial-bold", BOLD_COLOR),
        (false, true) => ("arial-italic", ITALIC_COLOR),
        (false, false) => ("arial", inherited_color),
    }
}

/// A single laid-out line: the pieces to draw left to right and the line
/// height to advance by.
#[derive(Debug, Clone, Default)]
pub struct WrappedLine {
    pub pieces: Vec<WrappedPiece>,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub struct WrappedPiece {
    pub text: String,
    pub stem: String,
    pub font: Font,
    pub color: Color,
    pub href: Option<String>,
}

/// Segment-wrapping (spec §4.4 Paragraph): split each segment's text into
/// words, greedily pack words onto the current line, starting a new line
/// whenever a word would overflow `content_width`. A `hard_break` segment
/// always starts a fresh line.
///
/// Pure and side-effect free — does not draw anything, so callers can run
/// it twice (once to measure, once to paint) without double-counting link
/// rectangles, matching the callout handler's two-pass box sizing.
pub fn wrap_segments(
    segments: &[Segment],
    content_width: f32,
    services: &mut Services,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut current = WrappedLine::default();
    let mut current_width = 0.0f32;

    fn flush_line(current: &mut WrappedLine, lines: &mut Vec<WrappedLine>) {
        if !current.pieces.is_empty() {
            lines.push(std::mem::take(current));
        }
    }

    for seg in segments {
        if seg.hard_break {
            flush_line(&mut current, &mut lines);
            current_width = 0.0;
            // an empty line still consumes a row of height
            lines.push(WrappedLine {
                pieces: Vec::new(),
                height: seg.font.size * 1.2,
            });
            continue;
        }
        for word in split_words(&seg.text) {
            if word.is_empty() {
                continue;
            }
            let space_width = if current.pieces.is_empty() {
                0.0
            } else {
                measure_text_dual_path(services, &seg.stem, seg.font, " ")
            };
            let word_width = measure_text_dual_path(services, &seg.stem, seg.font, &word);
            if current_width > 0.0 && current_width + space_width + word_width > content_width {
                flush_line(&mut current, &mut lines);
                current_width = 0.0;
            }
            let (_, word_height) = services.measure(&seg.stem, seg.font, &word);
            current.height = current.height.max(word_height.max(seg.font.size * 1.2));
            let text = if current.pieces.is_empty() {
                word.clone()
            } else {
                format!(" {word}")
            };
            current.pieces.push(WrappedPiece {
                text,
                stem: seg.stem.clone(),
                font: seg.font,
                color: seg.color,
                href: seg.href.clone(),
            });
            current_width += space_width + word_width;
        }
    }
    if !current.pieces.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_host::{Color as HColor, CursorKind, FontHandle, Point, Rect};
    use core_model::Node;

    struct NullPainter;
    impl core_host::Painter for NullPainter {
        fn fill_rect(&mut self, _: Rect, _: HColor) {}
        fn stroke_rect(&mut self, _: Rect, _: f32, _: HColor) {}
        fn line(&mut self, _: Point, _: Point, _: f32, _: HColor) {}
        fn draw_text(&mut self, _: FontHandle, _: &str, _: Point, _: f32, _: f32, _: HColor) {}
        fn draw_codepoint(&mut self, _: FontHandle, _: char, _: Point, _: f32, _: HColor) {}
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

    fn services<'a>(
        painter: &'a mut NullPainter,
        loader: &'a mut NullLoader,
        provider: &'a core_fonts::Provider,
        cache: &'a mut core_fonts::MeasurementCache,
        engine: &'a crate::engine::Engine,
    ) -> Services<'a> {
        Services {
            painter,
            loader,
            provider,
            cache,
            engine,
        }
    }

    fn font() -> Font {
        Font {
            handle: FontHandle(1),
            size: 10.0,
        }
    }

    #[test]
    fn flatten_collects_text_and_link_segments() {
        let mut p = Node::element("p", Context::Block);
        p.children.push(Node::text("Visit ", Context::Inline));
        let mut a = Node::element("a", Context::Inline);
        a.attributes.insert("href".to_string(), "https://x.test".to_string());
        a.children.push(Node::text("here", Context::Inline));
        p.children.push(a);
        let mut pieces = Vec::new();
        flatten(&p, "arial", font(), Color::BLACK, false, false, &mut pieces);
        assert_eq!(pieces.len(), 2);
        let FlatPiece::Inline(seg) = &pieces[1] else {
            panic!("expected an inline segment")
        };
        assert_eq!(seg.href.as_deref(), Some("https://x.test"));
    }

    #[test]
    fn nested_bold_and_italic_spans_combine() {
        let mut p = Node::element("p", Context::Block);
        let mut bold = Node::element("span", Context::Inline);
        bold.attributes.insert("style".to_string(), "font-weight: bold".to_string());
        let mut italic = Node::element("span", Context::Inline);
        italic.attributes.insert("style".to_string(), "font-style: italic".to_string());
        italic.children.push(Node::text("both", Context::Inline));
        bold.children.push(italic);
        p.children.push(bold);
        let mut pieces = Vec::new();
        flatten(&p, "arial", font(), Color::BLACK, false, false, &mut pieces);
        let FlatPiece::Inline(seg) = &pieces[0] else {
            panic!("expected an inline segment")
        };
        assert_eq!(seg.stem, "arial-bold-italic");
    }

    /// Nested lists are forced to `Context::Inline` by the parser when
    /// they sit under a `<li>` (`FORCES_INLINE_CHILDREN`), so `Context`
    /// alone cannot be the signal that keeps them from being flattened
    /// into plain text — `flatten_node` must recognize the tag itself.
    #[test]
    fn block_level_child_becomes_a_block_piece_not_inline_text() {
        let mut li = Node::element("li", Context::Inline);
        li.children.push(Node::text("one", Context::Inline));
        let nested_ul = Node::element("ul", Context::Inline);
        li.children.push(nested_ul);
        let mut pieces = Vec::new();
        flatten(&li, "arial", font(), Color::BLACK, false, false, &mut pieces);
        assert_eq!(pieces.len(), 2);
        assert!(matches!(pieces[0], FlatPiece::Inline(_)));
        assert!(matches!(pieces[1], FlatPiece::Block(_)));
    }

    #[test]
    fn inline_code_becomes_a_block_piece() {
        let mut p = Node::element("p", Context::Block);
        p.children.push(Node::text("Use ", Context::Inline));
        let mut code = Node::element("code", Context::Inline);
        code.children.push(Node::text("foo()", Context::Inline));
        p.children.push(code);
        let mut pieces = Vec::new();
        flatten(&p, "arial", font(), Color::BLACK, false, false, &mut pieces);
        assert_eq!(pieces.len(), 2);
        assert!(matches!(&pieces[1], FlatPiece::Block(n) if n.tag == "code"));
    }

    #[test]
    fn wrap_never_exceeds_content_width_for_normal_words() {
        let mut painter = NullPainter;
        let mut loader = NullLoader;
        let provider = core_fonts::Provider::global();
        let mut cache = core_fonts::MeasurementCache::new(100);
        let engine = crate::engine::Engine::new();
        let mut services = services(&mut painter, &mut loader, provider, &mut cache, &engine);
        let segs = vec![Segment::text(
            "one two three four five six seven eight".to_string(),
            "arial",
            font(),
            Color::BLACK,
        )];
        let lines = wrap_segments(&segs, 40.0, &mut services);
        assert!(lines.len() > 1);
    }

    #[test]
    fn hard_break_forces_a_new_line() {
        let mut painter = NullPainter;
        let mut loader = NullLoader;
        let provider = core_fonts::Provider::global();
        let mut cache = core_fonts::MeasurementCache::new(100);
        let engine = crate::engine::Engine::new();
        let mut services = services(&mut painter, &mut loader, provider, &mut cache, &engine);
        let segs = vec![
            Segment::text("one", "arial", font(), Color::BLACK),
            Segment::hard_break("arial", font(), Color::BLACK),
            Segment::text("two", "arial", font(), Color::BLACK),
        ];
        let lines = wrap_segments(&segs, 1000.0, &mut services);
        assert_eq!(lines.len(), 3);
    }
}
