//! Per-codepoint advance-width estimation for the dual-path Unicode text
//! drawing used by `core-render::handlers::text`.
//!
//! Most hosts' bulk text-draw primitive kerns ASCII correctly but may
//! mis-kern non-ASCII glyphs on some platforms (see spec §4.4). When a
//! string contains any codepoint >= 128 the text handler falls back to
//! drawing one codepoint at a time, advancing the cursor itself rather than
//! trusting the bulk primitive's return width. This module supplies that
//! advance, expressed as a fraction of the font's em size.
//!
//! Categories and estimates below are fixed constants from the
//! specification, not measured — they are a cheap fallback used only on
//! the non-ASCII path, never for ASCII text (which always goes through
//! `Painter::measure_text`).
//!
//! Precedence: named punctuation categories are checked first since they
//! are the most common non-ASCII glyphs in rendered prose (curly quotes,
//! en/em dashes, ellipsis); everything else falls through to the broader
//! Unicode block ranges, then a generic wide/narrow split using
//! `unicode_width` as a last resort.

/// Estimated advance width of `c`, expressed as a multiple of the em size.
pub fn estimate_em_width(c: char) -> f32 {
    match c {
        '\u{2013}' | '\u{2014}' => 0.5,  // en dash, em dash
        '\u{2018}' | '\u{2019}' => 0.3,  // single quotes
        '\u{201C}' | '\u{201D}' => 0.3,  // double quotes
        '\u{2026}' => 0.8,               // ellipsis
        '\u{00AB}' | '\u{00BB}' => 0.45, // french angle quotes
        '\u{2022}' | '\u{25CF}' => 0.4,  // bullets
        '\u{00C0}'..='\u{00FF}' => 0.55, // Latin-1 Supplement
        '\u{0100}'..='\u{017F}' => 0.58, // Latin Extended-A
        _ => fallback_width(c),
    }
}

fn fallback_width(c: char) -> f32 {
    match unicode_width::UnicodeWidthChar::width(c) {
        Some(2) => 1.0,
        _ => 0.6,
    }
}

/// True if `text` contains any codepoint outside the ASCII range, i.e. the
/// text handler must use the per-codepoint draw path instead of the bulk
/// primitive.
pub fn needs_codepoint_path(text: &str) -> bool {
    text.chars().any(|c| (c as u32) >= 128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_never_needs_codepoint_path() {
        assert!(!needs_codepoint_path("Hello, world! 123"));
    }

    #[test]
    fn non_ascii_triggers_codepoint_path() {
        assert!(needs_codepoint_path("café"));
        assert!(needs_codepoint_path("\u{2014}"));
    }

    #[test]
    fn named_categories_match_spec_constants() {
        assert_eq!(estimate_em_width('\u{2013}'), 0.5);
        assert_eq!(estimate_em_width('\u{2014}'), 0.5);
        assert_eq!(estimate_em_width('\u{2018}'), 0.3);
        assert_eq!(estimate_em_width('\u{2026}'), 0.8);
        assert_eq!(estimate_em_width('\u{00AB}'), 0.45);
        assert_eq!(estimate_em_width('\u{2022}'), 0.4);
    }

    #[test]
    fn latin_blocks_use_their_documented_estimate() {
        assert_eq!(estimate_em_width('\u{00E9}'), 0.55); // é, Latin-1 Supplement
        assert_eq!(estimate_em_width('\u{0101}'), 0.58); // ā, Latin Extended-A
    }

    #[test]
    fn else_bucket_prefers_wide_detection() {
        // A CJK ideograph is East-Asian-wide per unicode_width.
        assert_eq!(estimate_em_width('\u{6F22}'), 1.0);
        // An arbitrary narrow symbol outside every named bucket.
        assert_eq!(estimate_em_width('\u{0259}'), 0.6);
    }
}
