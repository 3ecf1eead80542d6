//! Numeric constants and color palette lifted verbatim from the per-handler
//! contracts (spec §4.4). Grouped here the way the teacher groups magic
//! numbers into named `const`s at module scope instead of inlining them.

use core_host::Color;

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
pub const MONOSPACE_LARGE_SIZE: f32 = 16.0;
pub const MONOSPACE_SMALL_SIZE: f32 = 13.0;

pub const TEXT_TRAILING_GAP: f32 = 5.0;

pub const LIST_TOP_MARGIN: f32 = 10.0;
pub const LIST_BASE_INDENT: f32 = 25.0;
pub const LIST_NESTED_INDENT: f32 = 20.0;
pub const UL_MARKER_OFFSET: f32 = 15.0;
pub const OL_MARKER_OFFSET: f32 = 20.0;
pub const UL_MARKER_SIZE: f32 = 18.0;

pub const HR_TOP_GAP: f32 = 10.0;
pub const HR_BOTTOM_GAP: f32 = 15.0;
pub const HR_THICKNESS: f32 = 2.0;

pub const BR_ADVANCE: f32 = 20.0;

pub const PRE_LINE_HEIGHT: f32 = 18.0;
pub const PRE_PADDING: f32 = 12.0;
pub const PRE_EXTRA: f32 = 24.0;
pub const CODE_INLINE_PADDING: f32 = 4.0;

pub const DL_MARGIN: f32 = 10.0;
pub const DD_INDENT: f32 = 30.0;

pub const CALLOUT_BORDER: f32 = 4.0;
pub const CALLOUT_INDENT: f32 = 50.0;
pub const CALLOUT_PADDING: f32 = 12.0;
pub const CALLOUT_BOTTOM_GAP: f32 = 15.0;

pub const TABLE_CELL_PADDING: f32 = 12.0;

/// Per-level (font size, space-before, space-after) for h1..h6 (spec §4.4).
pub const HEADING_LEVELS: [(f32, f32, f32); 6] = [
    (32.0, 25.0, 15.0),
    (28.0, 20.0, 12.0),
    (24.0, 18.0, 10.0),
    (20.0, 15.0, 8.0),
    (18.0, 12.0, 6.0),
    (16.0, 10.0, 5.0),
];

pub const HEADING_COLOR: Color = Color::rgb(20, 40, 120);
pub const LINK_COLOR: Color = Color::BLUE;
pub const BOLD_COLOR: Color = Color::rgb(10, 30, 100);
pub const ITALIC_COLOR: Color = Color::rgb(20, 90, 40);
pub const BOLD_ITALIC_COLOR: Color = Color::rgb(15, 60, 70);
pub const HR_COLOR: Color = Color::GRAY;
pub const PRE_BACKGROUND: Color = Color::LIGHT_GRAY;
