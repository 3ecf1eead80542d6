//! Configuration loading for the widget (SPEC_FULL §4 Configuration).
//!
//! `WidgetConfig` is a purely ambient convenience: every field reproduces
//! a constant that the engine would otherwise hardcode, and a host that
//! never calls [`load_from`] gets identical behavior from
//! `WidgetConfig::default()`. Unknown TOML fields are ignored so the file
//! format can grow without breaking older configs, matching the teacher's
//! `ConfigFile` tolerance.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Body chrome defaults (spec §4.6 render flow: "1-unit border"; margin
/// and padding are unspecified by the render formulas themselves and are
/// fixed here at the same 10/12-unit scale the pre/table/list handlers
/// already use elsewhere in the spec).
pub const DEFAULT_BODY_MARGIN: f32 = 10.0;
pub const DEFAULT_BODY_BORDER: f32 = 1.0;
pub const DEFAULT_BODY_PADDING: f32 = 12.0;

pub const DEFAULT_MEASUREMENT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_WHEEL_SCROLL_UNIT: f32 = 20.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub body_margin: f32,
    pub body_border: f32,
    pub body_padding: f32,
    pub measurement_cache_capacity: usize,
    pub max_nesting_depth: usize,
    pub max_input_len: usize,
    pub max_parser_errors: usize,
    pub wheel_scroll_unit: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            body_margin: DEFAULT_BODY_MARGIN,
            body_border: DEFAULT_BODY_BORDER,
            body_padding: DEFAULT_BODY_PADDING,
            measurement_cache_capacity: DEFAULT_MEASUREMENT_CACHE_CAPACITY,
            max_nesting_depth: core_parser::DEFAULT_MAX_NESTING_DEPTH,
            max_input_len: core_parser::DEFAULT_MAX_INPUT_LEN,
            max_parser_errors: core_parser::DEFAULT_MAX_PARSER_ERRORS,
            wheel_scroll_unit: DEFAULT_WHEEL_SCROLL_UNIT,
        }
    }
}

impl WidgetConfig {
    pub fn parser_limits(&self) -> core_parser::ParserLimits {
        core_parser::ParserLimits {
            max_nesting_depth: self.max_nesting_depth,
            max_input_len: self.max_input_len,
            max_parser_errors: self.max_parser_errors,
        }
    }
}

/// Best-effort config path following platform conventions, same lookup
/// order as the teacher's `discover`: a local file first, then the
/// platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("htmlview.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("htmlview").join("htmlview.toml");
    }
    PathBuf::from("htmlview.toml")
}

/// Load a [`WidgetConfig`] from `path` (or the discovered default path).
/// A missing file or a parse error both fall back to
/// `WidgetConfig::default()` — configuration is a convenience, never a
/// hard dependency for the widget to function.
pub fn load_from(path: Option<PathBuf>) -> Result<WidgetConfig> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(WidgetConfig::default());
    };
    match toml::from_str::<WidgetConfig>(&content) {
        Ok(cfg) => {
            info!(target: "config", path = %path.display(), "widget config loaded");
            Ok(cfg)
        }
        Err(err) => {
            warn!(target: "config", path = %path.display(), %err, "config parse error, using defaults");
            Ok(WidgetConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_constants() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.measurement_cache_capacity, 1000);
        assert_eq!(cfg.max_nesting_depth, 50);
        assert_eq!(cfg.max_input_len, 1_000_000);
        assert_eq!(cfg.max_parser_errors, 100);
        assert_eq!(cfg.wheel_scroll_unit, 20.0);
    }

    #[test]
    fn missing_file_yields_default() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_htmlview__.toml"))).unwrap();
        assert_eq!(cfg, WidgetConfig::default());
    }

    #[test]
    fn parses_partial_overrides_and_keeps_other_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "body_margin = 16.0\nmax_nesting_depth = 8\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.body_margin, 16.0);
        assert_eq!(cfg.max_nesting_depth, 8);
        assert_eq!(cfg.wheel_scroll_unit, 20.0);
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "body_margin = [this is not valid").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg, WidgetConfig::default());
    }
}
