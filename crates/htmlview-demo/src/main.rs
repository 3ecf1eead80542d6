//! Thin demo host for the embeddable rendering widget, in the spirit of
//! the teacher's `ox-bin`: wires `core_widget::Widget` to a trivial
//! in-memory painter/font-loader/input trio (no real windowing
//! integration — out of scope per §1) and gives the facade's
//! `debug_document`/`debug_fonts` diagnostics a CLI caller.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use core_host::{Color, CursorKind, FontHandle, FontLoader, Input, Painter, Point, Rect};
use core_widget::Widget;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "htmlview-demo",
    version,
    about = "Embeddable HTML rendering engine demo host"
)]
struct Args {
    /// Markup file to render. Reads stdin if omitted.
    pub path: Option<PathBuf>,
    /// Widget configuration file path (overrides discovery of `htmlview.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Print the parsed document tree and exit.
    #[arg(long = "dump-tree")]
    pub dump_tree: bool,
    /// Print font load status for every known stem/size and exit.
    #[arg(long = "dump-fonts")]
    pub dump_fonts: bool,
    /// Viewport width used for the demo render pass.
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,
    /// Viewport height used for the demo render pass.
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("htmlview-demo.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "htmlview-demo.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_content(args: &Args) -> Result<String> {
    match &args.path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// No-op drawing surface so the demo can exercise the full render path
/// without a real rasterizer; `measure_text` returns a plausible
/// fixed-width estimate rather than `(0, 0)` so the printed metrics mean
/// something (a real `MeasurementFailure`, spec §7, would see `(0, 0)`
/// and keep rendering regardless).
struct HeadlessPainter {
    draw_calls: usize,
}

impl HeadlessPainter {
    fn new() -> Self {
        Self { draw_calls: 0 }
    }
}

impl Painter for HeadlessPainter {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {
        self.draw_calls += 1;
    }
    fn stroke_rect(&mut self, _rect: Rect, _thickness: f32, _color: Color) {
        self.draw_calls += 1;
    }
    fn line(&mut self, _from: Point, _to: Point, _thickness: f32, _color: Color) {
        self.draw_calls += 1;
    }
    fn draw_text(
        &mut self,
        _font: FontHandle,
        _text: &str,
        _origin: Point,
        _size: f32,
        _tracking: f32,
        _color: Color,
    ) {
        self.draw_calls += 1;
    }
    fn draw_codepoint(
        &mut self,
        _font: FontHandle,
        _codepoint: char,
        _origin: Point,
        _size: f32,
        _color: Color,
    ) {
        self.draw_calls += 1;
    }
    fn measure_text(&mut self, _font: FontHandle, text: &str, size: f32) -> (f32, f32) {
        (text.chars().count() as f32 * size * 0.5, size * 1.2)
    }
    fn set_cursor(&mut self, _kind: CursorKind) {}
    fn scissor(&mut self, _rect: Rect) {}
    fn unscissor(&mut self) {}
}

/// Font loader stub: hands out a distinct handle per call. There is no
/// real rasterizer behind this demo, so every load "succeeds".
struct HeadlessLoader {
    next_id: u64,
}

impl HeadlessLoader {
    fn new() -> Self {
        Self { next_id: 1 }
    }
}

impl FontLoader for HeadlessLoader {
    fn load(&mut self, _path: &str, _size: f32, _codepoints: &[char]) -> Option<FontHandle> {
        let id = self.next_id;
        self.next_id += 1;
        Some(FontHandle(id))
    }
    fn unload(&mut self, _handle: FontHandle) {}
}

/// No input occurs in this demo; it exists only to satisfy
/// `Widget::update`'s per-frame control flow.
struct NoInput;
impl Input for NoInput {
    fn mouse_position(&self) -> Point {
        Point::new(-1.0, -1.0)
    }
    fn wheel_delta(&self) -> f32 {
        0.0
    }
    fn left_button_pressed(&self) -> bool {
        false
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();

    let args = Args::parse();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let content = read_content(&args)?;
    let mut widget = Widget::with_config(&content, config);

    let mut loader = HeadlessLoader::new();
    let mut painter = HeadlessPainter::new();

    if args.dump_tree {
        println!("{}", widget.debug_document());
        return Ok(());
    }
    if args.dump_fonts {
        widget.render(&mut loader, &mut painter, 0.0, 0.0, args.width, args.height);
        for (stem, size, loaded) in widget.debug_fonts() {
            println!("{stem:<20} {size:>5.1}  loaded={loaded}");
        }
        return Ok(());
    }

    let input = NoInput;
    widget.update(&input, &mut painter);
    widget.render(&mut loader, &mut painter, 0.0, 0.0, args.width, args.height);

    info!(
        target: "runtime.render",
        draw_calls = painter.draw_calls,
        links = widget.links().len(),
        scroll_y = widget.scroll_y(),
        "rendered one frame"
    );
    println!(
        "rendered {} draw call(s), {} link(s), scroll_y={:.1}",
        painter.draw_calls,
        widget.links().len(),
        widget.scroll_y()
    );

    widget.unload(&mut loader);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_backend_round_trips_a_render_and_click() {
        let mut widget = Widget::new_widget("<p>See <a href=\"https://x.y\">this</a>.</p>");
        let mut loader = HeadlessLoader::new();
        let mut painter = HeadlessPainter::new();
        widget.render(&mut loader, &mut painter, 0.0, 0.0, 400.0, 100.0);
        assert_eq!(widget.links().len(), 1);
        assert!(painter.draw_calls > 0);
    }

    #[test]
    fn dump_tree_contains_parsed_tags() {
        let widget = Widget::new_widget("<h1>Title</h1><p>Body</p>");
        let dump = widget.debug_document();
        assert!(dump.contains("<h1>"));
        assert!(dump.contains("<p>"));
    }
}
