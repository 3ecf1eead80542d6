//! Font Provider (spec §4.1, C1): resolves `(logical name, size)` to an
//! opaque, ref-counted [`FontHandle`] behind a process-wide reader/writer
//! lock, with platform-aware path selection and a monospace preference
//! list.

use core_host::{FontHandle, FontLoader};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};
use tracing::{debug, warn};

/// Printable ASCII plus the Latin-1 Supplement and Latin Extended-A
/// punctuation `core_text::width` gives bespoke estimates for — the set a
/// host is expected to preload glyphs for (spec §6).
pub fn preload_codepoints() -> Vec<char> {
    let mut cps: Vec<char> = (0x20u32..0x7F).filter_map(char::from_u32).collect();
    cps.extend((0xA0u32..0x180).filter_map(char::from_u32));
    cps
}

#[cfg(target_os = "windows")]
fn platform_path(logical: &str) -> &'static str {
    match logical {
        "arial-bold" => "C:\\Windows\\Fonts\\arialbd.ttf",
        "arial-italic" => "C:\\Windows\\Fonts\\ariali.ttf",
        "arial-bold-italic" => "C:\\Windows\\Fonts\\arialbi.ttf",
        "arial" => "C:\\Windows\\Fonts\\arial.ttf",
        _ => "C:\\Windows\\Fonts\\arial.ttf",
    }
}

#[cfg(target_os = "macos")]
fn platform_path(logical: &str) -> &'static str {
    match logical {
        "arial-bold" => "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "arial-italic" => "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
        "arial-bold-italic" => "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
        "arial" => "/System/Library/Fonts/Supplemental/Arial.ttf",
        _ => "/System/Library/Fonts/Supplemental/Arial.ttf",
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_path(logical: &str) -> &'static str {
    match logical {
        "arial-bold" => "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "arial-italic" => "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
        "arial-bold-italic" => "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
        "arial" => "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        _ => "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    }
}

/// Ordered preference list for the `monospace` bucket (spec §4.1: "tries
/// an ordered preference list and picks the first that loads").
#[cfg(target_os = "windows")]
const MONOSPACE_PREFERENCE: &[&str] = &[
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

#[cfg(target_os = "macos")]
const MONOSPACE_PREFERENCE: &[&str] = &[
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const MONOSPACE_PREFERENCE: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
];

const DEFAULT_FONT_KEY: &str = "arial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Key {
    name_idx: u32,
    size_bits: u32,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    handle: FontHandle,
    ref_count: u32,
    loaded: bool,
}

#[derive(Default)]
struct State {
    names: Vec<String>,
    entries: HashMap<Key, Entry>,
}

impl State {
    fn key(&mut self, name: &str, size: f32) -> Key {
        let name_idx = match self.names.iter().position(|n| n == name) {
            Some(i) => i as u32,
            None => {
                self.names.push(name.to_string());
                (self.names.len() - 1) as u32
            }
        };
        Key {
            name_idx,
            size_bits: size.to_bits(),
        }
    }
}

/// Process-wide font cache (spec §4.1: "a process-wide singleton guarded
/// by a reader/writer lock").
pub struct Provider {
    state: RwLock<State>,
}

impl Provider {
    fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    pub fn global() -> &'static Provider {
        static PROVIDER: OnceLock<Provider> = OnceLock::new();
        PROVIDER.get_or_init(Provider::new)
    }

    /// `get(name, size)` (spec §4.1). Readers check under a shared lock;
    /// on miss they promote to exclusive and re-check before inserting,
    /// so two racing callers never double-load the same key.
    pub fn get(&self, loader: &mut dyn FontLoader, name: &str, size: f32) -> FontHandle {
        let key = {
            let mut guard = self.state.write().expect("font provider poisoned");
            guard.key(name, size)
        };
        if let Some(handle) = self.try_read_hit(key) {
            return handle;
        }
        let mut guard = self.state.write().expect("font provider poisoned");
        if let Some(entry) = guard.entries.get_mut(&key) {
            entry.ref_count += 1;
            return entry.handle;
        }
        let path = platform_path(name);
        let codepoints = preload_codepoints();
        let (handle, loaded) = match loader.load(path, size, &codepoints) {
            Some(h) => {
                debug!(target: "fonts.provider", name, size, "loaded");
                (h, true)
            }
            None => {
                warn!(target: "fonts.provider", name, size, "load failed, using fallback");
                let fallback_path = platform_path(DEFAULT_FONT_KEY);
                let fallback = loader
                    .load(fallback_path, size, &codepoints)
                    .unwrap_or(FontHandle(0));
                (fallback, false)
            }
        };
        guard.entries.insert(
            key,
            Entry {
                handle,
                ref_count: 1,
                loaded,
            },
        );
        handle
    }

    fn try_read_hit(&self, key: Key) -> Option<FontHandle> {
        let guard = self.state.read().expect("font provider poisoned");
        guard.entries.get(&key).map(|e| e.handle)
    }

    /// `get_monospace(size)` (spec §4.1): keyed as `monospace:size`, tries
    /// each candidate path in order and keeps the first that loads.
    pub fn get_monospace(&self, loader: &mut dyn FontLoader, size: f32) -> FontHandle {
        let key = {
            let mut guard = self.state.write().expect("font provider poisoned");
            guard.key("monospace", size)
        };
        if let Some(handle) = self.try_read_hit(key) {
            let mut guard = self.state.write().expect("font provider poisoned");
            if let Some(entry) = guard.entries.get_mut(&key) {
                entry.ref_count += 1;
            }
            return handle;
        }
        let codepoints = preload_codepoints();
        let mut loaded_handle = None;
        for path in MONOSPACE_PREFERENCE {
            if let Some(h) = loader.load(path, size, &codepoints) {
                loaded_handle = Some(h);
                break;
            }
        }
        let (handle, loaded) = match loaded_handle {
            Some(h) => (h, true),
            None => {
                warn!(target: "fonts.provider", size, "no monospace candidate loaded, using fallback");
                let fallback_path = platform_path(DEFAULT_FONT_KEY);
                (
                    loader
                        .load(fallback_path, size, &codepoints)
                        .unwrap_or(FontHandle(0)),
                    false,
                )
            }
        };
        let mut guard = self.state.write().expect("font provider poisoned");
        guard.entries.insert(
            key,
            Entry {
                handle,
                ref_count: 1,
                loaded,
            },
        );
        handle
    }

    fn release_key(&self, loader: &mut dyn FontLoader, key: Key, is_default: bool) {
        let mut guard = self.state.write().expect("font provider poisoned");
        let Some(entry) = guard.entries.get_mut(&key) else {
            return;
        };
        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count == 0 && !is_default {
            loader.unload(entry.handle);
            guard.entries.remove(&key);
        }
    }

    pub fn release(&self, loader: &mut dyn FontLoader, name: &str, size: f32) {
        let key = {
            let mut guard = self.state.write().expect("font provider poisoned");
            guard.key(name, size)
        };
        self.release_key(loader, key, name == DEFAULT_FONT_KEY);
    }

    pub fn release_monospace(&self, loader: &mut dyn FontLoader, size: f32) {
        let key = {
            let mut guard = self.state.write().expect("font provider poisoned");
            guard.key("monospace", size)
        };
        self.release_key(loader, key, false);
    }

    /// `status(name, size)` (spec §4.1): true iff a real font loaded, not
    /// the fallback.
    pub fn status(&self, name: &str, size: f32) -> bool {
        let mut guard = self.state.write().expect("font provider poisoned");
        let key = guard.key(name, size);
        guard.entries.get(&key).map(|e| e.loaded).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FakeLoader {
        next_id: u64,
        fail_paths: Vec<&'static str>,
        loads: RefCell<Vec<String>>,
    }

    impl FakeLoader {
        fn new() -> Self {
            Self {
                next_id: 1,
                fail_paths: Vec::new(),
                loads: RefCell::new(Vec::new()),
            }
        }
    }

    impl FontLoader for FakeLoader {
        fn load(&mut self, path: &str, _size: f32, _codepoints: &[char]) -> Option<FontHandle> {
            self.loads.borrow_mut().push(path.to_string());
            if self.fail_paths.contains(&path) {
                return None;
            }
            let id = self.next_id;
            self.next_id += 1;
            Some(FontHandle(id))
        }

        fn unload(&mut self, _handle: FontHandle) {}
    }

    #[test]
    fn repeated_get_reuses_the_same_handle_and_increments_ref_count() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        let a = provider.get(&mut loader, "arial", 12.0);
        let b = provider.get(&mut loader, "arial", 12.0);
        assert_eq!(a, b);
        assert_eq!(loader.loads.borrow().len(), 1);
    }

    #[test]
    fn distinct_sizes_are_distinct_cache_entries() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        let a = provider.get(&mut loader, "arial", 12.0);
        let b = provider.get(&mut loader, "arial", 14.0);
        assert_ne!(a, b);
    }

    #[test]
    fn failed_load_falls_back_and_reports_status_false() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        loader.fail_paths.push(platform_path("arial"));
        provider.get(&mut loader, "arial", 12.0);
        assert!(!provider.status("arial", 12.0));
    }

    #[test]
    fn successful_load_reports_status_true() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        provider.get(&mut loader, "arial", 12.0);
        assert!(provider.status("arial", 12.0));
    }

    #[test]
    fn monospace_tries_candidates_in_order_until_one_loads() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        loader.fail_paths.push(MONOSPACE_PREFERENCE[0]);
        provider.get_monospace(&mut loader, 10.0);
        assert_eq!(loader.loads.borrow()[0], MONOSPACE_PREFERENCE[0]);
        assert_eq!(loader.loads.borrow()[1], MONOSPACE_PREFERENCE[1]);
    }

    #[test]
    fn release_drops_the_entry_once_ref_count_reaches_zero() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        provider.get(&mut loader, "consolas", 12.0);
        provider.get(&mut loader, "consolas", 12.0);
        provider.release(&mut loader, "consolas", 12.0);
        // still referenced once
        provider.release(&mut loader, "consolas", 12.0);
        let key = {
            let mut guard = provider.state.write().unwrap();
            guard.key("consolas", 12.0)
        };
        assert!(provider.state.read().unwrap().entries.get(&key).is_none());
    }

    #[test]
    fn default_font_is_never_released() {
        let provider = Provider::new();
        let mut loader = FakeLoader::new();
        provider.get(&mut loader, DEFAULT_FONT_KEY, 12.0);
        provider.release(&mut loader, DEFAULT_FONT_KEY, 12.0);
        assert!(provider.status(DEFAULT_FONT_KEY, 12.0));
    }
}
