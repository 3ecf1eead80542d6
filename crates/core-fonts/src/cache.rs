//! Text Measurement Cache (spec §4.2, C2): a bounded LRU of
//! `(font_handle_id, size, text) → (width, height)`, invalidated per
//! `(name, size)` stem whenever the font handle for that stem changes.

use core_host::{FontHandle, Painter};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    handle: FontHandle,
    size_bits: u32,
    text: String,
}

/// Bounded LRU measurement cache. `capacity` defaults to 1000 entries
/// (spec §3).
pub struct MeasurementCache {
    capacity: usize,
    entries: HashMap<Key, (f32, f32)>,
    order: VecDeque<Key>,
    last_handle_for_stem: HashMap<(String, u32), FontHandle>,
}

impl MeasurementCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            last_handle_for_stem: HashMap::new(),
        }
    }

    /// `size_of(font, size, text)` (spec §4.2). `stem_name` identifies the
    /// logical font (e.g. `"arial"` or `"monospace"`) independent of the
    /// resolved handle, so a font-handle change for that stem can be
    /// detected even though the cache key itself is keyed by handle.
    ///
    /// On an underlying measurement failure the painter itself returns
    /// `(0.0, 0.0)` (spec §4.2 failure mode); the cache has no error path
    /// of its own.
    pub fn size_of(
        &mut self,
        painter: &mut dyn Painter,
        stem_name: &str,
        handle: FontHandle,
        size: f32,
        text: &str,
    ) -> (f32, f32) {
        let size_bits = size.to_bits();
        self.invalidate_stale_stem(stem_name, size_bits, handle);

        let key = Key {
            handle,
            size_bits,
            text: text.to_string(),
        };
        if let Some(value) = self.entries.get(&key).copied() {
            self.touch(&key);
            return value;
        }

        let value = painter.measure_text(handle, text, size);
        self.insert(key, value);
        value
    }

    pub fn width_of(
        &mut self,
        painter: &mut dyn Painter,
        stem_name: &str,
        handle: FontHandle,
        size: f32,
        text: &str,
    ) -> f32 {
        self.size_of(painter, stem_name, handle, size, text).0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.last_handle_for_stem.clear();
    }

    fn invalidate_stale_stem(&mut self, stem_name: &str, size_bits: u32, handle: FontHandle) {
        let stem_key = (stem_name.to_string(), size_bits);
        let stale = match self.last_handle_for_stem.get(&stem_key) {
            Some(&prev) if prev != handle => Some(prev),
            _ => None,
        };
        if let Some(stale_handle) = stale {
            self.order.retain(|k| {
                let keep = !(k.handle == stale_handle && k.size_bits == size_bits);
                if !keep {
                    self.entries.remove(k);
                }
                keep
            });
        }
        self.last_handle_for_stem.insert(stem_key, handle);
    }

    fn touch(&mut self, key: &Key) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos).expect("position just found");
            self.order.push_back(k);
        }
    }

    fn insert(&mut self, key: Key, value: (f32, f32)) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            if let Some(lru) = self.order.pop_front() {
                self.entries.remove(&lru);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_host::{Color, CursorKind, Point, Rect};

    struct FakePainter;
    impl Painter for FakePainter {
        fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
        fn stroke_rect(&mut self, _rect: Rect, _thickness: f32, _color: Color) {}
        fn line(&mut self, _from: Point, _to: Point, _thickness: f32, _color: Color) {}
        fn draw_text(
            &mut self,
            _font: FontHandle,
            _text: &str,
            _origin: Point,
            _size: f32,
            _tracking: f32,
            _color: Color,
        ) {
        }
        fn draw_codepoint(
            &mut self,
            _font: FontHandle,
            _codepoint: char,
            _origin: Point,
            _size: f32,
            _color: Color,
        ) {
        }
        fn measure_text(&mut self, _font: FontHandle, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * size * 0.5, size * 1.2)
        }
        fn set_cursor(&mut self, _kind: CursorKind) {}
        fn scissor(&mut self, _rect: Rect) {}
        fn unscissor(&mut self) {}
    }

    #[test]
    fn hit_returns_cached_value_without_remeasuring() {
        let mut cache = MeasurementCache::new(10);
        let mut painter = FakePainter;
        let h = FontHandle(1);
        let a = cache.size_of(&mut painter, "arial", h, 12.0, "hello");
        let b = cache.size_of(&mut painter, "arial", h, 12.0, "hello");
        assert_eq!(a, b);
    }

    #[test]
    fn eviction_drops_least_recently_used_entry() {
        let mut cache = MeasurementCache::new(2);
        let mut painter = FakePainter;
        let h = FontHandle(1);
        cache.size_of(&mut painter, "arial", h, 12.0, "a");
        cache.size_of(&mut painter, "arial", h, 12.0, "b");
        cache.size_of(&mut painter, "arial", h, 12.0, "a"); // touches "a", "b" now LRU
        cache.size_of(&mut painter, "arial", h, 12.0, "c"); // evicts "b"
        assert_eq!(cache.entries.len(), 2);
        assert!(
            !cache.entries.keys().any(|k| k.text == "b"),
            "least recently used entry should have been evicted"
        );
    }

    #[test]
    fn stem_handle_change_invalidates_only_that_stem() {
        let mut cache = MeasurementCache::new(10);
        let mut painter = FakePainter;
        let h1 = FontHandle(1);
        cache.size_of(&mut painter, "arial", h1, 12.0, "hello");
        assert_eq!(cache.entries.len(), 1);
        let h2 = FontHandle(2);
        cache.size_of(&mut painter, "arial", h2, 12.0, "hello");
        // stale h1 entry evicted, fresh h2 entry inserted
        assert_eq!(cache.entries.len(), 1);
        assert!(cache.entries.keys().all(|k| k.handle == h2));
    }

    #[test]
    fn width_of_returns_only_the_x_component() {
        let mut cache = MeasurementCache::new(10);
        let mut painter = FakePainter;
        let h = FontHandle(1);
        let (w, _) = cache.size_of(&mut painter, "arial", h, 12.0, "abc");
        assert_eq!(cache.width_of(&mut painter, "arial", h, 12.0, "abc"), w);
    }

    #[test]
    fn clear_empties_all_state() {
        let mut cache = MeasurementCache::new(10);
        let mut painter = FakePainter;
        cache.size_of(&mut painter, "arial", FontHandle(1), 12.0, "abc");
        cache.clear();
        assert!(cache.entries.is_empty());
        assert!(cache.order.is_empty());
    }
}
