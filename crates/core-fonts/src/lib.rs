//! Font resolution and measurement caching (spec §4.1 Font Provider / C1,
//! §4.2 Text Measurement Cache / C2). Both are generic over the host's
//! `FontLoader`/`Painter` implementations from `core-host`; this crate
//! never touches an actual font file.

pub mod cache;
pub mod provider;

pub use cache::MeasurementCache;
pub use provider::{preload_codepoints, Provider};
