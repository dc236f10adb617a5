//! Simulated text-generation backend.
//!
//! A prompt is mapped to one of two canned replies, and the reply is handed
//! back as a stream of word fragments paced evenly over a requested duration.
//! Clients use it to exercise incremental rendering without a real model.

mod content;
mod emitter;

pub use content::{select, FILLER_TEXT, GREETING_TEXT};
pub use emitter::{emit, PacedEmitter};

/// Duration used when a request does not specify one, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 5.0;
