//! Nullable infrastructure for deterministic testing.
//!
//! The clock and the haptic/audio cue each have a test-friendly implementation here that:
//! - Returns deterministic values
//! - Can be controlled and inspected programmatically
//! - Never touches the filesystem, network, or device hardware

pub mod clock;
pub mod cue;

pub use clock::NullClock;
pub use cue::RecordingCue;
