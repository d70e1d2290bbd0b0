//! Signal Preparation
//!
//! Sanitizes raw per-frame scalar inputs from the upstream eye-openness
//! estimator: NaN substitution, range clamping, and optional exponential
//! smoothing. Every input produces a defined output in [0, 1].

mod channel;
mod ema;

pub use channel::{sanitize_value, ChannelStats, SignalChannel};
pub use ema::EmaFilter;
