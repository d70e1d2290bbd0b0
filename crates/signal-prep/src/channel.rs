//! Sanitized Signal Channel

use serde::Serialize;
use tracing::debug;

use crate::ema::EmaFilter;

/// Substitute and clamp one raw sample.
///
/// NaN is replaced by `last_valid` when one exists, otherwise by 0.0
/// (full closure). Finite and infinite values are clamped to [0, 1].
pub fn sanitize_value(raw: f64, last_valid: Option<f64>) -> f64 {
    if raw.is_nan() {
        last_valid.unwrap_or(0.0)
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Statistics for a sanitized channel
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ChannelStats {
    /// Samples processed since construction or reset
    pub total_samples: u64,
    /// Samples that required NaN substitution
    pub substituted: u64,
    /// Whether the smoothing filter is seeded
    pub seeded: bool,
    /// Current filtered value, if seeded
    pub filtered_value: Option<f64>,
}

/// One scalar input channel: NaN substitution, clamping to [0, 1], and
/// optional exponential smoothing.
///
/// Holds the last valid sample for substitution. Never fails; any f64
/// input (NaN, ±∞, out-of-range) yields a value in [0, 1].
#[derive(Debug, Clone)]
pub struct SignalChannel {
    name: &'static str,
    last_valid: Option<f64>,
    filter: Option<EmaFilter>,
    total_samples: u64,
    substituted: u64,
}

impl SignalChannel {
    /// Create a channel without smoothing
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            last_valid: None,
            filter: None,
            total_samples: 0,
            substituted: 0,
        }
    }

    /// Create a channel with EMA smoothing
    pub fn with_smoothing(name: &'static str, alpha: f64) -> Self {
        Self {
            filter: Some(EmaFilter::new(alpha)),
            ..Self::new(name)
        }
    }

    /// Sanitize one sample.
    ///
    /// Returns `(clean, filtered)`: the substituted/clamped value and the
    /// smoothed value (identical when smoothing is off). Updates the
    /// last-valid sample as a side effect.
    pub fn sanitize(&mut self, raw: f64) -> (f64, f64) {
        self.total_samples += 1;

        if raw.is_nan() {
            self.substituted += 1;
            debug!(
                channel = self.name,
                substituted = self.substituted,
                "NaN sample substituted"
            );
        }

        let clean = sanitize_value(raw, self.last_valid);
        self.last_valid = Some(clean);

        let filtered = match &mut self.filter {
            Some(filter) => filter.update(clean),
            None => clean,
        };
        (clean, filtered)
    }

    /// Clear signal state (last valid sample and filter seed).
    ///
    /// Statistics counters are preserved.
    pub fn clear(&mut self) {
        self.last_valid = None;
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
    }

    /// Last valid (sanitized) sample
    pub fn last_valid(&self) -> Option<f64> {
        self.last_valid
    }

    /// Channel statistics snapshot
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            total_samples: self.total_samples,
            substituted: self.substituted,
            seeded: self.filter.as_ref().map(|f| f.is_seeded()).unwrap_or(false),
            filtered_value: self.filter.as_ref().and_then(|f| f.value()),
        }
    }
}
