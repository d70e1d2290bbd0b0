//! Per-eye state classification

use serde::Serialize;
use signal_prep::{ChannelStats, SignalChannel};

/// Classify one filtered openness ratio against a closure threshold.
///
/// The interval is closed: a ratio exactly at the threshold counts as
/// closed.
pub fn is_closed(filtered_ratio: f64, threshold: f64) -> bool {
    filtered_ratio <= threshold
}

/// State of one eye after sanitation and classification
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EyeState {
    /// Eye classified as closed
    pub closed: bool,
    /// Sanitized openness ratio
    pub open_ratio: f64,
    /// Openness ratio after smoothing
    pub filtered_open_ratio: f64,
}

/// Sanitation and classification for a single eye.
///
/// Owns the eye's signal channel; left and right eyes are monitored
/// independently with their own thresholds.
#[derive(Debug, Clone)]
pub struct EyeMonitor {
    close_threshold: f64,
    channel: SignalChannel,
}

impl EyeMonitor {
    /// Create a monitor with the given closure threshold and optional
    /// smoothing factor
    pub fn new(name: &'static str, close_threshold: f64, smoothing: Option<f64>) -> Self {
        let channel = match smoothing {
            Some(alpha) => SignalChannel::with_smoothing(name, alpha),
            None => SignalChannel::new(name),
        };
        Self {
            close_threshold,
            channel,
        }
    }

    /// Sanitize one raw openness sample and classify it
    pub fn update(&mut self, raw_open_ratio: f64) -> EyeState {
        let (clean, filtered) = self.channel.sanitize(raw_open_ratio);
        EyeState {
            closed: is_closed(filtered, self.close_threshold),
            open_ratio: clean,
            filtered_open_ratio: filtered,
        }
    }

    /// Drop filter seed and last-valid sample
    pub fn clear(&mut self) {
        self.channel.clear();
    }

    /// Closure threshold
    pub fn close_threshold(&self) -> f64 {
        self.close_threshold
    }

    /// Channel statistics
    pub fn stats(&self) -> ChannelStats {
        self.channel.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_closed() {
        assert!(is_closed(0.30, 0.30));
        assert!(is_closed(0.29, 0.30));
        assert!(!is_closed(0.30 + 1e-9, 0.30));
    }

    #[test]
    fn test_monitor_classifies_at_boundary() {
        let mut eye = EyeMonitor::new("left_eye", 0.30, None);
        let state = eye.update(0.30);
        assert!(state.closed);
        assert_eq!(state.open_ratio, 0.30);

        let state = eye.update(0.31);
        assert!(!state.closed);
    }

    #[test]
    fn test_nan_first_frame_classifies_as_closed() {
        let mut eye = EyeMonitor::new("left_eye", 0.30, Some(0.3));
        let state = eye.update(f64::NAN);
        // No history: NaN falls back to 0.0, full closure
        assert!(state.closed);
        assert_eq!(state.open_ratio, 0.0);
    }

    #[test]
    fn test_nan_after_valid_keeps_classification() {
        let mut eye = EyeMonitor::new("left_eye", 0.30, Some(0.3));
        let open = eye.update(0.8);
        let substituted = eye.update(f64::NAN);
        assert_eq!(open.closed, substituted.closed);
        assert_eq!(substituted.open_ratio, 0.8);
    }

    #[test]
    fn test_smoothing_delays_closure() {
        // A single closed sample after a long open stretch stays above
        // the threshold at alpha 0.3
        let mut eye = EyeMonitor::new("left_eye", 0.30, Some(0.3));
        for _ in 0..10 {
            eye.update(1.0);
        }
        let state = eye.update(0.0);
        assert!(!state.closed);
        assert!(state.filtered_open_ratio > 0.30);
    }

    #[test]
    fn test_no_smoothing_tracks_raw() {
        let mut eye = EyeMonitor::new("left_eye", 0.30, None);
        for _ in 0..10 {
            eye.update(1.0);
        }
        let state = eye.update(0.0);
        assert!(state.closed);
        assert_eq!(state.filtered_open_ratio, 0.0);
    }

    #[test]
    fn test_clear_reseeds_filter() {
        let mut eye = EyeMonitor::new("left_eye", 0.30, Some(0.3));
        eye.update(1.0);
        eye.clear();

        // After clear the next sample seeds the filter directly
        let state = eye.update(0.1);
        assert_eq!(state.filtered_open_ratio, 0.1);
        assert!(state.closed);
    }
}
