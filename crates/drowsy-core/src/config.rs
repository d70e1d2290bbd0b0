//! Detector configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid range for the per-eye closure thresholds
pub const EYE_CLOSE_THRESHOLD_RANGE: (f64, f64) = (0.0, 1.0);
/// Valid range for the continuous closure time (seconds)
pub const CONTINUOUS_CLOSE_TIME_RANGE: (f64, f64) = (0.1, 10.0);
/// Valid range for the face confidence threshold
pub const FACE_CONF_THRESHOLD_RANGE: (f64, f64) = (0.0, 1.0);
/// Valid range for the EMA smoothing factor
pub const SMOOTHING_ALPHA_RANGE: (f64, f64) = (0.0, 1.0);

/// Configuration error
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Value outside its allowed range (or not a number)
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Detector configuration.
///
/// Immutable per detector instance; validated before construction.
/// Mutating thresholds mid-stream is not supported without a reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Left eye counts as closed when its openness is at or below this
    pub left_eye_close_threshold: f64,

    /// Right eye counts as closed when its openness is at or below this
    pub right_eye_close_threshold: f64,

    /// Both eyes must stay closed this long for a drowsiness signal (seconds)
    pub continuous_close_time: f64,

    /// Face detections below this confidence invalidate the frame
    pub face_conf_threshold: f64,

    /// Enable EMA smoothing of the openness signals
    pub enable_smoothing: bool,

    /// EMA smoothing factor (higher = more weight on recent samples)
    pub smoothing_alpha: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            left_eye_close_threshold: 0.30,
            right_eye_close_threshold: 0.30,
            continuous_close_time: 1.0,
            face_conf_threshold: 0.75,
            enable_smoothing: true,
            smoothing_alpha: 0.3,
        }
    }
}

impl DetectorConfig {
    /// Per-subject calibrated deployment values (tighter eye thresholds)
    pub fn calibrated() -> Self {
        Self {
            left_eye_close_threshold: 0.105,
            right_eye_close_threshold: 0.105,
            ..Default::default()
        }
    }

    /// Validate all fields against their declared ranges.
    ///
    /// Out-of-range values are rejected, not clamped; a detector must
    /// never be constructed from an invalid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "left_eye_close_threshold",
            self.left_eye_close_threshold,
            EYE_CLOSE_THRESHOLD_RANGE,
        )?;
        check_range(
            "right_eye_close_threshold",
            self.right_eye_close_threshold,
            EYE_CLOSE_THRESHOLD_RANGE,
        )?;
        check_range(
            "continuous_close_time",
            self.continuous_close_time,
            CONTINUOUS_CLOSE_TIME_RANGE,
        )?;
        check_range(
            "face_conf_threshold",
            self.face_conf_threshold,
            FACE_CONF_THRESHOLD_RANGE,
        )?;
        check_range("smoothing_alpha", self.smoothing_alpha, SMOOTHING_ALPHA_RANGE)?;
        Ok(())
    }

    /// Smoothing factor to hand to the signal channels, if enabled
    pub(crate) fn smoothing(&self) -> Option<f64> {
        self.enable_smoothing.then_some(self.smoothing_alpha)
    }
}

fn check_range(field: &'static str, value: f64, range: (f64, f64)) -> Result<(), ConfigError> {
    // Written so NaN fails the check
    if value >= range.0 && value <= range.1 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: range.0,
            max: range.1,
        })
    }
}
