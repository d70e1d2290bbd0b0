//! Input and output frame models

use serde::{Deserialize, Serialize};
use std::fmt;

/// One frame of input from the upstream estimator.
///
/// The openness and confidence fields are nominally in [0, 1] but any
/// f64 (NaN, ±∞, out-of-range) is tolerated. `dt` is the elapsed time
/// since the previous frame in seconds, supplied by the host so the
/// detector stays correct under variable frame rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputFrame {
    /// Monotonically increasing frame identifier
    pub frame_num: i64,
    /// Left eye openness (0.0 = fully closed, 1.0 = fully open)
    pub left_eye_open: f64,
    /// Right eye openness
    pub right_eye_open: f64,
    /// Face detection confidence
    pub face_confidence: f64,
    /// Elapsed time since the previous frame (seconds)
    pub dt: f64,
}

/// Reason a frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Non-monotonic or duplicate frame number; frame dropped, state untouched
    InvalidFrameNum,
    /// Face confidence below threshold; filters and timer reset
    LowFaceConfidence,
    /// Unexpected computation fault; state reset defensively
    InternalError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFrameNum => "INVALID_FRAME_NUM",
            ErrorCode::LowFaceConfidence => "LOW_FACE_CONFIDENCE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame classification result.
///
/// `is_drowsy` is -1 for an invalid/error frame, 0 for a valid frame
/// without continuous closure, 1 when the continuous closure threshold
/// is met or still held.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameResult {
    /// Frame this result corresponds to
    pub frame_num: i64,
    /// Classification: -1 error, 0 awake, 1 continuous closure
    pub is_drowsy: i8,
    /// Left eye classified closed (false on error frames)
    pub left_eye_closed: bool,
    /// Right eye classified closed (false on error frames)
    pub right_eye_closed: bool,
    /// Current accumulated closure duration (seconds)
    pub continuous_time: f64,
    /// Rejection reason, present only when `is_drowsy` is -1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl FrameResult {
    /// Error result for a rejected frame
    pub fn error(frame_num: i64, code: ErrorCode) -> Self {
        Self {
            frame_num,
            is_drowsy: -1,
            left_eye_closed: false,
            right_eye_closed: false,
            continuous_time: 0.0,
            error_code: Some(code),
        }
    }

    /// Whether the continuous closure threshold is met
    pub fn is_alert(&self) -> bool {
        self.is_drowsy == 1
    }

    /// Whether this frame was rejected
    pub fn is_error(&self) -> bool {
        self.is_drowsy == -1
    }
}
