//! Per-frame drowsiness evaluation

use serde::Serialize;
use signal_prep::{ChannelStats, SignalChannel};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, DetectorConfig};
use crate::model::{ErrorCode, FrameResult, InputFrame};
use crate::state::EyeMonitor;
use crate::timer::ContinuousTimer;

/// Unexpected computation fault, mapped to `INTERNAL_ERROR` at the
/// `update` boundary
#[derive(Debug, Error)]
enum EvalFault {
    #[error("timer produced non-finite duration: {duration}")]
    NonFiniteDuration { duration: f64 },
}

/// Diagnostic snapshot of the detector's internal state
#[derive(Debug, Clone, Serialize)]
pub struct DetectorSnapshot {
    /// Last accepted frame number, `None` before the first accepted frame
    pub last_frame_num: Option<i64>,
    /// Whether the closure timer is accumulating
    pub timer_active: bool,
    /// Current accumulated closure duration (seconds)
    pub continuous_time: f64,
    /// Left eye channel statistics
    pub left_eye: ChannelStats,
    /// Right eye channel statistics
    pub right_eye: ChannelStats,
    /// Face confidence channel statistics
    pub face_confidence: ChannelStats,
}

/// Per-frame continuous eye-closure evaluator.
///
/// Owns one signal channel per eye, one for face confidence, and the
/// closure timer. One instance per monitored subject/stream; instances
/// share no state. `update` is synchronous, O(1), and never fails at
/// the API level - rejected frames are reported through the result's
/// `error_code`.
pub struct DrowsyDetector {
    config: DetectorConfig,
    left_eye: EyeMonitor,
    right_eye: EyeMonitor,
    face_confidence: SignalChannel,
    timer: ContinuousTimer,
    last_frame_num: Option<i64>,
}

impl DrowsyDetector {
    /// Create a detector from a validated configuration.
    ///
    /// Out-of-range config values are rejected here, before any frame
    /// is processed.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(?config, "creating drowsy detector");
        Ok(Self {
            left_eye: EyeMonitor::new(
                "left_eye",
                config.left_eye_close_threshold,
                config.smoothing(),
            ),
            right_eye: EyeMonitor::new(
                "right_eye",
                config.right_eye_close_threshold,
                config.smoothing(),
            ),
            // Face confidence is substituted and clamped but never smoothed
            face_confidence: SignalChannel::new("face_confidence"),
            timer: ContinuousTimer::new(config.continuous_close_time),
            last_frame_num: None,
            config,
        })
    }

    /// Evaluate one frame.
    ///
    /// Always returns a well-formed result; unexpected internal faults
    /// are reported as `INTERNAL_ERROR` after a defensive state reset.
    pub fn update(&mut self, frame: &InputFrame) -> FrameResult {
        match self.evaluate(frame) {
            Ok(result) => result,
            Err(fault) => {
                error!(frame_num = frame.frame_num, %fault, "internal fault during update");
                self.clear_signal_state();
                FrameResult::error(frame.frame_num, ErrorCode::InternalError)
            }
        }
    }

    fn evaluate(&mut self, frame: &InputFrame) -> Result<FrameResult, EvalFault> {
        // Stale frames must not perturb filters or the timer
        if let Some(last) = self.last_frame_num {
            if frame.frame_num <= last {
                warn!(
                    frame_num = frame.frame_num,
                    last_frame_num = last,
                    "dropping out-of-order frame"
                );
                return Ok(FrameResult::error(frame.frame_num, ErrorCode::InvalidFrameNum));
            }
        }

        // Eye openness is unreliable without a confident face detection;
        // losing the face hard-resets the closure state
        let (face_conf, _) = self.face_confidence.sanitize(frame.face_confidence);
        if face_conf < self.config.face_conf_threshold {
            debug!(
                frame_num = frame.frame_num,
                face_conf,
                threshold = self.config.face_conf_threshold,
                "low face confidence"
            );
            self.clear_signal_state();
            return Ok(FrameResult::error(
                frame.frame_num,
                ErrorCode::LowFaceConfidence,
            ));
        }

        let left = self.left_eye.update(frame.left_eye_open);
        let right = self.right_eye.update(frame.right_eye_open);

        let qualifying = left.closed && right.closed;
        let continuous_time = self.timer.step(qualifying, frame.dt);
        if !continuous_time.is_finite() {
            return Err(EvalFault::NonFiniteDuration {
                duration: continuous_time,
            });
        }

        let is_drowsy = if self.timer.threshold_met() {
            info!(frame_num = frame.frame_num, continuous_time, "drowsiness detected");
            1
        } else {
            0
        };

        self.last_frame_num = Some(frame.frame_num);

        debug!(
            frame_num = frame.frame_num,
            is_drowsy,
            left_closed = left.closed,
            right_closed = right.closed,
            continuous_time,
            "frame evaluated"
        );

        Ok(FrameResult {
            frame_num: frame.frame_num,
            is_drowsy,
            left_eye_closed: left.closed,
            right_eye_closed: right.closed,
            continuous_time,
            error_code: None,
        })
    }

    /// Clear eye filters and the closure timer
    fn clear_signal_state(&mut self) {
        self.left_eye.clear();
        self.right_eye.clear();
        self.timer.reset();
    }

    /// Full reset, for a subject/stream change or after a prolonged gap.
    ///
    /// Clears filter states, the timer, the face confidence history, and
    /// the frame ordering guard.
    pub fn reset(&mut self) {
        self.clear_signal_state();
        self.face_confidence.clear();
        self.last_frame_num = None;
        info!("detector reset");
    }

    /// Configuration this detector was built with
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Diagnostic snapshot of internal state
    pub fn snapshot(&self) -> DetectorSnapshot {
        DetectorSnapshot {
            last_frame_num: self.last_frame_num,
            timer_active: self.timer.is_active(),
            continuous_time: self.timer.duration(),
            left_eye: self.left_eye.stats(),
            right_eye: self.right_eye.stats(),
            face_confidence: self.face_confidence.stats(),
        }
    }
}
