//! Exponential Moving Average Filter

/// Exponential moving average filter for frame-to-frame noise reduction.
///
/// Seeded with the first sample: no smoothing is applied until a second
/// value arrives.
#[derive(Debug, Clone)]
pub struct EmaFilter {
    /// Smoothing factor (0-1, higher = more weight on recent)
    alpha: f64,
    /// Current filtered value, `None` until seeded
    value: Option<f64>,
}

impl EmaFilter {
    /// Create a new filter with the given smoothing factor
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    /// Add a sample and get the filtered output
    pub fn update(&mut self, sample: f64) -> f64 {
        let filtered = match self.value {
            None => sample,
            Some(prev) => self.alpha * sample + (1.0 - self.alpha) * prev,
        };
        self.value = Some(filtered);
        filtered
    }

    /// Current filtered value, if seeded
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Whether the filter has seen at least one sample
    pub fn is_seeded(&self) -> bool {
        self.value.is_some()
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reset the filter to the unseeded state
    pub fn reset(&mut self) {
        self.value = None;
    }
}
