//! Small DSP building blocks shared by the built-in effects.

use std::f64::consts::PI;

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Which response a [`Biquad`] is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// Attenuate below the cutoff.
    HighPass,
    /// Attenuate above the cutoff.
    LowPass,
}

/// Direct Form I biquad with RBJ cookbook coefficients.
///
/// State is kept in `f64`; recordings are processed offline, so there is no
/// reason to give up headroom in the feedback path.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Passthrough filter (`y[n] = x[n]`).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Recompute coefficients. The cutoff is clamped below Nyquist.
    ///
    /// A sample rate with no room between 1 Hz and Nyquist (including zero,
    /// negative and non-finite rates) leaves the filter as a passthrough.
    pub fn configure(&mut self, shape: FilterShape, cutoff_hz: f32, q: f32, sample_rate: f64) {
        let upper = sample_rate * 0.5 * 0.99;
        if !(upper.is_finite() && upper >= 1.0) {
            *self = Self::new();
            return;
        }
        let frequency = f64::from(cutoff_hz).clamp(1.0, upper);
        let q = f64::from(q).max(0.05);

        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        let (b0, b1, b2) = match shape {
            FilterShape::LowPass => {
                let b = (1.0 - cos_omega) / 2.0;
                (b, 1.0 - cos_omega, b)
            }
            FilterShape::HighPass => {
                let b = (1.0 + cos_omega) / 2.0;
                (b, -(1.0 + cos_omega), b)
            }
        };
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let x = f64::from(input);
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y as f32
    }

    /// Clear the delay lines, keeping coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Peak-following noise gate for one channel.
#[derive(Debug, Clone)]
pub struct GateState {
    envelope: f32,
    gain: f32,
    threshold: f32,
    release_coeff: f32,
    smooth_coeff: f32,
}

impl GateState {
    /// Closed gate with neutral coefficients.
    pub fn new() -> Self {
        Self {
            envelope: 0.0,
            gain: 0.0,
            threshold: 0.0,
            release_coeff: 0.0,
            smooth_coeff: 1.0,
        }
    }

    /// Recompute threshold and time constants.
    pub fn configure(&mut self, threshold_db: f32, release_ms: f32, sample_rate: f64) {
        let sr = sample_rate as f32;
        self.threshold = db_to_linear(threshold_db);
        self.release_coeff = (-1.0 / (release_ms.max(1.0) * 0.001 * sr)).exp();
        // 1 ms gain ramp keeps open/close transitions click-free
        self.smooth_coeff = 1.0 - (-1.0 / (0.001 * sr)).exp();
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        self.envelope = if level > self.envelope {
            level
        } else {
            self.envelope * self.release_coeff
        };
        let target = if self.envelope >= self.threshold { 1.0 } else { 0.0 };
        self.gain += (target - self.gain) * self.smooth_coeff;
        input * self.gain
    }

    /// Close the gate and forget the envelope.
    pub fn clear(&mut self) {
        self.envelope = 0.0;
        self.gain = 0.0;
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::new()
    }
}
