// DSP utilities - Output hygiene for the real-time callback

/// Force values below the denormal range to zero.
///
/// Denormal floats can stall the FPU on some CPUs; the smoother's state is
/// the only place they can accumulate here.
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping via tanh.
///
/// Keeps the output inside [-1, 1] without the hard edges a clamp would
/// produce when overlapping tones sum above full scale.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

/// One-pole low-pass smoother for parameter changes.
///
/// y[n] = y[n-1] + α * (x[n] - y[n-1]); moving the volume slider ramps over
/// the time constant instead of clicking.
pub struct OnePoleSmoother {
    current: f32,
    coefficient: f32,
}

impl OnePoleSmoother {
    /// `time_constant_ms` is the time to cover ~63% of a step change.
    pub fn new(initial_value: f32, time_constant_ms: f32, sample_rate: f32) -> Self {
        let time_constant_samples = time_constant_ms * 0.001 * sample_rate;
        let coefficient = 1.0 / time_constant_samples;

        Self {
            current: initial_value,
            coefficient: coefficient.min(1.0),
        }
    }

    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.current += self.coefficient * (target - self.current);
        self.current = flush_denormals_to_zero(self.current);
        self.current
    }

    #[inline]
    pub fn reset(&mut self, value: f32) {
        self.current = value;
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormals() {
        assert_eq!(flush_denormals_to_zero(1e-20), 0.0);
        assert_eq!(flush_denormals_to_zero(0.1), 0.1);
        assert_eq!(flush_denormals_to_zero(-0.1), -0.1);
    }

    #[test]
    fn test_soft_clip_bounds() {
        assert!(soft_clip(10.0) <= 1.0);
        assert!(soft_clip(-10.0) >= -1.0);
        // Near zero the curve is close to identity.
        assert!((soft_clip(0.1) - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_smoother_converges() {
        let mut smoother = OnePoleSmoother::new(0.0, 10.0, 48000.0);

        let mut value = 0.0;
        for _ in 0..48000 {
            value = smoother.process(1.0);
        }
        assert!((value - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_smoother_moves_gradually() {
        let mut smoother = OnePoleSmoother::new(0.0, 10.0, 48000.0);

        let first = smoother.process(1.0);
        assert!(first > 0.0 && first < 0.1);
    }

    #[test]
    fn test_smoother_reset_jumps() {
        let mut smoother = OnePoleSmoother::new(0.0, 10.0, 48000.0);
        smoother.reset(0.5);
        assert_eq!(smoother.get(), 0.5);
    }
}
