use crate::waveform::SAMPLE_RATE;

/// Linear attack/release envelope; everything between the ramps holds at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope { attack: 0.05, release: 0.1 }
    }
}

impl Envelope {
    pub const fn new(attack: f32, release: f32) -> Self {
        Envelope { attack, release }
    }

    pub fn attack_samples(&self, len: usize) -> usize {
        ramp_samples(self.attack).min(len)
    }

    pub fn release_samples(&self, len: usize) -> usize {
        ramp_samples(self.release).min(len)
    }

    /// Per-sample multiplier for a buffer of `len` samples.
    ///
    /// The attack ramp is applied first and the release ramp second, each clamped
    /// to the buffer on its own. When they overlap both multiply the same samples,
    /// so the gain stays inside `[0, 1]`.
    pub fn gains(&self, len: usize) -> Vec<f32> {
        let mut gains = vec![1.0f32; len];

        let attack = self.attack_samples(len);
        for (i, g) in gains.iter_mut().take(attack).enumerate() {
            *g *= ramp(i, attack);
        }

        let release = self.release_samples(len);
        let start = len - release;
        for (i, g) in gains[start..].iter_mut().enumerate() {
            *g *= 1.0 - ramp(i, release);
        }

        gains
    }

    pub fn apply_in_place(&self, buffer: &mut [f32]) {
        let gains = self.gains(buffer.len());
        for (s, g) in buffer.iter_mut().zip(gains) {
            *s *= g;
        }
    }
}

/// Shapes a copy of `buffer`. Ramp lengths are clamped to `buffer.len()`, which
/// is the note duration in samples.
pub fn apply(buffer: &[f32], attack: f32, release: f32) -> Vec<f32> {
    let mut shaped = buffer.to_vec();
    Envelope::new(attack, release).apply_in_place(&mut shaped);
    shaped
}

fn ramp_samples(seconds: f32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds as f64 * SAMPLE_RATE as f64).round() as usize
}

// i-th point of an n-point 0..=1 ramp (both endpoints included)
#[inline]
fn ramp(i: usize, n: usize) -> f32 {
    if n <= 1 { 0.0 } else { i as f32 / (n - 1) as f32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_touch_zero_at_both_ends() {
        let gains = Envelope::new(0.01, 0.02).gains(4410);
        assert_eq!(gains[0], 0.0);
        assert_eq!(*gains.last().unwrap(), 0.0);
        assert_eq!(gains[441], 1.0);
        assert_eq!(gains[2000], 1.0);
        assert_eq!(gains[4410 - 882], 1.0);
    }

    #[test]
    fn attack_is_linear() {
        let gains = Envelope::new(0.1, 0.0).gains(44100);
        let n = 4410;
        assert!((gains[n / 2] - (n / 2) as f32 / (n - 1) as f32).abs() < 1e-6);
        assert_eq!(gains[n - 1], 1.0);
        assert!(gains.windows(2).take(n).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn zero_ramps_leave_buffer_unchanged() {
        let buffer = vec![0.5f32; 100];
        assert_eq!(apply(&buffer, 0.0, 0.0), buffer);
    }

    #[test]
    fn ramps_are_clamped_to_buffer() {
        // attack alone longer than the buffer
        let gains = Envelope::new(1.0, 0.0).gains(10);
        assert_eq!(gains.len(), 10);
        assert_eq!(gains[0], 0.0);
        assert_eq!(gains[9], 1.0);
    }

    // Overlapping ramps on very short notes have no single musically correct
    // answer. Only check the gain stays bounded and the ends are silent.
    #[test]
    fn overlapping_ramps_stay_bounded() {
        let len = 300;
        let gains = Envelope::new(0.3, 0.4).gains(len);
        assert_eq!(gains.len(), len);
        assert!(gains.iter().all(|g| (0.0..=1.0).contains(g)));
        assert_eq!(gains[0], 0.0);
        assert_eq!(gains[len - 1], 0.0);
    }

    #[test]
    fn empty_buffer() {
        assert!(Envelope::default().gains(0).is_empty());
    }
}
