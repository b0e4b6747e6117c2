/// Peak level every mix is normalized to.
pub const HEADROOM_PEAK: f32 = 0.9;

/// Sums `(buffer, weight)` pairs into one buffer of `length` samples. Shorter
/// inputs are zero-padded, longer ones truncated.
pub fn mix<B: AsRef<[f32]>>(inputs: &[(B, f32)], length: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; length];
    for (buffer, weight) in inputs {
        for (o, s) in out.iter_mut().zip(buffer.as_ref()) {
            *o += s * weight;
        }
    }
    out
}

pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

/// Scales `buffer` so its peak is `target`. A silent buffer is left untouched.
pub fn normalize(buffer: &mut [f32], target: f32) {
    let current = peak(buffer);
    if current > 0.0 {
        let gain = target / current;
        buffer.iter_mut().for_each(|s| *s *= gain);
    }
}

/// `mix` followed by normalization to [`HEADROOM_PEAK`].
pub fn mix_down<B: AsRef<[f32]>>(inputs: &[(B, f32)], length: usize) -> Vec<f32> {
    let mut out = mix(inputs, length);
    normalize(&mut out, HEADROOM_PEAK);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_truncates() {
        let short = vec![1.0f32; 3];
        let long = vec![0.5f32; 10];
        let out = mix(&[(short, 1.0), (long, 2.0)], 5);
        assert_eq!(out, vec![2.0, 2.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn normalizes_to_headroom() {
        let a = vec![0.1f32, -3.0, 0.5];
        let b = vec![0.2f32, 0.2, 0.2];
        let out = mix_down(&[(a.as_slice(), 1.0), (b.as_slice(), 0.5)], 3);
        assert!((peak(&out) - HEADROOM_PEAK).abs() < 1e-6);
        assert!(out[1] < 0.0);
    }

    #[test]
    fn quiet_input_is_scaled_up() {
        let out = mix_down(&[(vec![0.001f32, -0.0005], 1.0)], 2);
        assert!((out[0] - 0.9).abs() < 1e-6);
        assert!((out[1] + 0.45).abs() < 1e-6);
    }

    #[test]
    fn silence_stays_silent() {
        let out = mix_down(&[(vec![0.0f32; 8], 1.0)], 16);
        assert_eq!(out, vec![0.0; 16]);
        let none: [(Vec<f32>, f32); 0] = [];
        assert_eq!(mix_down(&none, 4), vec![0.0; 4]);
    }
}
