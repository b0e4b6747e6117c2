use std::f64::consts::TAU;

use crate::voice::{self, VoiceRecipe};

/// Shared by every buffer the engine produces.
pub const SAMPLE_RATE: u32 = 44_100;

/// `round(duration * SAMPLE_RATE)`, zero for non-positive or non-finite durations.
pub fn sample_count(duration_secs: f64) -> usize {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    (duration_secs * SAMPLE_RATE as f64).round() as usize
}

/// Time of sample `i`. The endpoint of a buffer is never sampled.
#[inline]
pub fn sample_time(i: usize) -> f64 {
    i as f64 / SAMPLE_RATE as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformType {
    Sine,
    Square,
    Sawtooth,
    Pad,
}

impl WaveformType {
    pub fn recipe(&self) -> &'static VoiceRecipe {
        match self {
            WaveformType::Sine => &voice::SYNTH_SINE,
            WaveformType::Square => &voice::SYNTH_SQUARE,
            WaveformType::Sawtooth => &voice::SYNTH_SAWTOOTH,
            WaveformType::Pad => &voice::SYNTH_PAD,
        }
    }

    pub fn generate(&self, freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
        self.recipe().render(freq, duration, velocity)
    }
}

/// Raw (unscaled, unenveloped) periodic shapes a recipe partial is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sine,
    Square,
    Sawtooth,
}

impl Shape {
    #[inline]
    pub fn sample(&self, freq: f64, t: f64) -> f64 {
        match self {
            Shape::Sine => (TAU * freq * t).sin(),
            Shape::Square => {
                let s = (TAU * freq * t).sin();
                if s > 0.0 { 1.0 } else if s < 0.0 { -1.0 } else { 0.0 }
            }
            Shape::Sawtooth => {
                let x = t * freq;
                2.0 * (x - (0.5 + x).floor())
            }
        }
    }
}

pub fn sine(freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
    WaveformType::Sine.generate(freq, duration, velocity)
}

pub fn square(freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
    WaveformType::Square.generate(freq, duration, velocity)
}

pub fn sawtooth(freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
    WaveformType::Sawtooth.generate(freq, duration, velocity)
}

pub fn pad(freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
    WaveformType::Pad.generate(freq, duration, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;

    const ALL: [WaveformType; 4] = [
        WaveformType::Sine,
        WaveformType::Square,
        WaveformType::Sawtooth,
        WaveformType::Pad,
    ];

    #[test]
    fn lengths_follow_rounding() {
        for wave in ALL {
            assert_eq!(wave.generate(440.0, 0.5, 1.0).len(), 22050);
            assert_eq!(wave.generate(440.0, 0.0000113, 1.0).len(), 0);
            assert_eq!(wave.generate(100.0, 0.00002, 1.0).len(), 1);
            assert_eq!(wave.generate(440.0, 1.0 / 3.0, 1.0).len(), 14700);
        }
    }

    #[test]
    fn sample_count_rejects_bad_durations() {
        assert_eq!(sample_count(-1.0), 0);
        assert_eq!(sample_count(f64::NAN), 0);
        assert_eq!(sample_count(0.25), 11025);
    }

    #[test]
    fn square_is_half_scaled() {
        let v = 0.8;
        let wave = square(220.0, 0.3, v);
        assert!(wave.iter().all(|s| s.abs() <= 0.5 * v + 1e-6));
        // middle of the note sits on the plateau
        let peak = wave.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!((peak - 0.4).abs() < 1e-6);
    }

    #[test]
    fn sawtooth_ramps_between_minus_one_and_one() {
        for i in 0..200 {
            let s = Shape::Sawtooth.sample(3.0, i as f64 / 200.0);
            assert!((-1.0..1.0).contains(&s));
        }
        assert_eq!(Shape::Sawtooth.sample(1.0, 0.0), 0.0);
        assert!((Shape::Sawtooth.sample(1.0, 0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn silent_at_zero_velocity() {
        for wave in ALL {
            assert!(wave.generate(330.0, 0.2, 0.0).iter().all(|s| *s == 0.0));
        }
    }

    #[test]
    fn envelopes_per_waveform() {
        assert_eq!(WaveformType::Sine.recipe().envelope, Envelope::new(0.05, 0.1));
        assert_eq!(WaveformType::Pad.recipe().envelope, Envelope::new(0.3, 0.4));
    }
}
