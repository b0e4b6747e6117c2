use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::error::SynthError;
use crate::waveform::{SAMPLE_RATE, sample_count, sample_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumHit {
    Kick,
    Snare,
    HiHat,
    Clap,
}

impl DrumHit {
    pub const ALL: [DrumHit; 4] = [DrumHit::Kick, DrumHit::Snare, DrumHit::HiHat, DrumHit::Clap];

    pub fn default_duration(&self) -> f32 {
        match self {
            DrumHit::Kick => 0.3,
            DrumHit::Snare => 0.2,
            DrumHit::HiHat => 0.1,
            DrumHit::Clap => 0.15,
        }
    }

    pub fn render(&self, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
        self.render_for(self.default_duration(), velocity, rng)
    }

    pub fn render_for(&self, duration: f32, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
        match self {
            DrumHit::Kick => kick(duration, velocity),
            DrumHit::Snare => snare(duration, velocity, rng),
            DrumHit::HiHat => hihat(duration, velocity, rng),
            DrumHit::Clap => clap(duration, velocity, rng),
        }
    }
}

impl FromStr for DrumHit {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kick" | "bd" => Ok(DrumHit::Kick),
            "snare" | "sd" => Ok(DrumHit::Snare),
            "hihat" | "hi-hat" | "hat" | "hh" => Ok(DrumHit::HiHat),
            "clap" | "cp" => Ok(DrumHit::Clap),
            other => Err(SynthError::InvalidInstrument(format!("Unknown drum '{}'", other))),
        }
    }
}

impl fmt::Display for DrumHit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DrumHit::Kick => "Kick",
            DrumHit::Snare => "Snare",
            DrumHit::HiHat => "HiHat",
            DrumHit::Clap => "Clap",
        };
        write!(f, "{}", name)
    }
}

/// Swept kick frequency: 190 Hz at the hit, settling to 40 Hz.
pub fn kick_frequency(t: f64) -> f64 {
    150.0 * (-20.0 * t).exp() + 40.0
}

// Running sum of the per-sample phase increments (increment of sample i included).
fn kick_phases(len: usize) -> Vec<f64> {
    let mut phase = 0.0;
    (0..len)
        .map(|i| {
            phase += TAU * kick_frequency(sample_time(i)) / SAMPLE_RATE as f64;
            phase
        })
        .collect()
}

pub fn kick(duration: f32, velocity: f32) -> Vec<f32> {
    let velocity = velocity as f64;
    kick_phases(sample_count(duration as f64))
        .into_iter()
        .enumerate()
        .map(|(i, phase)| {
            let t = sample_time(i);
            (phase.sin() * (-10.0 * t).exp() * velocity) as f32
        })
        .collect()
}

pub fn snare(duration: f32, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
    let gain = velocity as f64 * 0.8;
    (0..sample_count(duration as f64))
        .map(|i| {
            let t = sample_time(i);
            let tone = (TAU * 200.0 * t).sin() * (-20.0 * t).exp();
            let noise = noise(rng) * (-15.0 * t).exp() * 0.5;
            ((tone + noise) * gain) as f32
        })
        .collect()
}

/// Fast decay stands in for a high-pass filter.
pub fn hihat(duration: f32, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
    let gain = velocity as f64 * 0.4;
    (0..sample_count(duration as f64))
        .map(|i| {
            let t = sample_time(i);
            (noise(rng) * (-30.0 * t).exp() * gain) as f32
        })
        .collect()
}

const CLAP_BURSTS: usize = 4;
const CLAP_SPACING: f64 = 0.01;

pub fn clap(duration: f32, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
    let len = sample_count(duration as f64);
    let onsets: Vec<usize> = (0..CLAP_BURSTS)
        .map(|k| (k as f64 * CLAP_SPACING * SAMPLE_RATE as f64).round() as usize)
        .collect();

    let gain = velocity as f64 * 0.5;
    (0..len)
        .map(|i| {
            let t = sample_time(i);
            let bursts: f64 = onsets
                .iter()
                .filter(|&&onset| onset <= i)
                .map(|&onset| (-50.0 * sample_time(i - onset)).exp())
                .sum();
            (noise(rng) * bursts * (-20.0 * t).exp() * gain) as f32
        })
        .collect()
}

// uniform in [-1, 1)
#[inline]
fn noise(rng: &mut fastrand::Rng) -> f64 {
    rng.f64() * 2.0 - 1.0
}
