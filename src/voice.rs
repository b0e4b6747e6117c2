use std::fmt;

use crate::drums::DrumHit;
use crate::envelope::Envelope;
use crate::waveform::{Shape, WaveformType, sample_count, sample_time};

/// One component of an additive voice: `shape(freq * multiple) * weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub multiple: f32,
    pub weight: f32,
    pub shape: Shape,
}

const fn sine(multiple: f32, weight: f32) -> Partial {
    Partial { multiple, weight, shape: Shape::Sine }
}

/// Gain followed by a symmetric hard clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    pub gain: f32,
    pub ceiling: f32,
}

/// Extra gain on the first `seconds` of a note, falling linearly from `start_gain` to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transient {
    pub seconds: f32,
    pub start_gain: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRecipe {
    pub partials: &'static [Partial],
    /// Applied to the sum of `partials` only.
    pub drive: Option<Drive>,
    /// Added after the drive stage.
    pub overtones: &'static [Partial],
    pub transient: Option<Transient>,
    pub clip: Option<f32>,
    /// Output scale on top of velocity.
    pub level: f32,
    pub envelope: Envelope,
}

// Plain sine voice; the other recipes override from here.
const PLAIN: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 1.0)],
    drive: None,
    overtones: &[],
    transient: None,
    clip: None,
    level: 1.0,
    envelope: Envelope::new(0.05, 0.1),
};

pub static SYNTH_SINE: VoiceRecipe = PLAIN;

pub static SYNTH_SQUARE: VoiceRecipe = VoiceRecipe {
    partials: &[Partial { multiple: 1.0, weight: 0.5, shape: Shape::Square }],
    ..PLAIN
};

pub static SYNTH_SAWTOOTH: VoiceRecipe = VoiceRecipe {
    partials: &[Partial { multiple: 1.0, weight: 0.5, shape: Shape::Sawtooth }],
    ..PLAIN
};

pub static SYNTH_PAD: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 0.5), sine(2.0, 0.25), sine(0.5, 0.25)],
    envelope: Envelope::new(0.3, 0.4),
    ..PLAIN
};

pub static GUITAR_CLEAN: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 0.6), sine(2.0, 0.25), sine(3.0, 0.10), sine(4.0, 0.05)],
    envelope: Envelope::new(0.01, 0.2),
    ..PLAIN
};

pub static GUITAR_DISTORTION: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 1.0)],
    drive: Some(Drive { gain: 3.0, ceiling: 0.8 }),
    overtones: &[sine(2.0, 0.3)],
    transient: None,
    clip: Some(1.0),
    level: 0.7,
    envelope: Envelope::new(0.01, 0.15),
};

pub static BASS_FINGER: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 0.7), sine(2.0, 0.2), sine(3.0, 0.1)],
    envelope: Envelope::new(0.02, 0.15),
    ..PLAIN
};

pub static BASS_SLAP: VoiceRecipe = VoiceRecipe {
    partials: &[sine(1.0, 0.5), sine(2.0, 0.3), sine(4.0, 0.2)],
    drive: None,
    overtones: &[],
    transient: Some(Transient { seconds: 0.02, start_gain: 2.0 }),
    clip: Some(1.0),
    level: 1.0,
    envelope: Envelope::new(0.005, 0.1),
};

impl VoiceRecipe {
    pub fn render(&self, freq: f32, duration: f32, velocity: f32) -> Vec<f32> {
        let len = sample_count(duration as f64);
        let freq = freq as f64;
        let gain = velocity as f64 * self.level as f64;

        let transient_len = self
            .transient
            .map(|tr| sample_count(tr.seconds as f64))
            .unwrap_or(0);

        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let t = sample_time(i);
            let mut s = sum_partials(self.partials, freq, t);

            if let Some(drive) = self.drive {
                let ceiling = drive.ceiling as f64;
                s = (s * drive.gain as f64).clamp(-ceiling, ceiling);
            }

            s += sum_partials(self.overtones, freq, t);

            if let Some(tr) = self.transient {
                if i < transient_len {
                    s *= linear(tr.start_gain as f64, 1.0, i, transient_len);
                }
            }

            if let Some(c) = self.clip {
                let c = c as f64;
                s = s.clamp(-c, c);
            }

            out.push((s * gain) as f32);
        }

        self.envelope.apply_in_place(&mut out);
        out
    }
}

#[inline]
fn sum_partials(partials: &[Partial], freq: f64, t: f64) -> f64 {
    partials
        .iter()
        .map(|p| p.shape.sample(freq * p.multiple as f64, t) * p.weight as f64)
        .sum()
}

// i-th of n evenly spaced points from `from` to `to`, endpoints included
#[inline]
fn linear(from: f64, to: f64, i: usize, n: usize) -> f64 {
    if n <= 1 {
        return from;
    }
    from + (to - from) * i as f64 / (n - 1) as f64
}

/// A stacked copy of a recipe at `freq * ratio`, mixed in at `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub ratio: f32,
    pub weight: f32,
}

const UNISON: &[Layer] = &[Layer { ratio: 1.0, weight: 1.0 }];

/// Root, just fifth and octave.
const POWER_CHORD: &[Layer] = &[
    Layer { ratio: 1.0, weight: 0.4 },
    Layer { ratio: 1.5, weight: 0.35 },
    Layer { ratio: 2.0, weight: 0.25 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voice {
    Synth(WaveformType),
    GuitarClean,
    GuitarDistortion,
    GuitarPowerChord,
    BassFinger,
    BassSlap,
    Drum(DrumHit),
}

impl Voice {
    /// `None` for percussion, which has no pitched recipe.
    pub fn recipe(&self) -> Option<&'static VoiceRecipe> {
        match self {
            Voice::Synth(wave) => Some(wave.recipe()),
            Voice::GuitarClean => Some(&GUITAR_CLEAN),
            Voice::GuitarDistortion | Voice::GuitarPowerChord => Some(&GUITAR_DISTORTION),
            Voice::BassFinger => Some(&BASS_FINGER),
            Voice::BassSlap => Some(&BASS_SLAP),
            Voice::Drum(_) => None,
        }
    }

    pub fn layers(&self) -> &'static [Layer] {
        match self {
            Voice::GuitarPowerChord => POWER_CHORD,
            _ => UNISON,
        }
    }

    /// Percussion ignores `freq` and `duration` and plays its own default length.
    pub fn render(&self, freq: f32, duration: f32, velocity: f32, rng: &mut fastrand::Rng) -> Vec<f32> {
        let recipe = match (self, self.recipe()) {
            (Voice::Drum(hit), _) => return hit.render(velocity, rng),
            (_, Some(recipe)) => recipe,
            (_, None) => return Vec::new(),
        };

        match self.layers() {
            [single] if single.ratio == 1.0 && single.weight == 1.0 => {
                recipe.render(freq, duration, velocity)
            }
            layers => {
                let mut out = vec![0.0f32; sample_count(duration as f64)];
                for layer in layers {
                    let part = recipe.render(freq * layer.ratio, duration, velocity);
                    for (o, s) in out.iter_mut().zip(part) {
                        *o += s * layer.weight;
                    }
                }
                out
            }
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Voice::Synth(WaveformType::Sine) => write!(f, "synth:sine"),
            Voice::Synth(WaveformType::Square) => write!(f, "synth:square"),
            Voice::Synth(WaveformType::Sawtooth) => write!(f, "synth:sawtooth"),
            Voice::Synth(WaveformType::Pad) => write!(f, "synth:pad"),
            Voice::GuitarClean => write!(f, "guitar:clean"),
            Voice::GuitarDistortion => write!(f, "guitar:distortion"),
            Voice::GuitarPowerChord => write!(f, "guitar:power"),
            Voice::BassFinger => write!(f, "bass:finger"),
            Voice::BassSlap => write!(f, "bass:slap"),
            Voice::Drum(hit) => write!(f, "drums:{}", hit),
        }
    }
}
