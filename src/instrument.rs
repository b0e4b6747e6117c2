use std::fmt;
use std::str::FromStr;

use crate::drums::DrumHit;
use crate::error::SynthError;
use crate::pitch::{Pitch, transpose};
use crate::voice::Voice;
use crate::waveform::WaveformType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuitarTone {
    Clean,
    Distortion,
    PowerChord,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BassStyle {
    Finger,
    Slap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstrumentKind {
    Synth(WaveformType),
    Guitar(GuitarTone),
    Bass(BassStyle),
    Drums,
}

impl InstrumentKind {
    pub fn synth() -> Self {
        InstrumentKind::Synth(WaveformType::Pad)
    }

    pub fn guitar() -> Self {
        InstrumentKind::Guitar(GuitarTone::Clean)
    }

    pub fn bass() -> Self {
        InstrumentKind::Bass(BassStyle::Finger)
    }

    /// Picks the voice and sounding frequency for one note. Drum notes select
    /// their hit by name and yield `None` when the name is unknown.
    pub fn voice_for(&self, note: &Note) -> Option<(Voice, f32)> {
        match self {
            InstrumentKind::Synth(wave) => Some((Voice::Synth(*wave), note.frequency())),
            InstrumentKind::Guitar(GuitarTone::Clean) => Some((Voice::GuitarClean, note.frequency())),
            InstrumentKind::Guitar(GuitarTone::Distortion) => Some((Voice::GuitarDistortion, note.frequency())),
            InstrumentKind::Guitar(GuitarTone::PowerChord) => Some((Voice::GuitarPowerChord, note.frequency())),
            // bass sounds an octave below the written pitch
            InstrumentKind::Bass(BassStyle::Finger) => Some((Voice::BassFinger, note.frequency() / 2.0)),
            InstrumentKind::Bass(BassStyle::Slap) => Some((Voice::BassSlap, note.frequency() / 2.0)),
            InstrumentKind::Drums => {
                let hit = note.pitch.name()?.parse::<DrumHit>().ok()?;
                Some((Voice::Drum(hit), 0.0))
            }
        }
    }
}

impl FromStr for InstrumentKind {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (family, variant) = match s.split_once(':') {
            Some((f, v)) => (f.trim(), Some(v.trim())),
            None => (s.as_str(), None),
        };

        let unknown = || SynthError::InvalidInstrument(format!("Unknown instrument '{}'", s));

        Ok(match (family, variant) {
            ("synth", None) => InstrumentKind::synth(),
            ("synth", Some(v)) => InstrumentKind::Synth(match v {
                "sine" => WaveformType::Sine,
                "square" => WaveformType::Square,
                "sawtooth" | "saw" => WaveformType::Sawtooth,
                "pad" => WaveformType::Pad,
                _ => return Err(unknown()),
            }),
            ("guitar", None) => InstrumentKind::guitar(),
            ("guitar", Some(v)) => InstrumentKind::Guitar(match v {
                "clean" => GuitarTone::Clean,
                "distortion" | "dist" => GuitarTone::Distortion,
                "power" | "powerchord" => GuitarTone::PowerChord,
                _ => return Err(unknown()),
            }),
            ("bass", None) => InstrumentKind::bass(),
            ("bass", Some(v)) => InstrumentKind::Bass(match v {
                "finger" => BassStyle::Finger,
                "slap" => BassStyle::Slap,
                _ => return Err(unknown()),
            }),
            ("drums", None) => InstrumentKind::Drums,
            _ => return Err(unknown()),
        })
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstrumentKind::Drums => write!(f, "drums"),
            InstrumentKind::Synth(wave) => write!(f, "{}", Voice::Synth(*wave)),
            InstrumentKind::Guitar(GuitarTone::Clean) => write!(f, "guitar:clean"),
            InstrumentKind::Guitar(GuitarTone::Distortion) => write!(f, "guitar:distortion"),
            InstrumentKind::Guitar(GuitarTone::PowerChord) => write!(f, "guitar:power"),
            InstrumentKind::Bass(BassStyle::Finger) => write!(f, "bass:finger"),
            InstrumentKind::Bass(BassStyle::Slap) => write!(f, "bass:slap"),
        }
    }
}

/// A timed note. `start` and `duration` are in beats.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub start: f32,
    pub duration: f32,
    pub velocity: f32,
}

impl Note {
    pub fn new(pitch: impl Into<Pitch>, start: f32, duration: f32, velocity: f32) -> Self {
        Note { pitch: pitch.into(), start, duration, velocity }
    }

    pub fn frequency(&self) -> f32 {
        self.pitch.frequency()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChordShape {
    Major,
    Minor,
    Seventh,
    Minor7,
    Sus4,
    Power,
}

impl ChordShape {
    pub fn semitones(&self) -> &'static [i32] {
        match self {
            ChordShape::Major => &[0, 4, 7],
            ChordShape::Minor => &[0, 3, 7],
            ChordShape::Seventh => &[0, 4, 7, 10],
            ChordShape::Minor7 => &[0, 3, 7, 10],
            ChordShape::Sus4 => &[0, 5, 7],
            ChordShape::Power => &[0, 7, 12],
        }
    }

    /// One note per chord tone. Velocity is shared between the tones so the
    /// chord is about as loud as a single note.
    pub fn notes(&self, root: &Pitch, start: f32, duration: f32, velocity: f32) -> Vec<Note> {
        let root_hz = root.frequency();
        let tones = self.semitones();
        let velocity = velocity / tones.len() as f32;
        tones
            .iter()
            .map(|&st| {
                let pitch = if st == 0 { root.clone() } else { Pitch::Frequency(transpose(root_hz, st)) };
                Note { pitch, start, duration, velocity }
            })
            .collect()
    }
}

impl FromStr for ChordShape {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" => Ok(ChordShape::Major),
            "minor" | "min" | "m" => Ok(ChordShape::Minor),
            "seventh" | "7" => Ok(ChordShape::Seventh),
            "minor7" | "m7" => Ok(ChordShape::Minor7),
            "sus4" => Ok(ChordShape::Sus4),
            "power" | "5" => Ok(ChordShape::Power),
            other => Err(SynthError::ParseError(format!("Unknown chord '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bass_drops_an_octave() {
        let note = Note::new("A4", 0.0, 1.0, 0.9);
        let (voice, hz) = InstrumentKind::bass().voice_for(&note).unwrap();
        assert_eq!(voice, Voice::BassFinger);
        assert_eq!(hz, 220.0);
    }

    #[test]
    fn drums_select_hit_by_name() {
        let kick = Note::new("Kick", 0.0, 1.0, 0.9);
        let cowbell = Note::new("Cowbell", 0.0, 1.0, 0.9);
        let raw = Note::new(100.0f32, 0.0, 1.0, 0.9);
        assert_eq!(InstrumentKind::Drums.voice_for(&kick).unwrap().0, Voice::Drum(DrumHit::Kick));
        assert!(InstrumentKind::Drums.voice_for(&cowbell).is_none());
        assert!(InstrumentKind::Drums.voice_for(&raw).is_none());
    }

    #[test]
    fn instrument_names_round_trip() {
        for name in [
            "synth:sine", "synth:square", "synth:sawtooth", "synth:pad",
            "guitar:clean", "guitar:distortion", "guitar:power",
            "bass:finger", "bass:slap", "drums",
        ] {
            let kind: InstrumentKind = name.parse().unwrap();
            assert_eq!(kind.to_string(), name);
        }
        assert_eq!("Guitar".parse::<InstrumentKind>().unwrap(), InstrumentKind::guitar());
        assert!("kazoo".parse::<InstrumentKind>().is_err());
        assert!("bass:fretless".parse::<InstrumentKind>().is_err());
    }

    #[test]
    fn chord_expands_into_tones() {
        let notes = ChordShape::Major.notes(&Pitch::from("C4"), 4.0, 4.0, 0.6);
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].pitch, Pitch::from("C4"));
        assert!((notes[1].frequency() - 329.63).abs() < 0.01);
        assert!((notes[2].frequency() - 392.00).abs() < 0.01);
        assert!(notes.iter().all(|n| n.start == 4.0 && (n.velocity - 0.2).abs() < 1e-6));
    }
}
