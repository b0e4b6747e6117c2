use std::fmt;
use std::str::FromStr;

use crate::error::SynthError;
use crate::instrument::{BassStyle, GuitarTone, InstrumentKind, Note};
use crate::track::Track;
use crate::waveform::WaveformType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Electronic,
    Rock,
    Pop,
    Jazz,
    Ambient,
    Ballad,
    Trot,
}

impl Style {
    pub const ALL: [Style; 7] = [
        Style::Electronic,
        Style::Rock,
        Style::Pop,
        Style::Jazz,
        Style::Ambient,
        Style::Ballad,
        Style::Trot,
    ];

    pub fn bpm(&self) -> f32 {
        match self {
            Style::Electronic => 128.0,
            Style::Rock => 120.0,
            Style::Pop => 110.0,
            Style::Jazz => 95.0,
            Style::Ambient => 70.0,
            Style::Ballad => 72.0,
            Style::Trot => 115.0,
        }
    }

    /// Default variant for an instrument family in this style.
    pub fn instrument(&self, family: &str) -> Option<InstrumentKind> {
        match family {
            "synth" => Some(InstrumentKind::Synth(match self {
                Style::Ambient | Style::Electronic | Style::Ballad => WaveformType::Pad,
                Style::Trot => WaveformType::Square,
                _ => WaveformType::Sawtooth,
            })),
            "guitar" => Some(InstrumentKind::Guitar(match self {
                Style::Rock => GuitarTone::Distortion,
                _ => GuitarTone::Clean,
            })),
            "bass" => Some(InstrumentKind::Bass(match self {
                Style::Jazz => BassStyle::Slap,
                _ => BassStyle::Finger,
            })),
            "drums" => Some(InstrumentKind::Drums),
            _ => None,
        }
    }

    pub fn mix_weight(&self, instrument: &InstrumentKind) -> f32 {
        let ballad = *self == Style::Ballad;
        match instrument {
            InstrumentKind::Synth(_) | InstrumentKind::Guitar(_) => if ballad { 0.35 } else { 0.3 },
            InstrumentKind::Bass(_) => 0.25,
            InstrumentKind::Drums => if ballad { 0.25 } else { 0.35 },
        }
    }

    /// Deterministic drum notes for `total_beats` beats (bars of four).
    pub fn drum_pattern(&self, total_beats: u32) -> Vec<Note> {
        let mut notes = Vec::new();
        for beat in 0..total_beats {
            let at = beat as f32;
            let in_bar = beat % 4;
            match self {
                Style::Ballad => {
                    if in_bar == 0 {
                        notes.push(Note::new("Kick", at, 1.0, 0.6));
                    }
                    if in_bar == 2 {
                        notes.push(Note::new("Snare", at, 1.0, 0.5));
                    }
                    if beat % 2 == 0 {
                        notes.push(Note::new("HiHat", at, 1.0, 0.3));
                    }
                }
                Style::Trot => {
                    if beat % 2 == 0 {
                        notes.push(Note::new("Kick", at, 1.0, 0.9));
                    } else {
                        notes.push(Note::new("Snare", at, 1.0, 0.8));
                        notes.push(Note::new("HiHat", at, 1.0, 0.6));
                    }
                }
                _ => {
                    if in_bar == 0 || in_bar == 2 {
                        notes.push(Note::new("Kick", at, 1.0, 0.8));
                    }
                    if in_bar == 1 || in_bar == 3 {
                        notes.push(Note::new("Snare", at, 1.0, 0.7));
                    }
                    if beat % 2 == 0 {
                        notes.push(Note::new("HiHat", at, 1.0, 0.5));
                    }
                }
            }
        }
        notes
    }

    pub fn drum_track(&self, total_beats: u32) -> Track {
        Track::new("drums", InstrumentKind::Drums).with_notes(self.drum_pattern(total_beats))
    }
}

impl FromStr for Style {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronic" => Ok(Style::Electronic),
            "rock" => Ok(Style::Rock),
            "pop" => Ok(Style::Pop),
            "jazz" => Ok(Style::Jazz),
            "ambient" => Ok(Style::Ambient),
            "ballad" => Ok(Style::Ballad),
            "trot" => Ok(Style::Trot),
            other => Err(SynthError::ParseError(format!("Unknown style '{}'", other))),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Style::Electronic => "electronic",
            Style::Rock => "rock",
            Style::Pop => "pop",
            Style::Jazz => "jazz",
            Style::Ambient => "ambient",
            Style::Ballad => "ballad",
            Style::Trot => "trot",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drums::DrumHit;
    use crate::track::Timing;
    use crate::voice::Voice;

    fn onsets(track: &Track, timing: &Timing, hit: DrumHit) -> Vec<usize> {
        track
            .schedule(timing)
            .into_iter()
            .filter(|n| n.voice == Voice::Drum(hit))
            .map(|n| n.start_sample)
            .collect()
    }

    #[test]
    fn basic_pattern_counts_do_not_depend_on_tempo() {
        for bars in [2u32, 4] {
            let beats = bars * 4;
            let track = Style::Rock.drum_track(beats);
            for bpm in [80.0, 120.0, 160.0] {
                let timing = Timing::new(bpm, beats);
                let kicks = onsets(&track, &timing, DrumHit::Kick);
                let snares = onsets(&track, &timing, DrumHit::Snare);
                assert_eq!(kicks.len() as u32, bars * 2, "{} bpm", bpm);
                assert_eq!(snares.len() as u32, bars * 2, "{} bpm", bpm);
                assert_eq!(kicks[1], timing.beat_to_sample(2.0));
                assert_eq!(snares[0], timing.beat_to_sample(1.0));
            }
        }
    }

    #[test]
    fn ballad_and_trot_patterns() {
        let ballad = Style::Ballad.drum_pattern(8);
        assert_eq!(ballad.iter().filter(|n| n.pitch.name() == Some("Kick")).count(), 2);
        assert_eq!(ballad.iter().filter(|n| n.pitch.name() == Some("HiHat")).count(), 4);

        let trot = Style::Trot.drum_pattern(8);
        assert_eq!(trot.iter().filter(|n| n.pitch.name() == Some("Kick")).count(), 4);
        assert_eq!(trot.iter().filter(|n| n.pitch.name() == Some("Snare")).count(), 4);
    }

    #[test]
    fn style_defaults() {
        assert_eq!(Style::Electronic.bpm(), 128.0);
        assert_eq!(Style::Rock.instrument("guitar"), Some(InstrumentKind::Guitar(GuitarTone::Distortion)));
        assert_eq!(Style::Jazz.instrument("bass"), Some(InstrumentKind::Bass(BassStyle::Slap)));
        assert_eq!(Style::Trot.instrument("synth"), Some(InstrumentKind::Synth(WaveformType::Square)));
        assert_eq!(Style::Pop.instrument("synth"), Some(InstrumentKind::Synth(WaveformType::Sawtooth)));
        assert_eq!(Style::Pop.instrument("kazoo"), None);
        assert_eq!(Style::Ballad.mix_weight(&InstrumentKind::Drums), 0.25);
        assert_eq!(Style::Rock.mix_weight(&InstrumentKind::Drums), 0.35);
    }

    #[test]
    fn names_round_trip() {
        for style in Style::ALL {
            assert_eq!(style.to_string().parse::<Style>().unwrap(), style);
        }
    }
}
