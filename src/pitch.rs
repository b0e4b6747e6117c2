use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::SynthError;

pub const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
pub const OCTAVES: RangeInclusive<i32> = 2..=6;

pub const A4_HZ: f32 = 440.0;
/// Returned for any symbol the note table does not cover.
pub const FALLBACK_HZ: f32 = 440.0;

const A4_INDEX: i32 = 9;

/// `440 * 2^(semitones / 12)`
pub fn equal_tempered(semitones_from_a4: i32) -> f32 {
    (A4_HZ as f64 * 2f64.powf(semitones_from_a4 as f64 / 12.0)) as f32
}

pub fn transpose(freq: f32, semitones: i32) -> f32 {
    (freq as f64 * 2f64.powf(semitones as f64 / 12.0)) as f32
}

/// Strict lookup of a symbol such as `F#3`. Only sharps and octaves 2-6 are known.
pub fn parse_note(symbol: &str) -> Result<f32, SynthError> {
    let symbol = symbol.trim();
    let split = symbol
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SynthError::ParseError(format!("Missing octave in note '{}'", symbol)))?;
    let (name, octave) = symbol.split_at(split);

    let index = NOTE_NAMES
        .iter()
        .position(|n| *n == name)
        .ok_or_else(|| SynthError::ParseError(format!("Invalid note '{}'", symbol)))? as i32;
    let octave: i32 = octave
        .parse()
        .map_err(|_| SynthError::ParseError(format!("Invalid octave in note '{}'", symbol)))?;

    if !OCTAVES.contains(&octave) {
        return Err(SynthError::ParseError(format!("Octave out of range in note '{}'", symbol)));
    }

    Ok(equal_tempered((octave - 4) * 12 + index - A4_INDEX))
}

/// Lenient lookup used while rendering: unknown symbols fall back to 440 Hz.
pub fn note_frequency(symbol: &str) -> f32 {
    parse_note(symbol).unwrap_or(FALLBACK_HZ)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pitch {
    Name(String),
    Frequency(f32),
}

impl Pitch {
    pub fn frequency(&self) -> f32 {
        match self {
            Pitch::Name(symbol) => note_frequency(symbol),
            Pitch::Frequency(hz) => *hz,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Pitch::Name(symbol) => Some(symbol),
            Pitch::Frequency(_) => None,
        }
    }
}

impl From<&str> for Pitch {
    fn from(symbol: &str) -> Self {
        Pitch::Name(symbol.to_string())
    }
}

impl From<f32> for Pitch {
    fn from(hz: f32) -> Self {
        Pitch::Frequency(hz)
    }
}

impl FromStr for Pitch {
    type Err = SynthError;

    // "261.6", "261.6hz" -> raw frequency, anything else is kept as a symbol
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SynthError::ParseError("Empty pitch".to_string()));
        }

        let digits = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .unwrap_or(s);
        match digits.trim().parse::<f32>() {
            Ok(hz) if hz.is_finite() && hz > 0.0 => Ok(Pitch::Frequency(hz)),
            Ok(_) => Err(SynthError::ParseError(format!("Invalid frequency '{}'", s))),
            Err(_) => Ok(Pitch::Name(s.to_string())),
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pitch::Name(symbol) => write!(f, "{}", symbol),
            Pitch::Frequency(hz) => write!(f, "{}hz", hz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn a4_is_anchor() {
        assert_eq!(parse_note("A4").unwrap(), 440.0);
    }

    #[test]
    fn known_notes_match_equal_temperament() {
        assert!(close(note_frequency("C4"), 261.63));
        assert!(close(note_frequency("F#3"), 185.00));
        assert!(close(note_frequency("A3"), 220.0));
        assert!(close(note_frequency("C2"), 65.41));
        assert!(close(note_frequency("B6"), 1975.53));
    }

    #[test]
    fn octave_doubles_frequency() {
        for name in NOTE_NAMES {
            let low = note_frequency(&format!("{}3", name));
            let high = note_frequency(&format!("{}4", name));
            assert!((high / low - 2.0).abs() < 1e-4, "{}", name);
        }
    }

    #[test]
    fn unknown_symbols_fall_back() {
        assert_eq!(note_frequency("H4"), FALLBACK_HZ);
        assert_eq!(note_frequency("C7"), FALLBACK_HZ);
        assert_eq!(note_frequency("Db4"), FALLBACK_HZ);
        assert_eq!(note_frequency(""), FALLBACK_HZ);
        assert!(parse_note("C7").is_err());
        assert!(parse_note("X").is_err());
    }

    #[test]
    fn transpose_fifth() {
        assert!(close(transpose(440.0, 7), 659.26));
        assert!(close(transpose(440.0, -12), 220.0));
    }

    #[test]
    fn pitch_from_str() {
        assert_eq!("A4".parse::<Pitch>().unwrap(), Pitch::Name("A4".to_string()));
        assert_eq!("261.5hz".parse::<Pitch>().unwrap(), Pitch::Frequency(261.5));
        assert_eq!("98".parse::<Pitch>().unwrap().frequency(), 98.0);
        assert!("-5".parse::<Pitch>().is_err());
        assert_eq!(Pitch::from("Kick").frequency(), FALLBACK_HZ);
    }
}
