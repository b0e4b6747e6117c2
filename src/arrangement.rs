use crate::error::SynthError;
use crate::instrument::{ChordShape, InstrumentKind, Note};
use crate::pitch::Pitch;
use crate::style::Style;
use crate::track::{Timing, Track};

pub const DEFAULT_TEMPO: f32 = 120.0;
pub const DEFAULT_BARS: u32 = 4;
pub const BEATS_PER_BAR: u32 = 4;
pub const DEFAULT_VELOCITY: f32 = 0.8;
pub const MAX_TEMPO: f32 = 1000.0;
/// Longest song that will be rendered, in seconds.
pub const MAX_SECONDS: f64 = 600.0;

/// `bars * 4`, or a `ParseError` when that does not fit.
pub fn bars_to_beats(bars: u32) -> Result<u32, SynthError> {
    bars.checked_mul(BEATS_PER_BAR)
        .ok_or_else(|| SynthError::ParseError(format!("Too many bars: {}", bars)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrangedTrack {
    pub track: Track,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub name: String,
    pub tempo: f32,
    pub total_beats: u32,
    pub style: Option<Style>,
    pub seed: Option<u64>,
    pub tracks: Vec<ArrangedTrack>,
}

impl Default for Arrangement {
    fn default() -> Self {
        Arrangement {
            name: "song".to_string(),
            tempo: DEFAULT_TEMPO,
            total_beats: DEFAULT_BARS * BEATS_PER_BAR,
            style: None,
            seed: None,
            tracks: Vec::new(),
        }
    }
}

// Track section as written; instrument defaults and weights depend on the
// style, which may be declared anywhere in the file.
struct PendingTrack {
    name: String,
    instrument: String,
    volume: Option<f32>,
    weight: Option<f32>,
    muted: bool,
    notes: Vec<Note>,
    patterns: Vec<Style>,
}

impl Arrangement {
    pub fn new(name: &str, tempo: f32, total_beats: u32) -> Self {
        Arrangement {
            name: name.to_string(),
            tempo,
            total_beats,
            ..Default::default()
        }
    }

    pub fn timing(&self) -> Timing {
        Timing::new(self.tempo, self.total_beats)
    }

    pub fn add_track(&mut self, track: Track, weight: f32) {
        self.tracks.push(ArrangedTrack { track, weight });
    }

    /// Track with the style's mix weight, or 1.0 without a style.
    pub fn add_styled_track(&mut self, track: Track) {
        let weight = self.style.map(|s| s.mix_weight(&track.instrument)).unwrap_or(1.0);
        self.add_track(track, weight);
    }

    pub fn total_samples(&self) -> usize {
        self.timing().total_samples()
    }

    /// Tempo within 1..=1000 BPM, at least one beat, at most `MAX_SECONDS` long.
    pub fn validate(&self) -> Result<(), SynthError> {
        if !(1.0..=MAX_TEMPO).contains(&self.tempo) {
            return Err(SynthError::ParseError(format!("Tempo out of range: {}", self.tempo)));
        }
        if self.total_beats == 0 {
            return Err(SynthError::ParseError("Song length must be at least one beat".to_string()));
        }
        let seconds = self.total_beats as f64 * self.timing().beat_seconds();
        if seconds > MAX_SECONDS {
            return Err(SynthError::ParseError(format!(
                "Song is {:.0}s long, the limit is {}s", seconds, MAX_SECONDS
            )));
        }
        Ok(())
    }

    pub fn from_song(content: &str) -> Result<Self, SynthError> {
        let mut arrangement = Arrangement::default();
        let mut tempo: Option<f32> = None;
        let mut bars: Option<u32> = None;
        let mut beats: Option<u32> = None;
        let mut pending: Vec<PendingTrack> = Vec::new();

        macro_rules! parse_field {
            ($line:expr, $prefix:expr, $field:expr) => {
                if let Some(v) = $line.strip_prefix($prefix) {
                    $field = Some(v.trim().parse()
                        .map_err(|_| SynthError::ParseError(format!("Invalid {}", $prefix)))?);
                    continue;
                }
            };
        }

        for (number, line) in content.lines().enumerate() {
            let line = line.split("//").next().unwrap_or("").trim();
            if line.is_empty() { continue; } // Comments (//) & empty lines

            if let Some(v) = line.strip_prefix("name:") {
                arrangement.name = v.trim().to_string();
            } else if let Some(v) = line.strip_prefix("style:") {
                arrangement.style = Some(v.parse()?);
            } else if let Some(v) = line.strip_prefix("track:") {
                pending.push(parse_track_header(v)?);
            } else if let Some(v) = line.strip_prefix("note:") {
                current(&mut pending, number)?.notes.push(parse_note_line(v)?);
            } else if let Some(v) = line.strip_prefix("chord:") {
                current(&mut pending, number)?.notes.extend(parse_chord_line(v)?);
            } else if let Some(v) = line.strip_prefix("pattern:") {
                let style: Style = v.parse()?;
                current(&mut pending, number)?.patterns.push(style);
            } else {
                parse_field!(line, "tempo:", tempo);
                parse_field!(line, "bars:", bars);
                parse_field!(line, "beats:", beats);
                parse_field!(line, "seed:", arrangement.seed);
                return Err(SynthError::ParseError(format!("Unrecognized line {}: '{}'", number + 1, line)));
            }
        }

        arrangement.tempo = tempo
            .or(arrangement.style.map(|s| s.bpm()))
            .unwrap_or(DEFAULT_TEMPO);
        arrangement.total_beats = match (beats, bars) {
            (Some(beats), _) => beats,
            (None, Some(bars)) => bars_to_beats(bars)?,
            (None, None) => DEFAULT_BARS * BEATS_PER_BAR,
        };
        arrangement.validate()?;

        for p in pending {
            let instrument = resolve_instrument(&p.instrument, arrangement.style)?;
            let mut track = Track::new(&p.name, instrument);
            track.muted = p.muted;
            if let Some(volume) = p.volume {
                track.volume = volume;
            }
            track.notes = p.notes;
            for style in p.patterns {
                track.notes.extend(style.drum_pattern(arrangement.total_beats));
            }

            match p.weight {
                Some(weight) => arrangement.add_track(track, weight),
                None => arrangement.add_styled_track(track),
            }
        }

        Ok(arrangement)
    }
}

fn current(pending: &mut [PendingTrack], number: usize) -> Result<&mut PendingTrack, SynthError> {
    pending
        .last_mut()
        .ok_or_else(|| SynthError::ParseError(format!("Line {} appears before any track:", number + 1)))
}

fn resolve_instrument(name: &str, style: Option<Style>) -> Result<InstrumentKind, SynthError> {
    let family = name.trim().to_lowercase();
    if !family.contains(':') {
        if let Some(kind) = style.and_then(|s| s.instrument(&family)) {
            return Ok(kind);
        }
    }
    name.parse()
}

// track: <name>, <instrument>[, volume=..][, weight=..][, muted=..]
fn parse_track_header(v: &str) -> Result<PendingTrack, SynthError> {
    let parts: Vec<&str> = v.split(',').map(|s| s.trim()).collect();
    if parts.len() < 2 || parts[0].is_empty() {
        return Err(SynthError::ParseError(format!("Track needs a name and an instrument: '{}'", v.trim())));
    }

    // validated now so the error points at the header
    parts[1].parse::<InstrumentKind>()?;

    let mut track = PendingTrack {
        name: parts[0].to_string(),
        instrument: parts[1].to_string(),
        volume: None,
        weight: None,
        muted: false,
        notes: Vec::new(),
        patterns: Vec::new(),
    };

    for param in parts.iter().skip(2) {
        let Some((key, val)) = param.split_once('=') else {
            return Err(SynthError::ParseError(format!("Expected key=value, got '{}'", param)));
        };
        let val = val.trim();
        match key.trim() {
            "volume" | "vol" => track.volume = Some(parse_unit(val, "volume")?),
            "weight" => {
                track.weight = Some(val.parse()
                    .map_err(|_| SynthError::ParseError("Invalid weight".to_string()))?)
            }
            "muted" => {
                track.muted = val.parse()
                    .map_err(|_| SynthError::ParseError("Invalid muted flag".to_string()))?
            }
            other => return Err(SynthError::ParseError(format!("Unknown track option '{}'", other))),
        }
    }

    Ok(track)
}

// note: <pitch>, <start>, <duration>[, <velocity>]
fn parse_note_line(v: &str) -> Result<Note, SynthError> {
    let parts: Vec<&str> = v.split(',').map(|s| s.trim()).collect();
    if parts.len() < 3 {
        return Err(SynthError::ParseError(format!("Note needs pitch, start and duration: '{}'", v.trim())));
    }
    let pitch: Pitch = parts[0].parse()?;
    let (start, duration) = parse_timing(parts[1], parts[2])?;
    let velocity = match parts.get(3) {
        Some(s) => parse_unit(s, "velocity")?,
        None => DEFAULT_VELOCITY,
    };
    Ok(Note { pitch, start, duration, velocity })
}

// chord: <root>, <shape>, <start>, <duration>[, <velocity>]
fn parse_chord_line(v: &str) -> Result<Vec<Note>, SynthError> {
    let parts: Vec<&str> = v.split(',').map(|s| s.trim()).collect();
    if parts.len() < 4 {
        return Err(SynthError::ParseError(format!("Chord needs root, shape, start and duration: '{}'", v.trim())));
    }
    let root: Pitch = parts[0].parse()?;
    let shape: ChordShape = parts[1].parse()?;
    let (start, duration) = parse_timing(parts[2], parts[3])?;
    let velocity = match parts.get(4) {
        Some(s) => parse_unit(s, "velocity")?,
        None => DEFAULT_VELOCITY,
    };
    Ok(shape.notes(&root, start, duration, velocity))
}

fn parse_timing(start: &str, duration: &str) -> Result<(f32, f32), SynthError> {
    let start: f32 = start.parse()
        .map_err(|_| SynthError::ParseError("Invalid Start".to_string()))?;
    let duration: f32 = duration.parse()
        .map_err(|_| SynthError::ParseError("Invalid Duration".to_string()))?;
    if !(start >= 0.0) {
        return Err(SynthError::ParseError(format!("Negative start: {}", start)));
    }
    if !(duration > 0.0) {
        return Err(SynthError::ParseError(format!("Duration must be positive: {}", duration)));
    }
    Ok((start, duration))
}

fn parse_unit(s: &str, what: &str) -> Result<f32, SynthError> {
    let value: f32 = s.parse()
        .map_err(|_| SynthError::ParseError(format!("Invalid {}", what)))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(SynthError::ParseError(format!("{} must be within [0, 1]: {}", what, value)));
    }
    Ok(value)
}
