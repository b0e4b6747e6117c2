use tracing::{debug, warn};

use crate::instrument::{InstrumentKind, Note};
use crate::voice::Voice;
use crate::waveform::{SAMPLE_RATE, sample_count};

/// Tempo plus total length, shared by every track of one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub bpm: f32,
    pub total_beats: u32,
}

impl Timing {
    pub fn new(bpm: f32, total_beats: u32) -> Self {
        Timing { bpm, total_beats }
    }

    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Sample offset of a beat position, `round(beats * beat_seconds * SAMPLE_RATE)`.
    pub fn beat_to_sample(&self, beats: f32) -> usize {
        (beats as f64 * self.beat_seconds() * SAMPLE_RATE as f64).round() as usize
    }

    pub fn total_samples(&self) -> usize {
        sample_count(self.total_beats as f64 * self.beat_seconds())
    }
}

/// Where and how one note will be synthesized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    pub start_sample: usize,
    /// Synthesized length before truncation at the end of the track.
    pub length: usize,
    pub voice: Voice,
    pub frequency: f32,
    pub duration_secs: f32,
    pub velocity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub instrument: InstrumentKind,
    pub notes: Vec<Note>,
    pub muted: bool,
    pub volume: f32,
}

impl Track {
    pub fn new(name: &str, instrument: InstrumentKind) -> Self {
        Track {
            name: name.to_string(),
            instrument,
            notes: Vec::new(),
            muted: false,
            volume: 0.8,
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn is_audible(&self) -> bool {
        !self.muted && !self.notes.is_empty()
    }

    /// Resolves every playable note to a voice and sample offset. Notes that
    /// cannot be played are skipped with a warning instead of failing the render.
    pub fn schedule(&self, timing: &Timing) -> Vec<ScheduledNote> {
        let total = timing.total_samples();
        let mut scheduled = Vec::with_capacity(self.notes.len());

        for (index, note) in self.notes.iter().enumerate() {
            if !note.duration.is_finite() || note.duration <= 0.0 {
                warn!(track = %self.name, index, duration = note.duration, "skipping note with non-positive duration");
                continue;
            }
            if !note.start.is_finite() || note.start < 0.0 {
                warn!(track = %self.name, index, start = note.start, "skipping note with negative start");
                continue;
            }

            let Some((voice, frequency)) = self.instrument.voice_for(note) else {
                warn!(track = %self.name, index, pitch = %note.pitch, "skipping note with no matching voice");
                continue;
            };

            let start_sample = timing.beat_to_sample(note.start);
            if start_sample >= total {
                warn!(track = %self.name, index, start = note.start, "skipping note past the end of the track");
                continue;
            }

            let velocity = if (0.0..=1.0).contains(&note.velocity) {
                note.velocity
            } else {
                let clamped = if note.velocity.is_nan() { 0.0 } else { note.velocity.clamp(0.0, 1.0) };
                warn!(track = %self.name, index, velocity = note.velocity, clamped, "velocity outside [0, 1]");
                clamped
            };

            let duration_secs = (note.duration as f64 * timing.beat_seconds()) as f32;
            let length = match voice {
                Voice::Drum(hit) => sample_count(hit.default_duration() as f64),
                _ => sample_count(duration_secs as f64),
            };

            scheduled.push(ScheduledNote {
                start_sample,
                length,
                voice,
                frequency,
                duration_secs,
                velocity,
            });
        }

        scheduled
    }

    /// Renders the whole track into a buffer of `timing.total_samples()`.
    /// Overlapping notes accumulate; tails past the end are cut off.
    pub fn render(&self, timing: &Timing, rng: &mut fastrand::Rng) -> Vec<f32> {
        let total = timing.total_samples();
        let mut buffer = vec![0.0f32; total];

        if !self.is_audible() {
            return buffer;
        }

        let scheduled = self.schedule(timing);
        for note in &scheduled {
            let wave = note.voice.render(note.frequency, note.duration_secs, note.velocity, rng);
            for (dst, s) in buffer[note.start_sample..].iter_mut().zip(wave) {
                *dst += s;
            }
        }

        if self.volume != 1.0 {
            buffer.iter_mut().for_each(|s| *s *= self.volume);
        }

        debug!(track = %self.name, instrument = %self.instrument, notes = scheduled.len(), samples = total, "rendered track");
        buffer
    }
}
