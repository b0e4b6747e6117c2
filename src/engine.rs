use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::arrangement::{ArrangedTrack, Arrangement};
use crate::error::{ExportFailure, SynthError};
use crate::export;
use crate::mixer;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Seed for percussion noise when the arrangement has none of its own.
    pub seed: u64,
    /// Render tracks on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            seed: DEFAULT_SEED,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SynthEngine {
    settings: RenderSettings,
}

impl SynthEngine {
    pub fn new(settings: RenderSettings) -> Self {
        SynthEngine { settings }
    }

    pub fn load_arrangement<P: AsRef<Path>>(&self, path: P) -> Result<Arrangement, SynthError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SynthError::FileError(format!("{}: {}", path.display(), e)))?;
        Arrangement::from_song(&content)
    }

    /// Each audible track rendered to the full song length, paired with its
    /// mix weight. Muted and empty tracks are left out.
    pub fn render_tracks(&self, arrangement: &Arrangement) -> Vec<(Vec<f32>, f32)> {
        let timing = arrangement.timing();
        let mut rng = fastrand::Rng::with_seed(arrangement.seed.unwrap_or(self.settings.seed));

        // One generator per track, forked in track order, so the noise a track
        // receives does not depend on how the renders are scheduled.
        let jobs: Vec<_> = arrangement
            .tracks
            .iter()
            .map(|arranged| (arranged, rng.fork()))
            .filter(|(arranged, _)| arranged.track.is_audible())
            .collect();

        let render = |(arranged, mut rng): (&ArrangedTrack, fastrand::Rng)| {
            (arranged.track.render(&timing, &mut rng), arranged.weight)
        };

        if self.settings.parallel {
            jobs.into_par_iter().map(render).collect()
        } else {
            jobs.into_iter().map(render).collect()
        }
    }

    pub fn synthesize_arrangement(&self, arrangement: &Arrangement) -> Vec<f32> {
        let total = arrangement.total_samples();
        let rendered = self.render_tracks(arrangement);
        let buffer = mixer::mix_down(&rendered, total);

        info!(
            song = %arrangement.name,
            tracks = rendered.len(),
            samples = total,
            seconds = total as f64 / crate::waveform::SAMPLE_RATE as f64,
            "synthesized arrangement"
        );
        buffer
    }

    /// Renders and writes a WAV, returning the mixed buffer. On a failed write
    /// the buffer comes back inside the error.
    pub fn render_to_file<P: AsRef<Path>>(&self, arrangement: &Arrangement, path: P) -> Result<Vec<f32>, ExportFailure> {
        let buffer = self.synthesize_arrangement(arrangement);
        match export::write_wav(path, &buffer) {
            Ok(()) => Ok(buffer),
            Err(source) => Err(ExportFailure { buffer, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{InstrumentKind, Note};
    use crate::mixer::{HEADROOM_PEAK, peak};
    use crate::style::Style;
    use crate::track::Track;

    fn band() -> Arrangement {
        let mut arrangement = Arrangement::new("band", 120.0, 8);
        arrangement.style = Some(Style::Pop);
        arrangement.add_styled_track(Style::Pop.drum_track(8));
        arrangement.add_styled_track(
            Track::new("bass", InstrumentKind::bass())
                .with_notes([Note::new("E3", 0.0, 2.0, 0.9), Note::new("A3", 4.0, 2.0, 0.9)]),
        );
        arrangement.add_styled_track(
            Track::new("lead", InstrumentKind::synth()).with_notes([Note::new("E5", 1.0, 3.0, 0.7)]),
        );
        arrangement
    }

    #[test]
    fn parallel_matches_sequential() {
        let arrangement = band();
        let parallel = SynthEngine::new(RenderSettings { seed: 7, parallel: true });
        let sequential = SynthEngine::new(RenderSettings { seed: 7, parallel: false });
        assert_eq!(parallel.synthesize_arrangement(&arrangement), sequential.synthesize_arrangement(&arrangement));
    }

    #[test]
    fn seed_controls_noise() {
        let arrangement = band();
        let a = SynthEngine::new(RenderSettings { seed: 1, parallel: false }).synthesize_arrangement(&arrangement);
        let b = SynthEngine::new(RenderSettings { seed: 1, parallel: false }).synthesize_arrangement(&arrangement);
        let c = SynthEngine::new(RenderSettings { seed: 2, parallel: false }).synthesize_arrangement(&arrangement);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn mix_is_normalized_and_full_length() {
        let arrangement = band();
        let buffer = SynthEngine::default().synthesize_arrangement(&arrangement);
        assert_eq!(buffer.len(), 4 * 44100);
        assert!((peak(&buffer) - HEADROOM_PEAK).abs() <= 1e-6);
    }

    #[test]
    fn silent_tracks_are_not_rendered() {
        let mut arrangement = band();
        arrangement.tracks[1].track.muted = true;
        arrangement.add_track(Track::new("empty", InstrumentKind::guitar()), 1.0);
        assert_eq!(SynthEngine::default().render_tracks(&arrangement).len(), 2);
    }

    #[test]
    fn failed_export_hands_back_the_mix() {
        let arrangement = band();
        let engine = SynthEngine::new(RenderSettings { seed: 5, parallel: false });
        let dir = tempfile::tempdir().unwrap();

        let failure = engine.render_to_file(&arrangement, dir.path().join("missing").join("out.wav")).unwrap_err();
        assert!(matches!(failure.source, SynthError::Io(_)));
        assert_eq!(failure.buffer, engine.synthesize_arrangement(&arrangement));
    }

    #[test]
    fn empty_arrangement_renders_silence() {
        let arrangement = Arrangement::new("nothing", 60.0, 2);
        let buffer = SynthEngine::default().synthesize_arrangement(&arrangement);
        assert_eq!(buffer.len(), 88200);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }
}
