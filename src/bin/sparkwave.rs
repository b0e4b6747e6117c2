use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use sparkwave::arrangement::{BEATS_PER_BAR, DEFAULT_BARS, bars_to_beats};
use sparkwave::{
    Arrangement, ChordShape, InstrumentKind, Note, Pitch, RenderSettings, Style, SynthEngine, SynthError, Track,
};

/// Render a song file (or a style demo) to a mono 16-bit WAV.
#[derive(Parser, Debug)]
#[command(name = "sparkwave", version, about)]
struct Args {
    /// Song file to render. Without one, a short demo in --style is rendered.
    song: Option<PathBuf>,

    #[arg(short, long, default_value = "output.wav")]
    output: PathBuf,

    /// Override the song tempo (BPM).
    #[arg(long)]
    tempo: Option<f32>,

    /// Override the song length in bars of four beats.
    #[arg(long)]
    bars: Option<u32>,

    /// Noise seed for percussion.
    #[arg(long)]
    seed: Option<u64>,

    /// Style of the demo song.
    #[arg(long, default_value = "rock")]
    style: Style,

    /// Render tracks one after another instead of on the thread pool.
    #[arg(long)]
    sequential: bool,
}

fn demo(style: Style, beats: u32) -> Result<Arrangement, SynthError> {
    let mut arrangement = Arrangement::new(&format!("{} demo", style), style.bpm(), beats);
    arrangement.style = Some(style);
    arrangement.validate()?;

    arrangement.add_styled_track(style.drum_track(beats));

    let roots = ["E3", "A3", "D3", "B2"];
    let mut bass = Track::new("bass", style.instrument("bass").unwrap_or_else(InstrumentKind::bass));
    let mut keys = Track::new("keys", style.instrument("synth").unwrap_or_else(InstrumentKind::synth));
    for bar in 0..beats / 4 {
        let root = Pitch::from(roots[bar as usize % roots.len()]);
        let start = (bar * 4) as f32;
        bass.add_note(Note::new(root.clone(), start, 1.5, 0.9));
        bass.add_note(Note::new(root.clone(), start + 2.0, 1.5, 0.8));
        keys.notes.extend(ChordShape::Minor.notes(&root, start, 4.0, 0.7));
    }
    arrangement.add_styled_track(bass);
    arrangement.add_styled_track(keys);
    Ok(arrangement)
}

fn main() -> Result<(), SynthError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let engine = SynthEngine::new(RenderSettings {
        parallel: !args.sequential,
        ..Default::default()
    });

    let beats = args.bars.map(bars_to_beats).transpose()?;

    let mut arrangement = match &args.song {
        Some(path) => engine.load_arrangement(path)?,
        None => demo(args.style, beats.unwrap_or(DEFAULT_BARS * BEATS_PER_BAR))?,
    };

    if let Some(tempo) = args.tempo {
        arrangement.tempo = tempo;
    }
    if let Some(beats) = beats {
        arrangement.total_beats = beats;
    }
    if args.seed.is_some() {
        arrangement.seed = args.seed;
    }
    arrangement.validate()?;

    info!(
        song = %arrangement.name,
        tempo = arrangement.tempo,
        beats = arrangement.total_beats,
        tracks = arrangement.tracks.len(),
        "rendering"
    );
    engine.render_to_file(&arrangement, &args.output)?;
    Ok(())
}
