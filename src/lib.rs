//                       _
//  ___ _ __   __ _ _ __| | ____      ____ ___   _____
// / __| '_ \ / _` | '__| |/ /\ \ /\ / / _` \ \ / / _ \
// \__ \ |_) | (_| | |  |   <  \ V  V / (_| |\ V /  __/
// |___/ .__/ \__,_|_|  |_|\_\  \_/\_/ \__,_| \_/ \___|
//     |_|

pub mod error;
pub mod pitch;
pub mod waveform;
pub mod envelope;
pub mod voice;
pub mod drums;
pub mod instrument;
pub mod track;
pub mod mixer;
pub mod export;
pub mod style;
pub mod arrangement;
pub mod engine;

pub use error::{ExportFailure, SynthError};
pub use pitch::{Pitch, note_frequency, parse_note, transpose};
pub use waveform::{SAMPLE_RATE, WaveformType};
pub use envelope::Envelope;
pub use voice::{Voice, VoiceRecipe};
pub use drums::DrumHit;
pub use instrument::{BassStyle, ChordShape, GuitarTone, InstrumentKind, Note};
pub use track::{ScheduledNote, Timing, Track};
pub use mixer::{mix, mix_down, normalize};
pub use export::{to_pcm16, write_wav, write_wav_to};
pub use style::Style;
pub use arrangement::{ArrangedTrack, Arrangement};
pub use engine::{RenderSettings, SynthEngine};
