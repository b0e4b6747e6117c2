use std::io::{Seek, Write};
use std::path::Path;

use tracing::info;

use crate::error::SynthError;
use crate::waveform::SAMPLE_RATE;

pub const PCM_SCALE: f32 = 32767.0;

pub fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// `round(sample * 32767)`, clamped first so out-of-range input cannot wrap.
pub fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * PCM_SCALE).round() as i16)
        .collect()
}

pub fn from_pcm16(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / PCM_SCALE).collect()
}

pub fn write_wav_to<W: Write + Seek>(writer: W, samples: &[f32]) -> Result<(), SynthError> {
    let mut wav = hound::WavWriter::new(writer, wav_spec())?;
    {
        let mut pcm = wav.get_i16_writer(samples.len() as u32);
        for s in to_pcm16(samples) {
            pcm.write_sample(s);
        }
        pcm.flush()?;
    }
    wav.finalize()?;
    Ok(())
}

/// Writes a mono 16-bit WAV. The buffer is only borrowed, so a failed export
/// leaves it intact for a retry.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32]) -> Result<(), SynthError> {
    let path = path.as_ref();
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_wav_to(file, samples)?;
    info!(path = %path.display(), samples = samples.len(), "exported wav");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn quantizes_with_rounding() {
        assert_eq!(to_pcm16(&[0.0, 1.0, -1.0, 0.5, 2.0, -7.0]), vec![0, 32767, -32767, 16384, 32767, -32767]);
    }

    #[test]
    fn header_and_samples_survive_a_round_trip() {
        let samples: Vec<f32> = (0..1000).map(|i| ((i as f32) * 0.01).sin() * 0.9).collect();
        let mut cursor = Cursor::new(Vec::new());
        write_wav_to(&mut cursor, &samples).unwrap();

        cursor.set_position(0);
        let mut reader = hound::WavReader::new(cursor).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 1000);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        for (a, b) in samples.iter().zip(from_pcm16(&decoded)) {
            assert!((a - b).abs() <= 1.0 / PCM_SCALE);
        }
    }

    #[test]
    fn empty_buffer_is_a_valid_file() {
        let mut cursor = Cursor::new(Vec::new());
        write_wav_to(&mut cursor, &[]).unwrap();
        cursor.set_position(0);
        assert_eq!(hound::WavReader::new(cursor).unwrap().len(), 0);
    }
}
