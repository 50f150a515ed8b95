//! WAV encoding for finalized recordings
//!
//! One session's concatenated f32 samples become one in-memory WAV
//! (mono, 16-bit PCM) suitable for playback and the multipart training
//! upload.

use std::io::Cursor;

use crate::error::{Error, Result};

/// Encode mono f32 samples into a WAV container in memory
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate.max(1),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::Encode(e.to_string()))?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let value = (clamped * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
        writer.finalize().map_err(|e| Error::Encode(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_riff_header() {
        let wav = encode_wav(&[0.0, 0.5, -0.5], 16_000).expect("encode");
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn test_encode_empty_session_is_valid() {
        // A session stopped before any chunk arrived still yields one
        // (empty) sample
        let wav = encode_wav(&[], 16_000).expect("encode");
        assert_eq!(&wav[0..4], b"RIFF");
        // Header only: 44 bytes for 16-bit PCM
        assert_eq!(wav.len(), 44);
    }

    #[test]
    fn test_samples_round_trip_through_container() {
        let samples = vec![0.0, 0.25, -0.25, 1.0, -1.0];
        let wav = encode_wav(&samples, 8_000).expect("encode");

        let mut reader = hound::WavReader::new(Cursor::new(wav)).expect("read");
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 8_000);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded.len(), samples.len());
        assert_eq!(decoded[0], 0);
        assert_eq!(decoded[3], i16::MAX);
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let wav = encode_wav(&[2.0, -2.0], 8_000).expect("encode");
        let mut reader = hound::WavReader::new(Cursor::new(wav)).expect("read");
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded[0], i16::MAX);
        assert_eq!(decoded[1], -i16::MAX);
    }
}
