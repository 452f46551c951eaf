use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{ChordError, Result};

/// Mono PCM audio with its sample rate in Hz.
///
/// The rate is fractional because decimation by an integer factor does not
/// always land on a whole number of Hz.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: f32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: f32) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ChordError::InvalidInput(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an audio file to mono samples.
pub fn decode_file(path: &Path) -> Result<Waveform> {
    let file = File::open(path)
        .map_err(|e| ChordError::decode(path, format!("cannot open file: {}", e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    decode_stream(mss, &hint, path)
}

/// Decode an in-memory audio file. `extension` is an optional container hint
/// such as `"wav"` or `"mp3"`.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<Waveform> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    decode_stream(mss, &hint, Path::new("<memory>"))
}

fn decode_stream(mss: MediaSourceStream, hint: &Hint, origin: &Path) -> Result<Waveform> {
    let probed = symphonia::default::get_probe()
        .format(hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| ChordError::decode(origin, format!("unrecognized audio format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ChordError::decode(origin, "no audio tracks found"))?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count()).max(1);
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| ChordError::decode(origin, "unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ChordError::decode(origin, format!("unsupported codec: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(ChordError::decode(origin, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping corrupt packet in {}: {}", origin.display(), msg);
                continue;
            }
            Err(e) => return Err(ChordError::decode(origin, e)),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();
        let frame_channels = spec.channels.count().max(1);

        // Downmix to mono
        if frame_channels == 1 {
            all_samples.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(frame_channels) {
                let mono: f32 = frame_samples.iter().sum::<f32>() / frame_channels as f32;
                all_samples.push(mono);
            }
        }
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), {:.1}s",
        all_samples.len(),
        sample_rate,
        channels,
        all_samples.len() as f32 / sample_rate as f32
    );

    Waveform::new(all_samples, sample_rate as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: &[[i16; 2]]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame.iter().take(channels as usize) {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = decode_file(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, ChordError::Decode { .. }));
    }

    #[test]
    fn garbage_bytes_are_decode_error() {
        let bytes = b"this is not audio at all, just some text".to_vec();
        let err = decode_bytes(bytes, Some("wav")).unwrap_err();
        assert!(matches!(err, ChordError::Decode { .. }));
    }

    #[test]
    fn decodes_stereo_wav_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let frames: Vec<[i16; 2]> = (0..1000).map(|_| [16384, 0]).collect();
        write_wav(&path, 2, 22050, &frames);

        let audio = decode_file(&path).unwrap();
        assert_eq!(audio.sample_rate, 22050.0);
        assert_eq!(audio.len(), 1000);
        for &s in &audio.samples {
            assert!((s - 0.25).abs() < 1e-3, "expected averaged channel, got {}", s);
        }
    }

    #[test]
    fn decodes_wav_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let frames: Vec<[i16; 2]> = (0..500).map(|i| [(i * 10) as i16, 0]).collect();
        write_wav(&path, 1, 8000, &frames);

        let bytes = std::fs::read(&path).unwrap();
        let audio = decode_bytes(bytes, Some("wav")).unwrap();
        assert_eq!(audio.sample_rate, 8000.0);
        assert_eq!(audio.len(), 500);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(matches!(
            Waveform::new(vec![0.0; 10], 0.0),
            Err(ChordError::InvalidInput(_))
        ));
    }
}
