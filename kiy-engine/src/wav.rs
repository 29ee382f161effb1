//! WAV container assembly
//!
//! Wraps raw linear PCM in a canonical 44-byte RIFF/WAVE header. The
//! encoder is purely a container writer: no resampling, no
//! re-encoding, no inspection of the sample data. Output is
//! deterministic for identical inputs.

/// Length of the canonical header: RIFF chunk descriptor (12) +
/// "fmt " sub-chunk (24) + "data" sub-chunk header (8).
pub const HEADER_LEN: usize = 44;

/// PCM stream parameters for the "fmt " sub-chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of interleaved channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample (16 for the synthesis pipeline)
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    /// Profile used by the speech-synthesis pipeline: mono, 24 kHz,
    /// 16-bit.
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
        }
    }
}

impl WavSpec {
    /// Bytes consumed per second of audio
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Bytes per sample frame across all channels
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }
}

/// Build a complete WAV byte stream from raw PCM sample bytes.
///
/// The payload is appended unchanged after the header; the declared
/// data-chunk size always equals `pcm.len()` and the total output
/// length equals `HEADER_LEN + pcm.len()`.
pub fn encode(pcm: &[u8], spec: WavSpec) -> Vec<u8> {
    let data_size = pcm.len() as u32;
    let riff_size = 36 + data_size;

    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());

    // RIFF chunk descriptor
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // "fmt " sub-chunk (16-byte PCM format block)
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format code
    out.extend_from_slice(&spec.channels.to_le_bytes());
    out.extend_from_slice(&spec.sample_rate.to_le_bytes());
    out.extend_from_slice(&spec.byte_rate().to_le_bytes());
    out.extend_from_slice(&spec.block_align().to_le_bytes());
    out.extend_from_slice(&spec.bits_per_sample.to_le_bytes());

    // "data" sub-chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.extend_from_slice(pcm);

    out
}
