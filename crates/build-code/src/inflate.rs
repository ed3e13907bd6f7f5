//! DEFLATE decompression for the two framings build codes use.

use std::fmt;

use flate2::{Decompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};

use crate::error::CompressionError;

const CHUNK: usize = 32 * 1024;

/// Container around the DEFLATE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// RFC 1950: two-byte header and trailing Adler-32 checksum.
    Zlib,
    /// RFC 1951: bare DEFLATE blocks.
    Raw,
}

impl Framing {
    pub fn has_header(self) -> bool {
        matches!(self, Framing::Zlib)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Framing::Zlib => "zlib",
            Framing::Raw => "raw",
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decompresses `bytes` as a single stream in the given framing.
///
/// The stream must reach its final block; running out of input first is
/// [`CompressionError::Truncated`]. Bytes after the end of the stream are
/// ignored.
pub fn inflate(
    bytes: &[u8],
    framing: Framing,
    max_output: Option<usize>,
) -> Result<Vec<u8>, CompressionError> {
    let mut inflater = Decompress::new(framing.has_header());
    let mut out = Vec::new();
    loop {
        if out.len() == out.capacity() {
            out.reserve(CHUNK);
        }
        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let input = &bytes[before_in as usize..];
        let status = inflater.decompress_vec(input, &mut out, FlushDecompress::None)?;

        if let Some(limit) = max_output {
            if out.len() > limit {
                return Err(CompressionError::OutputLimit { limit });
            }
        }
        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                // Spare capacity was available, so no progress means no input.
                if inflater.total_in() == before_in && inflater.total_out() == before_out {
                    return Err(CompressionError::Truncated);
                }
            }
        }
    }
}
