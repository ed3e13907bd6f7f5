use std::string::FromUtf8Error;

use thiserror::Error;

/// Failure to read a build code as base64.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("build code is empty")]
    Empty,
    #[error("invalid character {ch:?} at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },
    #[error("padding character at offset {offset} is not trailing padding")]
    MisplacedPadding { offset: usize },
    #[error("build code length {len} cannot be base64")]
    InvalidLength { len: usize },
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Failure of a single decompression attempt.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("corrupt deflate stream: {0}")]
    Corrupt(#[from] flate2::DecompressError),
    #[error("deflate stream ended before its final block")]
    Truncated,
    #[error("decompressed output exceeds {limit} bytes")]
    OutputLimit { limit: usize },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid build code encoding: {0}")]
    InvalidEncoding(#[from] EncodingError),
    /// Both framings were tried; this carries the raw DEFLATE failure.
    #[error("invalid build code compression: {0}")]
    InvalidCompression(#[source] CompressionError),
    #[error("decoded build is not valid utf-8: {0}")]
    InvalidText(#[from] FromUtf8Error),
}
