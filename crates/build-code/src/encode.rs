//! Document to build code, the inverse of [`decode`](crate::decode).

use std::io::{self, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;

use crate::inflate::Framing;

/// Encodes a document the way current planners export builds: zlib framing,
/// default compression, URL-safe base64 without padding.
pub fn encode(text: &str) -> String {
    encode_with(text, Framing::Zlib, Compression::default())
}

/// Encodes a document with an explicit framing and compression level.
pub fn encode_with(text: &str, framing: Framing, level: Compression) -> String {
    let compressed =
        compress(text.as_bytes(), framing, level).expect("writing to a Vec cannot fail");
    URL_SAFE_NO_PAD.encode(compressed)
}

fn compress(data: &[u8], framing: Framing, level: Compression) -> io::Result<Vec<u8>> {
    match framing {
        Framing::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level);
            encoder.write_all(data)?;
            encoder.finish()
        }
        Framing::Raw => {
            let mut encoder = DeflateEncoder::new(Vec::new(), level);
            encoder.write_all(data)?;
            encoder.finish()
        }
    }
}
