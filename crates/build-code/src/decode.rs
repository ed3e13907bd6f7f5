//! Build code to document: transcode, decompress, decode text.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::code::BuildCode;
use crate::error::{CompressionError, DecodeError, EncodingError};
use crate::inflate::{inflate, Framing};
use crate::options::{DecodeOptions, TextPolicy};

const BOM: char = '\u{feff}';

/// Standard alphabet, padding required, stray low bits in the final
/// sextet ignored the way browser base64 decoders do.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
        .with_decode_allow_trailing_bits(true),
);

/// A decoded document and the framing its payload used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub framing: Framing,
}

/// Decodes a build code into its document using the default options.
///
/// # Example
///
/// ```
/// let code = build_code::encode("<PathOfBuilding></PathOfBuilding>");
/// assert_eq!(
///     build_code::decode(&code).unwrap(),
///     "<PathOfBuilding></PathOfBuilding>"
/// );
/// ```
pub fn decode(code: &str) -> Result<String, DecodeError> {
    decode_with(code, &DecodeOptions::default()).map(|decoded| decoded.text)
}

pub fn decode_with(code: &str, options: &DecodeOptions) -> Result<Decoded, DecodeError> {
    let (bytes, framing) = decompress(code, options.max_output)?;
    let mut text = match options.text {
        TextPolicy::Strict => String::from_utf8(bytes)?,
        TextPolicy::Lossy => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        },
    };
    if text.starts_with(BOM) {
        text.drain(..BOM.len_utf8());
    }
    Ok(Decoded { text, framing })
}

/// Runs the pipeline up to decompression and returns the raw document bytes.
pub fn decode_bytes(code: &str) -> Result<Vec<u8>, DecodeError> {
    decode_bytes_with(code, &DecodeOptions::default())
}

/// Like [`decode_bytes`], honouring `options.max_output`. The text policy
/// does not apply to raw bytes.
pub fn decode_bytes_with(code: &str, options: &DecodeOptions) -> Result<Vec<u8>, DecodeError> {
    decompress(code, options.max_output).map(|(bytes, _)| bytes)
}

fn decompress(code: &str, max_output: Option<usize>) -> Result<(Vec<u8>, Framing), DecodeError> {
    let code = BuildCode::parse(code)?;
    let payload = STANDARD_LENIENT
        .decode(code.to_standard_base64())
        .map_err(EncodingError::from)?;

    match inflate(&payload, Framing::Zlib, max_output) {
        Ok(bytes) => {
            tracing::trace!(framing = %Framing::Zlib, compressed = payload.len(), inflated = bytes.len(), "build code inflated");
            Ok((bytes, Framing::Zlib))
        }
        // The cap is not a framing failure; raw would only mask it.
        Err(err @ CompressionError::OutputLimit { .. }) => Err(DecodeError::InvalidCompression(err)),
        Err(zlib_err) => {
            tracing::debug!(error = %zlib_err, "zlib framing failed, retrying as raw deflate");
            let bytes = inflate(&payload, Framing::Raw, max_output)
                .map_err(DecodeError::InvalidCompression)?;
            tracing::trace!(framing = %Framing::Raw, compressed = payload.len(), inflated = bytes.len(), "build code inflated");
            Ok((bytes, Framing::Raw))
        }
    }
}
