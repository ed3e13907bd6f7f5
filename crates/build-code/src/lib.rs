//! Build-export code decoding and encoding.
//!
//! A build-export code is a compact, shareable string produced by external
//! character planners. It is the UTF-8 build document, DEFLATE-compressed
//! (zlib-wrapped by current tools, raw by some older ones), encoded as
//! URL-safe base64 with the trailing padding stripped.
//!
//! # Example
//!
//! ```
//! use build_code::{decode, encode};
//!
//! let code = encode("<PathOfBuilding></PathOfBuilding>");
//! assert_eq!(decode(&code).unwrap(), "<PathOfBuilding></PathOfBuilding>");
//! ```

mod code;
mod decode;
mod encode;
mod error;
mod inflate;
mod options;

pub use code::BuildCode;
pub use decode::{decode, decode_bytes, decode_bytes_with, decode_with, Decoded};
pub use encode::{encode, encode_with};
pub use error::{CompressionError, DecodeError, EncodingError};
pub use inflate::{inflate, Framing};
pub use options::{DecodeOptions, TextPolicy, DEFAULT_MAX_OUTPUT};

pub use flate2::Compression;
