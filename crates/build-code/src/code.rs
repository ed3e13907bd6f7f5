//! Validated build-export code text.

use std::fmt;

use crate::error::EncodingError;

const PAD: char = '=';

/// A build code whose characters have been checked against the base64
/// alphabet (URL-safe or standard) with optional trailing padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCode<'a> {
    raw: &'a str,
    /// Length without trailing padding.
    data_len: usize,
}

impl<'a> BuildCode<'a> {
    /// Validates `raw` as a build code.
    ///
    /// Accepts `A-Z a-z 0-9 - _ + /` followed by at most two `=`. The
    /// unpadded length must not leave a single dangling sextet (`4k+1`).
    pub fn parse(raw: &'a str) -> Result<Self, EncodingError> {
        let mut data_len = None;
        for (offset, ch) in raw.char_indices() {
            match (ch, data_len) {
                (PAD, None) => data_len = Some(offset),
                (PAD, Some(_)) => {}
                (_, Some(pad)) if is_alphabet(ch) => {
                    return Err(EncodingError::MisplacedPadding { offset: pad });
                }
                (_, _) if !is_alphabet(ch) => {
                    return Err(EncodingError::InvalidCharacter { ch, offset });
                }
                _ => {}
            }
        }
        let data_len = data_len.unwrap_or(raw.len());
        if data_len == 0 {
            return Err(EncodingError::Empty);
        }
        if raw.len() - data_len > 2 {
            return Err(EncodingError::MisplacedPadding { offset: data_len + 2 });
        }
        if data_len % 4 == 1 {
            return Err(EncodingError::InvalidLength { len: data_len });
        }
        Ok(Self { raw, data_len })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Rewrites the code into padded standard base64: `-` becomes `+`,
    /// `_` becomes `/`, and `=` is appended up to a multiple of four.
    pub fn to_standard_base64(&self) -> String {
        let data = &self.raw[..self.data_len];
        let padding = (4 - data.len() % 4) % 4;
        let mut out = String::with_capacity(data.len() + padding);
        out.extend(data.chars().map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        }));
        out.extend(std::iter::repeat(PAD).take(padding));
        out
    }
}

impl fmt::Display for BuildCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

impl<'a> TryFrom<&'a str> for BuildCode<'a> {
    type Error = EncodingError;

    fn try_from(raw: &'a str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

fn is_alphabet(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '+' | '/')
}
