use serde::{Deserialize, Serialize};

/// Default cap on decompressed output (16 MiB). Real build documents are a
/// few hundred kilobytes at most.
pub const DEFAULT_MAX_OUTPUT: usize = 16 * 1024 * 1024;

/// How decompressed bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPolicy {
    /// Malformed UTF-8 sequences become U+FFFD; text decoding never fails.
    #[default]
    Lossy,
    /// Malformed UTF-8 fails the call with `DecodeError::InvalidText`.
    Strict,
}

/// Options for [`decode_with`](crate::decode_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub text: TextPolicy,
    /// Upper bound on decompressed bytes; `None` disables the check.
    pub max_output: Option<usize>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            text: TextPolicy::default(),
            max_output: Some(DEFAULT_MAX_OUTPUT),
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: TextPolicy) -> Self {
        self.text = text;
        self
    }

    pub fn strict(self) -> Self {
        self.text(TextPolicy::Strict)
    }

    pub fn max_output(mut self, max_output: Option<usize>) -> Self {
        self.max_output = max_output;
        self
    }
}
