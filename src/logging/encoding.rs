//! Text encodings supported by the file sink

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SinkError;

/// Character encoding used when writing log text to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Strict 7-bit ASCII
    Ascii,
}

impl TextEncoding {
    /// Canonical label, as accepted in config files
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Encode `text` into bytes
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, SinkError> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Ascii => match text.chars().find(|c| !c.is_ascii()) {
                Some(character) => Err(SinkError::Encoding {
                    encoding: self.label(),
                    character,
                }),
                None => Ok(text.as_bytes().to_vec()),
            },
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16le" | "utf-16-le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf-16-be" => Ok(TextEncoding::Utf16Be),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            _ => Err(format!("unsupported encoding '{}'", s)),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.label().to_string()
    }
}
