//! Decoders for encoded column values
//!
//! - `block_counts` - block-count ledger with its legacy fallback chain
//! - `items` - chest pages and menu icons
//! - `text` - colour-code stripping for display names

pub mod block_counts;
pub mod items;
pub mod text;

pub use block_counts::{
    decode_block_counts, BlockCount, DecodedLedger, KeyResolver, LedgerFormat,
};
pub use items::{decode_chest_contents, decode_item, encode_chest_contents, encode_item};
pub use text::strip_colors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    InvalidJson(String),
    InvalidShape(&'static str),
    InvalidEntry(String),
    InvalidAmount(String),
    InvalidEncoding(String),
    /// Every decoder in a fallback chain failed
    Exhausted(Vec<String>),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
            DecodeError::InvalidShape(expected) => write!(f, "Unexpected shape, expected {}", expected),
            DecodeError::InvalidEntry(entry) => write!(f, "Invalid entry: {}", entry),
            DecodeError::InvalidAmount(amount) => write!(f, "Invalid amount: {}", amount),
            DecodeError::InvalidEncoding(e) => write!(f, "Invalid encoding: {}", e),
            DecodeError::Exhausted(attempts) => {
                write!(f, "No decoder accepted the value ({})", attempts.join("; "))
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::InvalidJson(err.to_string())
    }
}

impl From<base64::DecodeError> for DecodeError {
    fn from(err: base64::DecodeError) -> Self {
        DecodeError::InvalidEncoding(err.to_string())
    }
}
