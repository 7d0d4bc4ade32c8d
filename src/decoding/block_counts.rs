//! Block-count ledger decoding
//!
//! The ledger has been stored in three shapes over time:
//!
//! ```text
//! current      [{"id":"STONE","amount":"120"},{"id":"HOPPER","amount":"3"}]
//! legacy JSON  {"STONE":120,"HOPPER":"3"}
//! legacy raw   STONE=120;HOPPER=3
//! ```
//!
//! The current decoder runs first. Any failure falls through to the legacy
//! chain, which tries its decoders in order. The first decoder that accepts
//! the whole blob wins; when none does, the caller gets `DecodeError::Exhausted`.
//!
//! Every decoder turns raw ids into keys through the caller's `KeyResolver`,
//! so a ledger entry naming an unknown key fails the decoder like any other
//! malformed entry.

use super::DecodeError;
use crate::island_cache::{CachedIslandInfo, Key};
use num_bigint::BigInt;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCount {
    pub key: Key,
    pub amount: BigInt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerFormat {
    Current,
    LegacyJson,
    LegacyRaw,
}

/// Result of a successful ledger decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLedger {
    pub format: LedgerFormat,
    pub counts: Vec<BlockCount>,
}

impl DecodedLedger {
    fn empty() -> Self {
        Self {
            format: LedgerFormat::Current,
            counts: Vec::new(),
        }
    }

    /// Restore every count onto the staged island
    pub fn apply(self, info: &mut CachedIslandInfo) {
        for BlockCount { key, amount } in self.counts {
            info.add_block_count(key, amount);
        }
    }
}

/// Raw block id → typed key, `None` when the id is not recognised
pub type KeyResolver<'a> = &'a dyn Fn(&str) -> Option<Key>;

type LedgerDecoder = fn(&str, KeyResolver<'_>) -> Result<Vec<BlockCount>, DecodeError>;

/// Legacy decoders, in the order they are tried
const LEGACY_CHAIN: &[(LedgerFormat, LedgerDecoder)] = &[
    (LedgerFormat::LegacyJson, decode_legacy_json),
    (LedgerFormat::LegacyRaw, decode_legacy_raw),
];

fn parse_key(raw: &str, resolve_key: KeyResolver<'_>) -> Result<Key, DecodeError> {
    resolve_key(raw).ok_or_else(|| DecodeError::InvalidEntry(format!("unknown key {:?}", raw)))
}

fn parse_amount(raw: &str) -> Result<BigInt, DecodeError> {
    raw.trim()
        .parse()
        .map_err(|_| DecodeError::InvalidAmount(raw.to_string()))
}

fn amount_from_json(value: &Value) -> Result<BigInt, DecodeError> {
    match value {
        Value::String(s) => parse_amount(s),
        Value::Number(n) => parse_amount(&n.to_string()),
        other => Err(DecodeError::InvalidAmount(other.to_string())),
    }
}

/// Current format: array of `{"id", "amount"}` objects
pub fn decode_current(blob: &str, resolve_key: KeyResolver<'_>) -> Result<Vec<BlockCount>, DecodeError> {
    let value: Value = serde_json::from_str(blob)?;
    let entries = value
        .as_array()
        .ok_or(DecodeError::InvalidShape("array of block counts"))?;

    entries
        .iter()
        .map(|entry| {
            let object = entry
                .as_object()
                .ok_or(DecodeError::InvalidShape("block count object"))?;
            let id = object
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| DecodeError::InvalidEntry(entry.to_string()))?;
            let amount = object
                .get("amount")
                .ok_or_else(|| DecodeError::InvalidEntry(entry.to_string()))?;

            Ok(BlockCount {
                key: parse_key(id, resolve_key)?,
                amount: amount_from_json(amount)?,
            })
        })
        .collect()
}

/// Legacy JSON format: one object mapping key → amount
pub fn decode_legacy_json(blob: &str, resolve_key: KeyResolver<'_>) -> Result<Vec<BlockCount>, DecodeError> {
    let value: Value = serde_json::from_str(blob)?;
    let object = value
        .as_object()
        .ok_or(DecodeError::InvalidShape("object of block counts"))?;

    object
        .iter()
        .map(|(id, amount)| {
            Ok(BlockCount {
                key: parse_key(id, resolve_key)?,
                amount: amount_from_json(amount)?,
            })
        })
        .collect()
}

/// Legacy raw format: `key=amount` pairs separated by `;`
pub fn decode_legacy_raw(blob: &str, resolve_key: KeyResolver<'_>) -> Result<Vec<BlockCount>, DecodeError> {
    blob.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, amount) = entry
                .split_once('=')
                .ok_or_else(|| DecodeError::InvalidEntry(entry.to_string()))?;
            Ok(BlockCount {
                key: parse_key(id, resolve_key)?,
                amount: parse_amount(amount)?,
            })
        })
        .collect()
}

/// Run the legacy chain on its own
pub fn decode_legacy(blob: &str, resolve_key: KeyResolver<'_>) -> Result<DecodedLedger, DecodeError> {
    let mut attempts = Vec::with_capacity(LEGACY_CHAIN.len());

    for (format, decoder) in LEGACY_CHAIN {
        match decoder(blob, resolve_key) {
            Ok(counts) => {
                return Ok(DecodedLedger {
                    format: *format,
                    counts,
                })
            }
            Err(e) => attempts.push(format!("{:?}: {}", format, e)),
        }
    }

    Err(DecodeError::Exhausted(attempts))
}

/// Decode a stored ledger blob; a missing or blank blob is an empty ledger
pub fn decode_block_counts(
    blob: Option<&str>,
    resolve_key: KeyResolver<'_>,
) -> Result<DecodedLedger, DecodeError> {
    let blob = match blob.map(str::trim) {
        Some(blob) if !blob.is_empty() => blob,
        _ => return Ok(DecodedLedger::empty()),
    };

    let current_error = match decode_current(blob, resolve_key) {
        Ok(counts) => {
            return Ok(DecodedLedger {
                format: LedgerFormat::Current,
                counts,
            })
        }
        Err(e) => e,
    };

    log::debug!("Block counts not in current format ({}), trying legacy decoders", current_error);

    decode_legacy(blob, resolve_key).map_err(|e| match e {
        DecodeError::Exhausted(mut attempts) => {
            attempts.insert(0, format!("{:?}: {}", LedgerFormat::Current, current_error));
            DecodeError::Exhausted(attempts)
        }
        other => other,
    })
}
