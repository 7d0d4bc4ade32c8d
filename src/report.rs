//! Load diagnostics
//!
//! A rejected record or an undecodable field never stops a load. Each one is
//! logged and collected here so callers can inspect what was skipped.

use crate::decoding::DecodeError;
use crate::pipeline::RecordKind;
use serde::Serialize;
use uuid::Uuid;

/// A record that failed validation or resolution and was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: RecordKind,
    /// Island the record belonged to, when it could be parsed
    pub island: Option<Uuid>,
    pub reason: String,
}

impl Rejection {
    pub fn new(kind: RecordKind, island: Option<Uuid>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            island,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.island {
            Some(island) => write!(
                f,
                "Cannot load {} for {}: {}, skipping...",
                self.kind.describe(),
                island,
                self.reason
            ),
            None => write!(
                f,
                "Cannot load {}: {}, skipping...",
                self.kind.describe(),
                self.reason
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// A field whose every decoder failed; the island itself was still staged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeFailure {
    pub kind: RecordKind,
    pub island: Uuid,
    pub field: &'static str,
    pub reason: String,
}

impl DecodeFailure {
    pub fn new(kind: RecordKind, island: Uuid, field: &'static str, error: &DecodeError) -> Self {
        Self {
            kind,
            island,
            field,
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rejections: Vec<Rejection>,
    pub decode_failures: Vec<DecodeFailure>,
}

impl LoadReport {
    pub fn record_rejection(&mut self, rejection: Rejection) {
        log::warn!("⚠️  {}", rejection);
        self.rejections.push(rejection);
    }

    pub fn record_decode_failure(&mut self, failure: DecodeFailure) {
        log::warn!(
            "⚠️  Cannot decode {} of island {}, field skipped: {}",
            failure.field,
            failure.island,
            failure.reason
        );
        self.decode_failures.push(failure);
    }

    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty() && self.decode_failures.is_empty()
    }
}
