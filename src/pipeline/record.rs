//! Record validation plumbing shared by every kind

use super::RecordKind;
use crate::config::LoaderConfig;
use crate::island_cache::{CachedIslandInfo, StagingStore};
use crate::record_store::RecordRow;
use crate::report::{DecodeFailure, LoadReport, Rejection};
use crate::resolvers::Resolvers;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Everything a validator may consult besides the row itself
pub struct LoadContext<'a> {
    pub config: &'a LoaderConfig,
    pub resolvers: &'a dyn Resolvers,
    clock: &'a (dyn Fn() -> i64 + Send + Sync),
    report: &'a Mutex<LoadReport>,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        config: &'a LoaderConfig,
        resolvers: &'a dyn Resolvers,
        clock: &'a (dyn Fn() -> i64 + Send + Sync),
        report: &'a Mutex<LoadReport>,
    ) -> Self {
        Self {
            config,
            resolvers,
            clock,
            report,
        }
    }

    /// Current Unix time in milliseconds
    pub fn now_millis(&self) -> i64 {
        (self.clock)()
    }

    /// Current Unix time in seconds
    pub fn now_secs(&self) -> i64 {
        self.now_millis() / 1000
    }

    pub fn record_decode_failure(&self, failure: DecodeFailure) {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_decode_failure(failure);
    }
}

/// A typed record of one kind: validated from a row, then merged into its island
pub trait StagedRecord: Sized {
    const KIND: RecordKind;

    /// Validate one row; no staging happens here
    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection>;

    fn island(&self) -> Uuid;

    /// Merge into the island's staging structure
    fn apply(self, info: &mut CachedIslandInfo);
}

/// Validate `row` as `R` and, if accepted, merge it under the island's lock
pub fn stage<R: StagedRecord>(
    row: &RecordRow,
    ctx: &LoadContext<'_>,
    staging: &StagingStore,
) -> Result<(), Rejection> {
    let record = R::validate(row, ctx)?;
    let island = record.island();
    staging.with_island(island, move |info| record.apply(info));
    Ok(())
}

/// Field checks for one row, carrying the island id for diagnostics
#[derive(Debug, Clone, Copy)]
pub struct RowCheck {
    pub kind: RecordKind,
    pub island: Uuid,
}

impl RowCheck {
    /// Read the island id; always the first field validated
    pub fn island(row: &RecordRow, kind: RecordKind) -> Result<Self, Rejection> {
        row.get::<Uuid>(kind.identity_column())
            .map(|island| Self { kind, island })
            .ok_or_else(|| Rejection::new(kind, None, "null island"))
    }

    pub fn require<T>(&self, value: Option<T>, reason: &str) -> Result<T, Rejection> {
        value.ok_or_else(|| self.reject(reason))
    }

    pub fn reject(&self, reason: &str) -> Rejection {
        Rejection::new(self.kind, Some(self.island), reason)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::resolvers::CatalogResolvers;

    /// Owns what a `LoadContext` borrows
    pub struct ContextFixture {
        pub config: LoaderConfig,
        pub resolvers: CatalogResolvers,
        pub clock: Box<dyn Fn() -> i64 + Send + Sync>,
        pub report: Mutex<LoadReport>,
    }

    impl ContextFixture {
        pub fn new(now_millis: i64) -> Self {
            Self {
                config: LoaderConfig::default(),
                resolvers: CatalogResolvers::with_missions(["miner_1"]),
                clock: Box::new(move || now_millis),
                report: Mutex::new(LoadReport::default()),
            }
        }

        pub fn ctx(&self) -> LoadContext<'_> {
            LoadContext::new(&self.config, &self.resolvers, self.clock.as_ref(), &self.report)
        }
    }

    pub fn island_row(island: Uuid) -> RecordRow {
        RecordRow::new().with_text("island", &island.to_string())
    }
}
