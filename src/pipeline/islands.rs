//! Island rows and their block-count ledgers

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::decoding::{decode_block_counts, DecodedLedger, LedgerFormat};
use crate::island_cache::CachedIslandInfo;
use crate::record_store::RecordRow;
use crate::report::{DecodeFailure, Rejection};
use uuid::Uuid;

/// An island row; its ledger is `None` when no decoder accepted the blob
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCountsRecord {
    pub island: Uuid,
    pub ledger: Option<DecodedLedger>,
}

impl StagedRecord for BlockCountsRecord {
    const KIND: RecordKind = RecordKind::BlockCounts;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let blob = row.get::<String>("block_counts");

        let resolve_key = |raw: &str| ctx.resolvers.resolve_key(raw);

        let ledger = match decode_block_counts(blob.as_deref(), &resolve_key) {
            Ok(ledger) => {
                if ledger.format != LedgerFormat::Current {
                    log::debug!(
                        "🧱 Island {} block counts restored from {:?} format",
                        check.island,
                        ledger.format
                    );
                }
                Some(ledger)
            }
            Err(err) => {
                ctx.record_decode_failure(DecodeFailure::new(
                    Self::KIND,
                    check.island,
                    "block_counts",
                    &err,
                ));
                None
            }
        };

        Ok(Self {
            island: check.island,
            ledger,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        if let Some(ledger) = self.ledger {
            ledger.apply(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island_cache::{Key, StagingStore};
    use crate::pipeline::record::stage;
    use crate::pipeline::record::test_support::*;
    use num_bigint::BigInt;

    fn islands_row(island: Uuid, blob: &str) -> RecordRow {
        RecordRow::new()
            .with_text("uuid", &island.to_string())
            .with_text("block_counts", blob)
    }

    #[test]
    fn test_legacy_raw_ledger_is_restored() {
        let fixture = ContextFixture::new(0);
        let staging = StagingStore::new();
        let island = Uuid::new_v4();

        let row = islands_row(island, "STONE=120;HOPPER=3");
        stage::<BlockCountsRecord>(&row, &fixture.ctx(), &staging).unwrap();

        let info = staging.snapshot(&island).unwrap();
        assert_eq!(info.block_counts[&Key::parse("STONE").unwrap()], BigInt::from(120));
        assert_eq!(info.block_counts[&Key::parse("HOPPER").unwrap()], BigInt::from(3));
    }

    #[test]
    fn test_undecodable_ledger_still_stages_island() {
        let fixture = ContextFixture::new(0);
        let staging = StagingStore::new();
        let island = Uuid::new_v4();

        let row = islands_row(island, "%% definitely not a ledger %%");
        stage::<BlockCountsRecord>(&row, &fixture.ctx(), &staging).unwrap();

        assert!(staging.snapshot(&island).unwrap().block_counts.is_empty());
        let report = fixture.report.lock().unwrap();
        assert_eq!(report.decode_failures.len(), 1);
        assert_eq!(report.decode_failures[0].island, island);
        assert!(report.rejections.is_empty());
    }

    #[test]
    fn test_island_identity_comes_from_uuid_column() {
        let fixture = ContextFixture::new(0);
        let row = island_row(Uuid::new_v4()).with_text("block_counts", "[]");

        let rejection = BlockCountsRecord::validate(&row, &fixture.ctx()).unwrap_err();
        assert_eq!(rejection.island, None);
        assert_eq!(rejection.reason, "null island");
    }
}
