//! Island chest pages

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::decoding::decode_chest_contents;
use crate::island_cache::{CachedIslandInfo, ChestPage};
use crate::record_store::RecordRow;
use crate::report::Rejection;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ChestRecord {
    pub island: Uuid,
    pub index: usize,
    pub contents: ChestPage,
    /// Size of the empty pages padded in before `index`
    pub slot_count: usize,
}

impl StagedRecord for ChestRecord {
    const KIND: RecordKind = RecordKind::Chests;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let index = check.require(
            row.get::<i32>("index")
                .and_then(|index| usize::try_from(index).ok())
                .filter(|index| *index < ctx.config.max_chest_pages),
            "invalid chest index",
        )?;
        let raw = check.require(row.get::<String>("contents"), "missing chest contents")?;
        let contents = decode_chest_contents(&raw)
            .map_err(|err| check.reject(&format!("invalid chest contents ({})", err)))?;

        Ok(Self {
            island: check.island,
            index,
            contents,
            slot_count: ctx.config.default_chest_slot_count(),
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.place_chest(self.index, self.contents, self.slot_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::encode_chest_contents;
    use crate::island_cache::{ItemStack, StagingStore};
    use crate::pipeline::record::stage;
    use crate::pipeline::record::test_support::*;

    fn page(material: &str) -> ChestPage {
        vec![
            Some(ItemStack {
                material: material.to_string(),
                amount: 16,
                display_name: None,
                lore: Vec::new(),
            }),
            None,
        ]
    }

    fn chest_row(island: Uuid, index: i64, contents: &ChestPage) -> RecordRow {
        island_row(island)
            .with("index", index)
            .with_text("contents", &encode_chest_contents(contents).unwrap())
    }

    #[test]
    fn test_chest_pages_padded_with_configured_size() {
        let fixture = ContextFixture::new(0);
        let staging = StagingStore::new();
        let island = Uuid::new_v4();

        let row = chest_row(island, 2, &page("IRON_INGOT"));
        stage::<ChestRecord>(&row, &fixture.ctx(), &staging).unwrap();

        let info = staging.snapshot(&island).unwrap();
        assert_eq!(info.island_chests.len(), 3);
        assert_eq!(info.island_chests[0], vec![None; 27]);
        assert_eq!(info.island_chests[1], vec![None; 27]);
        assert_eq!(info.island_chests[2], page("IRON_INGOT"));
    }

    #[test]
    fn test_out_of_order_pages_land_at_their_index() {
        let fixture = ContextFixture::new(0);
        let staging = StagingStore::new();
        let island = Uuid::new_v4();

        for (index, material) in [(1, "GOLD_INGOT"), (0, "COAL")] {
            let row = chest_row(island, index, &page(material));
            stage::<ChestRecord>(&row, &fixture.ctx(), &staging).unwrap();
        }

        let info = staging.snapshot(&island).unwrap();
        assert_eq!(info.island_chests, vec![page("COAL"), page("GOLD_INGOT")]);
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let fixture = ContextFixture::new(0);
        let row = chest_row(Uuid::new_v4(), -1, &page("COAL"));

        let rejection = ChestRecord::validate(&row, &fixture.ctx()).unwrap_err();
        assert_eq!(rejection.reason, "invalid chest index");
    }

    #[test]
    fn test_index_beyond_page_cap_is_rejected() {
        let fixture = ContextFixture::new(0);
        let staging = StagingStore::new();
        let island = Uuid::new_v4();
        let cap = fixture.config.max_chest_pages as i64;

        for index in [cap, 200_000, i64::from(i32::MAX) + 1, i64::MAX] {
            let row = chest_row(island, index, &page("COAL"));
            let rejection = stage::<ChestRecord>(&row, &fixture.ctx(), &staging).unwrap_err();
            assert_eq!(rejection.reason, "invalid chest index");
            assert_eq!(rejection.island, Some(island));
        }

        assert!(!staging.contains(&island));

        let row = chest_row(island, cap - 1, &page("COAL"));
        stage::<ChestRecord>(&row, &fixture.ctx(), &staging).unwrap();
        assert!(staging.contains(&island));
        assert_eq!(staging.snapshot(&island).unwrap().island_chests.len(), cap as usize);
    }

    #[test]
    fn test_undecodable_contents_are_rejected() {
        let fixture = ContextFixture::new(0);
        let row = island_row(Uuid::new_v4())
            .with("index", 0i64)
            .with_text("contents", "%%%");

        let rejection = ChestRecord::validate(&row, &fixture.ctx()).unwrap_err();
        assert!(rejection.reason.starts_with("invalid chest contents"));
    }
}
