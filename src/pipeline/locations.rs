//! Warps, warp categories and homes

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::decoding::{decode_item, strip_colors};
use crate::island_cache::{
    CachedIslandInfo, CachedWarpCategoryInfo, CachedWarpInfo, Dimension, ItemStack, Location,
};
use crate::record_store::RecordRow;
use crate::report::{DecodeFailure, Rejection};
use uuid::Uuid;

/// Decode an optional icon column; an undecodable icon is dropped, not rejected
fn read_icon(
    row: &RecordRow,
    ctx: &LoadContext<'_>,
    check: &RowCheck,
) -> Option<ItemStack> {
    let raw = row.get::<String>("icon").filter(|raw| !raw.trim().is_empty())?;
    match decode_item(&raw) {
        Ok(icon) => Some(icon),
        Err(err) => {
            ctx.record_decode_failure(DecodeFailure::new(check.kind, check.island, "icon", &err));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarpRecord {
    pub island: Uuid,
    pub warp: CachedWarpInfo,
}

impl StagedRecord for WarpRecord {
    const KIND: RecordKind = RecordKind::Warps;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;

        let name: String = check
            .require(row.get::<String>("name"), "invalid warp name")
            .map(|name| strip_colors(&name))?
            .chars()
            .take(ctx.config.max_warp_name_length)
            .collect();
        if name.trim().is_empty() {
            return Err(check.reject("invalid warp name"));
        }

        let location = check.require(
            row.get::<String>("location")
                .and_then(|raw| Location::parse(&raw)),
            "invalid location",
        )?;

        let category = row.get::<String>("category").unwrap_or_default();
        let is_private = row.get::<bool>("private").unwrap_or(true);
        let icon = read_icon(row, ctx, &check);

        Ok(Self {
            island: check.island,
            warp: CachedWarpInfo {
                name,
                category,
                location,
                is_private,
                icon,
            },
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.cached_warp_info_list.push(self.warp);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarpCategoryRecord {
    pub island: Uuid,
    pub category: CachedWarpCategoryInfo,
}

impl StagedRecord for WarpCategoryRecord {
    const KIND: RecordKind = RecordKind::WarpCategories;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;

        let name = check.require(
            row.get::<String>("name")
                .map(|name| strip_colors(&name))
                .filter(|name| !name.trim().is_empty()),
            "invalid category name",
        )?;
        let slot = row.get::<i32>("slot").unwrap_or(-1);
        let icon = read_icon(row, ctx, &check);

        Ok(Self {
            island: check.island,
            category: CachedWarpCategoryInfo { name, slot, icon },
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.cached_warp_category_info_list.push(self.category);
    }
}

fn dimension_location(
    row: &RecordRow,
    check: &RowCheck,
) -> Result<(Dimension, Location), Rejection> {
    let dimension = check.require(
        row.get::<String>("environment")
            .and_then(|name| Dimension::from_name(&name)),
        "invalid environment",
    )?;
    let location = check.require(
        row.get::<String>("location")
            .and_then(|raw| Location::parse(&raw)),
        "invalid location",
    )?;
    Ok((dimension, location))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeRecord {
    pub island: Uuid,
    pub dimension: Dimension,
    pub location: Location,
}

impl StagedRecord for HomeRecord {
    const KIND: RecordKind = RecordKind::Homes;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let (dimension, location) = dimension_location(row, &check)?;
        Ok(Self {
            island: check.island,
            dimension,
            location,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.island_homes[self.dimension.ordinal()] = Some(self.location);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitorHomeRecord {
    pub island: Uuid,
    pub dimension: Dimension,
    pub location: Location,
}

impl StagedRecord for VisitorHomeRecord {
    const KIND: RecordKind = RecordKind::VisitorHomes;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let (dimension, location) = dimension_location(row, &check)?;
        Ok(Self {
            island: check.island,
            dimension,
            location,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.visitor_homes[self.dimension.ordinal()] = Some(self.location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::encode_item;
    use crate::pipeline::record::test_support::*;

    fn warp_row(island: Uuid, name: &str) -> RecordRow {
        island_row(island)
            .with_text("name", name)
            .with_text("location", "islands, 0.5, 100, 0.5")
    }

    #[test]
    fn test_warp_defaults() {
        let fixture = ContextFixture::new(0);
        let record = WarpRecord::validate(&warp_row(Uuid::new_v4(), "spawn"), &fixture.ctx())
            .unwrap();

        assert_eq!(record.warp.name, "spawn");
        assert_eq!(record.warp.category, "");
        assert!(record.warp.is_private);
        assert!(record.warp.icon.is_none());
    }

    #[test]
    fn test_warp_name_is_stripped_and_truncated() {
        let mut fixture = ContextFixture::new(0);
        fixture.config.max_warp_name_length = 4;
        let record = WarpRecord::validate(
            &warp_row(Uuid::new_v4(), "§aFarm§rland"),
            &fixture.ctx(),
        )
        .unwrap();

        assert_eq!(record.warp.name, "Farm");
    }

    #[test]
    fn test_colour_only_warp_name_is_rejected() {
        let fixture = ContextFixture::new(0);
        let rejection = WarpRecord::validate(&warp_row(Uuid::new_v4(), "&c&l"), &fixture.ctx())
            .unwrap_err();
        assert_eq!(rejection.reason, "invalid warp name");
    }

    #[test]
    fn test_bad_icon_is_dropped_and_reported() {
        let fixture = ContextFixture::new(0);
        let row = warp_row(Uuid::new_v4(), "mine")
            .with_text("icon", "!!not base64!!")
            .with("private", 0i64);

        let record = WarpRecord::validate(&row, &fixture.ctx()).unwrap();
        assert!(record.warp.icon.is_none());
        assert!(!record.warp.is_private);

        let report = fixture.report.lock().unwrap();
        assert_eq!(report.decode_failures.len(), 1);
        assert_eq!(report.decode_failures[0].field, "icon");
    }

    #[test]
    fn test_category_icon_and_slot() {
        let fixture = ContextFixture::new(0);
        let icon = ItemStack {
            material: "GRASS_BLOCK".to_string(),
            amount: 1,
            display_name: Some("Farms".to_string()),
            lore: Vec::new(),
        };
        let row = island_row(Uuid::new_v4())
            .with_text("name", "Farms")
            .with_text("icon", &encode_item(&icon).unwrap());

        let record = WarpCategoryRecord::validate(&row, &fixture.ctx()).unwrap();
        assert_eq!(record.category.slot, -1);
        assert_eq!(record.category.icon, Some(icon));
    }

    #[test]
    fn test_home_per_dimension() {
        let fixture = ContextFixture::new(0);
        let mut info = CachedIslandInfo::new(Uuid::nil());

        let row = island_row(Uuid::nil())
            .with_text("environment", "NETHER")
            .with_text("location", "islands_nether, 1, 2, 3, 90, 0");
        HomeRecord::validate(&row, &fixture.ctx())
            .unwrap()
            .apply(&mut info);

        assert!(info.island_homes[Dimension::Normal.ordinal()].is_none());
        let home = info.island_homes[Dimension::Nether.ordinal()].as_ref().unwrap();
        assert_eq!(home.world, "islands_nether");
        assert!(info.visitor_homes.iter().all(Option::is_none));
    }

    #[test]
    fn test_visitor_home_bad_location_is_rejected() {
        let fixture = ContextFixture::new(0);
        let row = island_row(Uuid::new_v4())
            .with_text("environment", "normal")
            .with_text("location", "nowhere");

        let rejection = VisitorHomeRecord::validate(&row, &fixture.ctx()).unwrap_err();
        assert_eq!(rejection.reason, "invalid location");
    }
}
