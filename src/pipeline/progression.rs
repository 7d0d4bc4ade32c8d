//! Upgrades, limits, missions, flags, generators and effects
//!
//! All of these are keyed tables where a later row for the same key replaces
//! the earlier one.

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::island_cache::{
    CachedIslandInfo, Dimension, EffectType, IslandFlag, Key, MissionRef, PlayerRole, UpgradeValue,
};
use crate::record_store::RecordRow;
use crate::report::Rejection;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeRecord {
    pub island: Uuid,
    pub upgrade: String,
    pub level: i32,
}

impl StagedRecord for UpgradeRecord {
    const KIND: RecordKind = RecordKind::Upgrades;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let upgrade = check.require(
            row.get::<String>("upgrade").filter(|name| !name.trim().is_empty()),
            "invalid upgrade name",
        )?;
        let level = check.require(row.get::<i32>("level"), "invalid level")?;

        Ok(Self {
            island: check.island,
            upgrade,
            level,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.upgrades.insert(self.upgrade, self.level);
    }
}

/// Shared shape of the block and entity limit tables
fn keyed_limit(
    row: &RecordRow,
    ctx: &LoadContext<'_>,
    kind: RecordKind,
    key_column: &str,
) -> Result<(Uuid, Key, i32), Rejection> {
    let check = RowCheck::island(row, kind)?;
    let key = check.require(
        row.get::<String>(key_column)
            .and_then(|raw| ctx.resolvers.resolve_key(&raw)),
        &format!("invalid {}", key_column),
    )?;
    let limit = check.require(row.get::<i32>("limit"), "invalid limit")?;
    Ok((check.island, key, limit))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLimitRecord {
    pub island: Uuid,
    pub block: Key,
    pub limit: i32,
}

impl StagedRecord for BlockLimitRecord {
    const KIND: RecordKind = RecordKind::BlockLimits;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let (island, block, limit) = keyed_limit(row, ctx, Self::KIND, "block")?;
        Ok(Self {
            island,
            block,
            limit,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.block_limits
            .insert(self.block, UpgradeValue::negative_unset(self.limit));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityLimitRecord {
    pub island: Uuid,
    pub entity: Key,
    pub limit: i32,
}

impl StagedRecord for EntityLimitRecord {
    const KIND: RecordKind = RecordKind::EntityLimits;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let (island, entity, limit) = keyed_limit(row, ctx, Self::KIND, "entity")?;
        Ok(Self {
            island,
            entity,
            limit,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.entity_limits
            .insert(self.entity, UpgradeValue::negative_unset(self.limit));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionRecord {
    pub island: Uuid,
    pub mission: MissionRef,
    pub finish_count: i32,
}

impl StagedRecord for MissionRecord {
    const KIND: RecordKind = RecordKind::Missions;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let mission = check.require(
            row.get::<String>("name")
                .and_then(|name| ctx.resolvers.resolve_mission(&name)),
            "invalid mission",
        )?;
        let finish_count =
            check.require(row.get::<i32>("finish_count"), "invalid finish count")?;

        Ok(Self {
            island: check.island,
            mission,
            finish_count,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.completed_missions
            .insert(self.mission, self.finish_count);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlagRecord {
    pub island: Uuid,
    pub flag: IslandFlag,
    pub status: u8,
}

impl StagedRecord for FlagRecord {
    const KIND: RecordKind = RecordKind::Flags;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let flag = check.require(
            row.get::<String>("name")
                .and_then(|name| ctx.resolvers.resolve_flag(&name)),
            "invalid flag name",
        )?;
        let status = check.require(row.get::<u8>("status"), "invalid status")?;

        Ok(Self {
            island: check.island,
            flag,
            status,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.island_flags.insert(self.flag, self.status);
    }
}

/// One block rate of one dimension's cobblestone generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorRecord {
    pub island: Uuid,
    pub dimension: Dimension,
    pub block: Key,
    pub rate: i32,
}

impl StagedRecord for GeneratorRecord {
    const KIND: RecordKind = RecordKind::Generators;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let dimension = check.require(
            row.get::<String>("environment")
                .and_then(|name| Dimension::from_name(&name)),
            "invalid environment",
        )?;
        let block = check.require(
            row.get::<String>("block")
                .and_then(|raw| ctx.resolvers.resolve_key(&raw)),
            "invalid block",
        )?;
        let rate = check.require(row.get::<i32>("rate"), "invalid rate")?;

        Ok(Self {
            island: check.island,
            dimension,
            block,
            rate,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        // Rows of the same dimension share one map; never replace it
        info.cobble_generator_values[self.dimension.ordinal()]
            .insert(self.block, UpgradeValue::negative_unset(self.rate));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectRecord {
    pub island: Uuid,
    pub effect: EffectType,
    pub level: i32,
}

impl StagedRecord for EffectRecord {
    const KIND: RecordKind = RecordKind::Effects;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let effect = check.require(
            row.get::<String>("effect_type")
                .and_then(|name| ctx.resolvers.resolve_effect(&name)),
            "invalid effect type",
        )?;
        let level = check.require(row.get::<i32>("level"), "invalid level")?;

        Ok(Self {
            island: check.island,
            effect,
            level,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.island_effects
            .insert(self.effect, UpgradeValue::negative_unset(self.level));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleLimitRecord {
    pub island: Uuid,
    pub role: PlayerRole,
    pub limit: i32,
}

impl StagedRecord for RoleLimitRecord {
    const KIND: RecordKind = RecordKind::RoleLimits;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let role = check.require(
            row.get::<i32>("role").and_then(PlayerRole::from_id),
            "invalid role",
        )?;
        let limit = check.require(row.get::<i32>("limit"), "invalid limit")?;

        Ok(Self {
            island: check.island,
            role,
            limit,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.role_limits
            .insert(self.role, UpgradeValue::negative_unset(self.limit));
    }
}
