//! Player and role permission matrices

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::island_cache::{CachedIslandInfo, IslandPrivilege, PlayerRef, PlayerRole};
use crate::record_store::RecordRow;
use crate::report::Rejection;
use uuid::Uuid;

/// One privilege of one player; several rows build up the player's node
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPermissionRecord {
    pub island: Uuid,
    pub player: PlayerRef,
    pub privilege: IslandPrivilege,
    pub status: u8,
}

impl StagedRecord for PlayerPermissionRecord {
    const KIND: RecordKind = RecordKind::PlayerPermissions;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let player = check.require(row.get::<Uuid>("player"), "invalid player uuid")?;
        let privilege = check.require(
            row.get::<String>("permission")
                .and_then(|name| ctx.resolvers.resolve_privilege(&name)),
            "invalid permission",
        )?;
        let status = check.require(row.get::<u8>("status"), "invalid status")?;

        Ok(Self {
            island: check.island,
            player: ctx.resolvers.resolve_player(player),
            privilege,
            status,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.player_permissions
            .entry(self.player)
            .or_default()
            .load_privilege(self.privilege, self.status);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RolePermissionRecord {
    pub island: Uuid,
    pub role: PlayerRole,
    pub privilege: IslandPrivilege,
}

impl StagedRecord for RolePermissionRecord {
    const KIND: RecordKind = RecordKind::RolePermissions;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let role = check.require(
            row.get::<i32>("role").and_then(PlayerRole::from_id),
            "invalid role",
        )?;
        let privilege = check.require(
            row.get::<String>("permission")
                .and_then(|name| ctx.resolvers.resolve_privilege(&name)),
            "invalid permission",
        )?;

        Ok(Self {
            island: check.island,
            role,
            privilege,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.role_permissions.insert(self.privilege, self.role);
    }
}
