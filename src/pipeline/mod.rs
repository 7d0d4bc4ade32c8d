//! # Island reconstruction pipeline
//!
//! Rebuilds staged islands from the normalized island tables. Every table is
//! one record kind with its own driver:
//!
//! ```text
//! RecordStore::for_each_record(kind)
//!     ↓
//! StagedRecord::validate (row → typed record, or Rejection)
//!     ↓
//! StagingStore::with_island (get-or-create, per-island lock)
//!     ↓
//! StagedRecord::apply (merge into CachedIslandInfo)
//! ```
//!
//! Drivers share nothing but the staging store, so kinds can be loaded in
//! any order, or concurrently (see `ingestion`). A rejected record is logged,
//! collected in the `LoadReport` and skipped; the rest of the stream goes on.
//!
//! ## Module Organization
//!
//! - `record` - validation helpers and the `StagedRecord` trait
//! - `engine` - `IslandsLoader`, the per-kind drivers
//! - `ingestion` - concurrent load across kinds
//! - `membership`, `permissions`, `progression`, `locations`, `chests`,
//!   `bank`, `islands` - one record type per table

pub mod bank;
pub mod chests;
pub mod engine;
pub mod ingestion;
pub mod islands;
pub mod locations;
pub mod membership;
pub mod permissions;
pub mod progression;
pub mod record;

pub use engine::{DriverStats, IslandsLoader, LoadOutcome, LoadSummary};
pub use ingestion::load_concurrently;
pub use record::{LoadContext, StagedRecord};

use serde::Serialize;

/// One persisted record kind (table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    BlockCounts,
    Members,
    Bans,
    Visitors,
    PlayerPermissions,
    RolePermissions,
    Upgrades,
    Warps,
    BlockLimits,
    EntityLimits,
    Ratings,
    Missions,
    Flags,
    Generators,
    Homes,
    VisitorHomes,
    Effects,
    Chests,
    RoleLimits,
    WarpCategories,
    Banks,
    Settings,
    BankTransactions,
}

impl RecordKind {
    pub const ALL: [RecordKind; 23] = [
        RecordKind::BlockCounts,
        RecordKind::Members,
        RecordKind::Bans,
        RecordKind::Visitors,
        RecordKind::PlayerPermissions,
        RecordKind::RolePermissions,
        RecordKind::Upgrades,
        RecordKind::Warps,
        RecordKind::BlockLimits,
        RecordKind::EntityLimits,
        RecordKind::Ratings,
        RecordKind::Missions,
        RecordKind::Flags,
        RecordKind::Generators,
        RecordKind::Homes,
        RecordKind::VisitorHomes,
        RecordKind::Effects,
        RecordKind::Chests,
        RecordKind::RoleLimits,
        RecordKind::WarpCategories,
        RecordKind::Banks,
        RecordKind::Settings,
        RecordKind::BankTransactions,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            RecordKind::BlockCounts => "islands",
            RecordKind::Members => "islands_members",
            RecordKind::Bans => "islands_bans",
            RecordKind::Visitors => "islands_visitors",
            RecordKind::PlayerPermissions => "islands_player_permissions",
            RecordKind::RolePermissions => "islands_role_permissions",
            RecordKind::Upgrades => "islands_upgrades",
            RecordKind::Warps => "islands_warps",
            RecordKind::BlockLimits => "islands_block_limits",
            RecordKind::EntityLimits => "islands_entity_limits",
            RecordKind::Ratings => "islands_ratings",
            RecordKind::Missions => "islands_missions",
            RecordKind::Flags => "islands_flags",
            RecordKind::Generators => "islands_generators",
            RecordKind::Homes => "islands_homes",
            RecordKind::VisitorHomes => "islands_visitor_homes",
            RecordKind::Effects => "islands_effects",
            RecordKind::Chests => "islands_chests",
            RecordKind::RoleLimits => "islands_role_limits",
            RecordKind::WarpCategories => "islands_warp_categories",
            RecordKind::Banks => "islands_banks",
            RecordKind::Settings => "islands_settings",
            RecordKind::BankTransactions => "bank_transactions",
        }
    }

    /// Column naming the island a record belongs to
    pub fn identity_column(&self) -> &'static str {
        match self {
            RecordKind::BlockCounts => "uuid",
            _ => "island",
        }
    }

    /// Human-readable name used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            RecordKind::BlockCounts => "block counts",
            RecordKind::Members => "island members",
            RecordKind::Bans => "banned players",
            RecordKind::Visitors => "island visitors",
            RecordKind::PlayerPermissions => "player permissions",
            RecordKind::RolePermissions => "role permissions",
            RecordKind::Upgrades => "upgrades",
            RecordKind::Warps => "warps",
            RecordKind::BlockLimits => "block limits",
            RecordKind::EntityLimits => "entity limits",
            RecordKind::Ratings => "ratings",
            RecordKind::Missions => "island missions",
            RecordKind::Flags => "island flags",
            RecordKind::Generators => "generator rates",
            RecordKind::Homes => "island homes",
            RecordKind::VisitorHomes => "visitor homes",
            RecordKind::Effects => "island effects",
            RecordKind::Chests => "island chests",
            RecordKind::RoleLimits => "role limits",
            RecordKind::WarpCategories => "warp categories",
            RecordKind::Banks => "island banks",
            RecordKind::Settings => "island settings",
            RecordKind::BankTransactions => "bank transactions",
        }
    }

    pub fn from_table_name(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table_name() == table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_are_unique() {
        let names: HashSet<_> = RecordKind::ALL.iter().map(|k| k.table_name()).collect();
        assert_eq!(names.len(), RecordKind::ALL.len());
    }

    #[test]
    fn test_table_name_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_table_name(kind.table_name()), Some(kind));
        }
        assert_eq!(RecordKind::from_table_name("players"), None);
    }
}
