//! Island staging structures and the shared staging store

pub mod cached;
pub mod staging;
pub mod types;

pub use cached::{
    BankAction, BankTransaction, CachedIslandInfo, CachedWarpCategoryInfo, CachedWarpInfo,
    PlayerPermissionNode,
};
pub use staging::{SharedIsland, StagingStore};
pub use types::{
    Bounded, ChestPage, Dimension, EffectType, IslandFlag, IslandPrivilege, ItemStack, Key,
    Location, MissionRef, PlayerRef, PlayerRole, Rating, UnsetRule, UpgradeValue,
};
