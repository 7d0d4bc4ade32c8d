//! Staging structure for one island
//!
//! `CachedIslandInfo` is filled field by field by independent record drivers.
//! No field depends on another, so the drivers can run in any order.

use super::types::{
    ChestPage, Dimension, EffectType, IslandFlag, IslandPrivilege, ItemStack, Key, Location,
    MissionRef, PlayerRef, PlayerRole, Rating, UnsetRule, UpgradeValue,
};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Privileges granted to one player on one island, built one row at a time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPermissionNode {
    pub privileges: HashMap<IslandPrivilege, u8>,
}

impl PlayerPermissionNode {
    pub fn load_privilege(&mut self, privilege: IslandPrivilege, status: u8) {
        self.privileges.insert(privilege, status);
    }

    pub fn status(&self, privilege: &IslandPrivilege) -> Option<u8> {
        self.privileges.get(privilege).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWarpInfo {
    pub name: String,
    pub category: String,
    pub location: Location,
    pub is_private: bool,
    pub icon: Option<ItemStack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWarpCategoryInfo {
    pub name: String,
    pub slot: i32,
    pub icon: Option<ItemStack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankAction {
    DepositCompleted,
    WithdrawCompleted,
    DepositFailed,
    WithdrawFailed,
}

impl BankAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT_COMPLETED" => Some(BankAction::DepositCompleted),
            "WITHDRAW_COMPLETED" => Some(BankAction::WithdrawCompleted),
            "DEPOSIT_FAILED" => Some(BankAction::DepositFailed),
            "WITHDRAW_FAILED" => Some(BankAction::WithdrawFailed),
            _ => None,
        }
    }
}

/// One entry of the island bank ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// `None` for transactions made by the console
    pub player: Option<PlayerRef>,
    pub action: BankAction,
    pub position: i32,
    pub time: i64,
    pub failure_reason: String,
    pub amount: BigDecimal,
}

/// In-progress reconstruction of one island
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedIslandInfo {
    pub uuid: Uuid,

    /// Members and their latest recorded role
    pub members: HashMap<PlayerRef, PlayerRole>,
    pub banned_players: HashSet<PlayerRef>,
    /// Visit log in load order: (visitor, visit time in millis)
    pub unique_visitors: Vec<(PlayerRef, i64)>,

    pub player_permissions: HashMap<PlayerRef, PlayerPermissionNode>,
    pub role_permissions: HashMap<IslandPrivilege, PlayerRole>,

    pub upgrades: HashMap<String, i32>,
    pub cached_warp_info_list: Vec<CachedWarpInfo>,
    pub cached_warp_category_info_list: Vec<CachedWarpCategoryInfo>,

    pub block_limits: HashMap<Key, UpgradeValue<i32>>,
    pub entity_limits: HashMap<Key, UpgradeValue<i32>>,
    pub ratings: HashMap<Uuid, Rating>,
    pub completed_missions: HashMap<MissionRef, i32>,
    pub island_flags: HashMap<IslandFlag, u8>,

    /// Generator rates, indexed by `Dimension::ordinal`
    pub cobble_generator_values: [HashMap<Key, UpgradeValue<i32>>; Dimension::COUNT],
    pub island_homes: [Option<Location>; Dimension::COUNT],
    pub visitor_homes: [Option<Location>; Dimension::COUNT],

    pub island_effects: HashMap<EffectType, UpgradeValue<i32>>,
    pub island_chests: Vec<ChestPage>,
    pub role_limits: HashMap<PlayerRole, UpgradeValue<i32>>,

    pub balance: BigDecimal,
    /// Unix seconds
    pub last_interest_time: i64,

    pub island_size: UpgradeValue<i32>,
    pub team_limit: UpgradeValue<i32>,
    pub warps_limit: UpgradeValue<i32>,
    pub crop_growth: UpgradeValue<f64>,
    pub spawner_rates: UpgradeValue<f64>,
    pub mob_drops: UpgradeValue<f64>,
    pub coop_limit: UpgradeValue<i32>,
    pub bank_limit: UpgradeValue<BigDecimal>,

    pub bank_transactions: Vec<BankTransaction>,

    /// Block-count ledger restored from the island row
    pub block_counts: HashMap<Key, BigInt>,
}

impl CachedIslandInfo {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            members: HashMap::new(),
            banned_players: HashSet::new(),
            unique_visitors: Vec::new(),
            player_permissions: HashMap::new(),
            role_permissions: HashMap::new(),
            upgrades: HashMap::new(),
            cached_warp_info_list: Vec::new(),
            cached_warp_category_info_list: Vec::new(),
            block_limits: HashMap::new(),
            entity_limits: HashMap::new(),
            ratings: HashMap::new(),
            completed_missions: HashMap::new(),
            island_flags: HashMap::new(),
            cobble_generator_values: Default::default(),
            island_homes: Default::default(),
            visitor_homes: Default::default(),
            island_effects: HashMap::new(),
            island_chests: Vec::new(),
            role_limits: HashMap::new(),
            balance: BigDecimal::from(0),
            last_interest_time: 0,
            island_size: UpgradeValue::negative_unset(-1),
            team_limit: UpgradeValue::negative_unset(-1),
            warps_limit: UpgradeValue::negative_unset(-1),
            crop_growth: UpgradeValue::negative_unset(-1.0),
            spawner_rates: UpgradeValue::negative_unset(-1.0),
            mob_drops: UpgradeValue::negative_unset(-1.0),
            coop_limit: UpgradeValue::negative_unset(-1),
            bank_limit: UpgradeValue::new(BigDecimal::from(-2), UnsetRule::BelowMinusOne),
            bank_transactions: Vec::new(),
            block_counts: HashMap::new(),
        }
    }

    /// Accumulate a restored block count without any placement side effects
    pub fn add_block_count(&mut self, key: Key, amount: BigInt) {
        *self.block_counts.entry(key).or_default() += amount;
    }

    /// Store a chest page at `index`, padding missing pages with empty slots
    pub fn place_chest(&mut self, index: usize, page: ChestPage, slot_count: usize) {
        while self.island_chests.len() < index {
            self.island_chests.push(vec![None; slot_count]);
        }

        if index < self.island_chests.len() {
            self.island_chests[index] = page;
        } else {
            self.island_chests.push(page);
        }
    }
}
