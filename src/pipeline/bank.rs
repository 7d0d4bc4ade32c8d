//! Bank balance, island settings and bank transactions

use super::record::{LoadContext, RowCheck, StagedRecord};
use super::RecordKind;
use crate::island_cache::{BankAction, BankTransaction, CachedIslandInfo, UnsetRule, UpgradeValue};
use crate::record_store::RecordRow;
use crate::report::Rejection;
use bigdecimal::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub island: Uuid,
    pub balance: BigDecimal,
    /// Unix seconds
    pub last_interest_time: i64,
}

/// Some rows stored the interest time in millis; bring those back to seconds
fn normalize_interest_time(stored: i64, now_secs: i64) -> i64 {
    if stored > now_secs {
        stored / 1000
    } else {
        stored
    }
}

impl StagedRecord for BankRecord {
    const KIND: RecordKind = RecordKind::Banks;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;
        let balance = check.require(row.get::<BigDecimal>("balance"), "invalid balance")?;

        let now_secs = ctx.now_secs();
        let last_interest_time = normalize_interest_time(
            row.get::<i64>("last_interest_time").unwrap_or(now_secs),
            now_secs,
        );

        Ok(Self {
            island: check.island,
            balance,
            last_interest_time,
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.balance = self.balance;
        info.last_interest_time = self.last_interest_time;
    }
}

/// Island settings row; every column is optional and falls back to its sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsRecord {
    pub island: Uuid,
    pub size: i32,
    pub members_limit: i32,
    pub warps_limit: i32,
    pub crop_growth: f64,
    pub spawner_rates: f64,
    pub mob_drops: f64,
    pub coops_limit: i32,
    pub bank_limit: BigDecimal,
}

impl StagedRecord for SettingsRecord {
    const KIND: RecordKind = RecordKind::Settings;

    fn validate(row: &RecordRow, _ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;

        Ok(Self {
            island: check.island,
            size: row.get("size").unwrap_or(-1),
            members_limit: row.get("members_limit").unwrap_or(-1),
            warps_limit: row.get("warps_limit").unwrap_or(-1),
            crop_growth: row.get("crop_growth_multiplier").unwrap_or(-1.0),
            spawner_rates: row.get("spawner_rates_multiplier").unwrap_or(-1.0),
            mob_drops: row.get("mob_drops_multiplier").unwrap_or(-1.0),
            coops_limit: row.get("coops_limit").unwrap_or(-1),
            bank_limit: row
                .get("bank_limit")
                .unwrap_or_else(|| BigDecimal::from(-2)),
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.island_size = UpgradeValue::negative_unset(self.size);
        info.team_limit = UpgradeValue::negative_unset(self.members_limit);
        info.warps_limit = UpgradeValue::negative_unset(self.warps_limit);
        info.crop_growth = UpgradeValue::negative_unset(self.crop_growth);
        info.spawner_rates = UpgradeValue::negative_unset(self.spawner_rates);
        info.mob_drops = UpgradeValue::negative_unset(self.mob_drops);
        info.coop_limit = UpgradeValue::negative_unset(self.coops_limit);
        // -1 means unlimited, so only values below it are unset
        info.bank_limit = UpgradeValue::new(self.bank_limit, UnsetRule::BelowMinusOne);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub island: Uuid,
    pub transaction: BankTransaction,
}

impl StagedRecord for TransactionRecord {
    const KIND: RecordKind = RecordKind::BankTransactions;

    fn validate(row: &RecordRow, ctx: &LoadContext<'_>) -> Result<Self, Rejection> {
        let check = RowCheck::island(row, Self::KIND)?;

        // Console transactions carry no player
        let player = row
            .get::<Uuid>("player")
            .map(|uuid| ctx.resolvers.resolve_player(uuid));
        let action = check.require(
            row.get::<String>("bank_action")
                .and_then(|name| BankAction::from_name(&name)),
            "invalid bank action",
        )?;
        let position = check.require(row.get::<i32>("position"), "invalid position")?;
        let time = check.require(row.get::<i64>("time"), "invalid time")?;
        let failure_reason = row.get::<String>("failure_reason").unwrap_or_default();
        let amount = check.require(row.get::<BigDecimal>("amount"), "invalid amount")?;

        Ok(Self {
            island: check.island,
            transaction: BankTransaction {
                player,
                action,
                position,
                time,
                failure_reason,
                amount,
            },
        })
    }

    fn island(&self) -> Uuid {
        self.island
    }

    fn apply(self, info: &mut CachedIslandInfo) {
        info.bank_transactions.push(self.transaction);
    }
}
