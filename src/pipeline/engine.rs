//! Islands loader - per-kind drivers over a record store
//!
//! `IslandsLoader` owns the staging store and the load report. One driver
//! call (`run_kind`) streams every record of one kind out of a `RecordStore`,
//! validates it and merges it into its island. Drivers only take `&self`, so
//! a loader behind an `Arc` can run several kinds at once.

use super::bank::{BankRecord, SettingsRecord, TransactionRecord};
use super::chests::ChestRecord;
use super::islands::BlockCountsRecord;
use super::locations::{HomeRecord, VisitorHomeRecord, WarpCategoryRecord, WarpRecord};
use super::membership::{BanRecord, MemberRecord, RatingRecord, VisitorRecord};
use super::permissions::{PlayerPermissionRecord, RolePermissionRecord};
use super::progression::{
    BlockLimitRecord, EffectRecord, EntityLimitRecord, FlagRecord, GeneratorRecord, MissionRecord,
    RoleLimitRecord, UpgradeRecord,
};
use super::record::{stage, LoadContext};
use super::RecordKind;
use crate::config::LoaderConfig;
use crate::island_cache::{CachedIslandInfo, StagingStore};
use crate::record_store::{RecordRow, RecordStore, StoreError};
use crate::report::{LoadReport, Rejection};
use crate::resolvers::Resolvers;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Outcome of one driver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub kind: RecordKind,
    pub accepted: u64,
    pub rejected: u64,
    /// The driver did not run (bank transactions with caching disabled)
    pub skipped: bool,
}

impl DriverStats {
    fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            accepted: 0,
            rejected: 0,
            skipped: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub drivers: Vec<DriverStats>,
    /// Islands staged once every driver finished
    pub islands: usize,
}

impl LoadSummary {
    pub fn total_accepted(&self) -> u64 {
        self.drivers.iter().map(|d| d.accepted).sum()
    }

    pub fn total_rejected(&self) -> u64 {
        self.drivers.iter().map(|d| d.rejected).sum()
    }

    pub fn stats_for(&self, kind: RecordKind) -> Option<&DriverStats> {
        self.drivers.iter().find(|d| d.kind == kind)
    }
}

/// Staged islands plus every diagnostic collected on the way
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub islands: HashMap<Uuid, CachedIslandInfo>,
    pub report: LoadReport,
}

pub struct IslandsLoader {
    config: LoaderConfig,
    resolvers: Arc<dyn Resolvers>,
    staging: StagingStore,
    report: Mutex<LoadReport>,

    /// Unix millis (injectable for tests)
    now_fn: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl IslandsLoader {
    pub fn new(config: LoaderConfig, resolvers: Arc<dyn Resolvers>) -> Self {
        Self::new_with_clock(
            config,
            resolvers,
            Box::new(|| chrono::Utc::now().timestamp_millis()),
        )
    }

    /// Loader with a custom clock returning Unix millis
    pub fn new_with_clock(
        config: LoaderConfig,
        resolvers: Arc<dyn Resolvers>,
        now_fn: Box<dyn Fn() -> i64 + Send + Sync>,
    ) -> Self {
        Self {
            config,
            resolvers,
            staging: StagingStore::new(),
            report: Mutex::new(LoadReport::default()),
            now_fn,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn context(&self) -> LoadContext<'_> {
        LoadContext::new(
            &self.config,
            self.resolvers.as_ref(),
            self.now_fn.as_ref(),
            &self.report,
        )
    }

    /// Run the driver for one record kind to completion
    ///
    /// Rejected records are logged and collected; only a failure of the store
    /// itself ends the driver early.
    pub fn run_kind(
        &self,
        store: &dyn RecordStore,
        kind: RecordKind,
    ) -> Result<DriverStats, StoreError> {
        let mut stats = DriverStats::new(kind);

        if kind == RecordKind::BankTransactions && !self.config.is_transaction_caching_enabled() {
            log::debug!("⏭️  Skipping {}: transaction caching disabled", kind.describe());
            stats.skipped = true;
            return Ok(stats);
        }

        let ctx = self.context();
        store.for_each_record(kind.table_name(), &mut |row: &RecordRow| {
            match self.stage_row(kind, row, &ctx) {
                Ok(()) => stats.accepted += 1,
                Err(rejection) => {
                    stats.rejected += 1;
                    self.lock_report().record_rejection(rejection);
                }
            }
        })?;

        log::info!(
            "📦 Loaded {}: {} accepted, {} rejected",
            kind.describe(),
            stats.accepted,
            stats.rejected
        );
        Ok(stats)
    }

    fn stage_row(
        &self,
        kind: RecordKind,
        row: &RecordRow,
        ctx: &LoadContext<'_>,
    ) -> Result<(), Rejection> {
        let staging = &self.staging;
        match kind {
            RecordKind::BlockCounts => stage::<BlockCountsRecord>(row, ctx, staging),
            RecordKind::Members => stage::<MemberRecord>(row, ctx, staging),
            RecordKind::Bans => stage::<BanRecord>(row, ctx, staging),
            RecordKind::Visitors => stage::<VisitorRecord>(row, ctx, staging),
            RecordKind::PlayerPermissions => stage::<PlayerPermissionRecord>(row, ctx, staging),
            RecordKind::RolePermissions => stage::<RolePermissionRecord>(row, ctx, staging),
            RecordKind::Upgrades => stage::<UpgradeRecord>(row, ctx, staging),
            RecordKind::Warps => stage::<WarpRecord>(row, ctx, staging),
            RecordKind::BlockLimits => stage::<BlockLimitRecord>(row, ctx, staging),
            RecordKind::EntityLimits => stage::<EntityLimitRecord>(row, ctx, staging),
            RecordKind::Ratings => stage::<RatingRecord>(row, ctx, staging),
            RecordKind::Missions => stage::<MissionRecord>(row, ctx, staging),
            RecordKind::Flags => stage::<FlagRecord>(row, ctx, staging),
            RecordKind::Generators => stage::<GeneratorRecord>(row, ctx, staging),
            RecordKind::Homes => stage::<HomeRecord>(row, ctx, staging),
            RecordKind::VisitorHomes => stage::<VisitorHomeRecord>(row, ctx, staging),
            RecordKind::Effects => stage::<EffectRecord>(row, ctx, staging),
            RecordKind::Chests => stage::<ChestRecord>(row, ctx, staging),
            RecordKind::RoleLimits => stage::<RoleLimitRecord>(row, ctx, staging),
            RecordKind::WarpCategories => stage::<WarpCategoryRecord>(row, ctx, staging),
            RecordKind::Banks => stage::<BankRecord>(row, ctx, staging),
            RecordKind::Settings => stage::<SettingsRecord>(row, ctx, staging),
            RecordKind::BankTransactions => stage::<TransactionRecord>(row, ctx, staging),
        }
    }

    /// Run every driver sequentially against one store
    pub fn load_all(&self, store: &dyn RecordStore) -> Result<LoadSummary, StoreError> {
        self.load_kinds(store, &RecordKind::ALL)
    }

    /// Run the drivers for `kinds`, in the given order
    pub fn load_kinds(
        &self,
        store: &dyn RecordStore,
        kinds: &[RecordKind],
    ) -> Result<LoadSummary, StoreError> {
        let drivers = kinds
            .iter()
            .map(|&kind| self.run_kind(store, kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.summarize(drivers))
    }

    pub(crate) fn summarize(&self, drivers: Vec<DriverStats>) -> LoadSummary {
        LoadSummary {
            drivers,
            islands: self.staging.len(),
        }
    }

    pub fn staging(&self) -> &StagingStore {
        &self.staging
    }

    /// Copy of the diagnostics collected so far
    pub fn report(&self) -> LoadReport {
        self.lock_report().clone()
    }

    fn lock_report(&self) -> std::sync::MutexGuard<'_, LoadReport> {
        self.report.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything staged so far, leaving the loader usable
    pub fn outcome(&self) -> LoadOutcome {
        let islands = self
            .staging
            .island_ids()
            .into_iter()
            .filter_map(|uuid| self.staging.snapshot(&uuid).map(|info| (uuid, info)))
            .collect();

        LoadOutcome {
            islands,
            report: self.report(),
        }
    }

    /// Hand over the staged islands and the report
    pub fn finish(self) -> LoadOutcome {
        LoadOutcome {
            islands: self.staging.into_islands(),
            report: self.report.into_inner().unwrap_or_else(PoisonError::into_inner),
        }
    }
}
