//! Concurrent ingestion - one blocking task per record kind
//!
//! Store handles (a SQLite connection in particular) are not shared between
//! threads. Every task opens its own handle through `open_store`, then runs a
//! single driver against the shared loader. Islands are created on first
//! touch by whichever driver gets there first.

use super::engine::{IslandsLoader, LoadSummary};
use super::RecordKind;
use crate::record_store::{RecordStore, StoreError};
use std::sync::Arc;

/// Run every record kind concurrently and wait for all of them
///
/// The first store or task failure is returned once every task has finished.
pub async fn load_concurrently<S, F>(
    loader: Arc<IslandsLoader>,
    open_store: F,
) -> Result<LoadSummary, StoreError>
where
    S: RecordStore + 'static,
    F: Fn() -> Result<S, StoreError> + Send + Sync + 'static,
{
    let open_store = Arc::new(open_store);

    log::info!(
        "🚀 Loading {} record kinds concurrently",
        RecordKind::ALL.len()
    );

    let handles: Vec<_> = RecordKind::ALL
        .into_iter()
        .map(|kind| {
            let loader = Arc::clone(&loader);
            let open_store = Arc::clone(&open_store);
            tokio::task::spawn_blocking(move || {
                let store = (*open_store)()?;
                loader.run_kind(&store, kind)
            })
        })
        .collect();

    let mut drivers = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for handle in handles {
        match handle.await {
            Ok(Ok(stats)) => drivers.push(stats),
            Ok(Err(e)) => {
                log::error!("❌ Driver failed: {}", e);
                first_error.get_or_insert(e);
            }
            Err(join_error) => {
                log::error!("❌ Loader task panicked: {}", join_error);
                first_error.get_or_insert(StoreError::Task(join_error.to_string()));
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(loader.summarize(drivers)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::record_store::{MemoryRecordStore, RecordRow};
    use crate::resolvers::CatalogResolvers;
    use uuid::Uuid;

    fn shared_loader() -> Arc<IslandsLoader> {
        Arc::new(IslandsLoader::new_with_clock(
            LoaderConfig::default(),
            Arc::new(CatalogResolvers::new()),
            Box::new(|| 1_700_000_000_000),
        ))
    }

    #[tokio::test]
    async fn test_concurrent_load_merges_all_kinds() {
        let island = Uuid::new_v4();
        let id = island.to_string();
        let store = MemoryRecordStore::new()
            .with(
                "islands",
                RecordRow::new()
                    .with_text("uuid", &id)
                    .with_text("block_counts", r#"[{"id":"STONE","amount":"7"}]"#),
            )
            .with(
                "islands_upgrades",
                RecordRow::new()
                    .with_text("island", &id)
                    .with_text("upgrade", "size")
                    .with("level", 3i64),
            )
            .with(
                "islands_bans",
                RecordRow::new()
                    .with_text("island", &id)
                    .with_text("player", &Uuid::new_v4().to_string()),
            );

        let loader = shared_loader();
        let summary = load_concurrently(Arc::clone(&loader), move || Ok(store.clone()))
            .await
            .unwrap();

        assert_eq!(summary.drivers.len(), RecordKind::ALL.len());
        assert_eq!(summary.total_accepted(), 3);
        assert_eq!(summary.islands, 1);

        let info = loader.staging().snapshot(&island).unwrap();
        assert_eq!(info.upgrades["size"], 3);
        assert_eq!(info.banned_players.len(), 1);
        assert_eq!(info.block_counts.len(), 1);
    }

    #[tokio::test]
    async fn test_store_open_failure_is_reported() {
        let loader = shared_loader();
        let result = load_concurrently(loader, || -> Result<MemoryRecordStore, StoreError> {
            Err(StoreError::InvalidKind("offline".to_string()))
        })
        .await;

        assert!(matches!(result, Err(StoreError::InvalidKind(_))));
    }
}
