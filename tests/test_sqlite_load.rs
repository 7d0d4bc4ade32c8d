//! End-to-end loads from a SQLite island database

#[cfg(test)]
mod sqlite_load_tests {
    use isleload::decoding::encode_chest_contents;
    use isleload::island_cache::{ItemStack, Key};
    use isleload::pipeline::{load_concurrently, IslandsLoader, RecordKind};
    use isleload::{CatalogResolvers, LoaderConfig, SqliteRecordStore};
    use num_bigint::BigInt;
    use rusqlite::{params, Connection};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use uuid::Uuid;

    const NOW_MILLIS: i64 = 1_700_000_000_000;

    const SCHEMA: &str = "
        CREATE TABLE islands (uuid TEXT, block_counts TEXT);
        CREATE TABLE islands_upgrades (island TEXT, upgrade TEXT, level INTEGER);
        CREATE TABLE islands_settings (
            island TEXT, size INTEGER, members_limit INTEGER, warps_limit INTEGER,
            crop_growth_multiplier REAL, spawner_rates_multiplier REAL,
            mob_drops_multiplier REAL, coops_limit INTEGER, bank_limit TEXT
        );
        CREATE TABLE islands_chests (island TEXT, \"index\" INTEGER, contents TEXT);
        CREATE TABLE islands_banks (island TEXT, balance TEXT, last_interest_time INTEGER);
    ";

    fn create_db(dir: &TempDir) -> (String, Connection) {
        let path = dir.path().join("islands.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        (path.to_str().unwrap().to_string(), conn)
    }

    fn new_loader() -> IslandsLoader {
        IslandsLoader::new_with_clock(
            LoaderConfig::default(),
            Arc::new(CatalogResolvers::new()),
            Box::new(|| NOW_MILLIS),
        )
    }

    fn load(path: &str) -> isleload::LoadOutcome {
        let store = SqliteRecordStore::open(Path::new(path)).unwrap();
        let loader = new_loader();
        loader.load_all(&store).unwrap();
        loader.finish()
    }

    #[test]
    fn test_upgrades_and_settings_end_to_end() {
        let dir = TempDir::new().unwrap();
        let (path, conn) = create_db(&dir);
        let island = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO islands_upgrades (island, upgrade, level) VALUES (?1, 'size', 3)",
            params![island],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO islands_settings (island, size) VALUES (?1, 10)",
            params![island],
        )
        .unwrap();
        drop(conn);

        let outcome = load(&path);
        let info = &outcome.islands[&Uuid::parse_str(&island).unwrap()];

        assert_eq!(info.upgrades["size"], 3);
        assert_eq!(info.island_size.value, 10);
        assert!(!info.island_size.is_unset());
        // Columns left NULL keep their sentinels
        assert!(info.team_limit.is_unset());
        assert!(info.crop_growth.is_unset());
        assert!(info.bank_limit.is_unset());
        assert!(info.members.is_empty());
        assert!(info.block_counts.is_empty());
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_legacy_ledger_matches_current_totals() {
        let dir = TempDir::new().unwrap();
        let (path, conn) = create_db(&dir);
        let current = Uuid::new_v4();
        let legacy = Uuid::new_v4();

        conn.execute(
            "INSERT INTO islands (uuid, block_counts) VALUES (?1, ?2)",
            params![
                current.to_string(),
                r#"[{"id":"STONE","amount":"120"},{"id":"HOPPER","amount":"3"},{"id":"STONE","amount":"5"}]"#
            ],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO islands (uuid, block_counts) VALUES (?1, ?2)",
            params![legacy.to_string(), "STONE=120;HOPPER=3;STONE=5"],
        )
        .unwrap();
        drop(conn);

        let outcome = load(&path);
        let current = &outcome.islands[&current].block_counts;
        let legacy = &outcome.islands[&legacy].block_counts;

        assert_eq!(current, legacy);
        assert_eq!(legacy[&Key::parse("STONE").unwrap()], BigInt::from(125));
    }

    #[test]
    fn test_single_chest_page_is_padded() {
        let dir = TempDir::new().unwrap();
        let (path, conn) = create_db(&dir);
        let island = Uuid::new_v4();
        let page = vec![
            None,
            Some(ItemStack {
                material: "DIAMOND".to_string(),
                amount: 3,
                display_name: None,
                lore: Vec::new(),
            }),
        ];

        conn.execute(
            "INSERT INTO islands_chests (island, \"index\", contents) VALUES (?1, 2, ?2)",
            params![island.to_string(), encode_chest_contents(&page).unwrap()],
        )
        .unwrap();
        drop(conn);

        let outcome = load(&path);
        let chests = &outcome.islands[&island].island_chests;

        assert_eq!(chests.len(), 3);
        assert!(chests[0].iter().all(Option::is_none));
        assert!(chests[1].iter().all(Option::is_none));
        assert_eq!(chests[2], page);
    }

    #[test]
    fn test_interest_time_units() {
        let dir = TempDir::new().unwrap();
        let (path, conn) = create_db(&dir);
        let in_millis = Uuid::new_v4();
        let in_seconds = Uuid::new_v4();
        let now_secs = NOW_MILLIS / 1000;

        conn.execute(
            "INSERT INTO islands_banks VALUES (?1, '10', ?2)",
            params![in_millis.to_string(), NOW_MILLIS - 3_000],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO islands_banks VALUES (?1, '10', ?2)",
            params![in_seconds.to_string(), now_secs - 3],
        )
        .unwrap();
        drop(conn);

        let outcome = load(&path);
        assert_eq!(outcome.islands[&in_millis].last_interest_time, now_secs - 3);
        assert_eq!(outcome.islands[&in_seconds].last_interest_time, now_secs - 3);
    }

    #[test]
    fn test_missing_tables_load_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap();

        let store = SqliteRecordStore::open(&path).unwrap();
        let loader = new_loader();
        let summary = loader.load_all(&store).unwrap();

        assert_eq!(summary.islands, 0);
        assert_eq!(summary.total_accepted(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_sqlite_load_matches_sequential() {
        let dir = TempDir::new().unwrap();
        let (path, conn) = create_db(&dir);
        let island = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO islands VALUES (?1, 'COBBLESTONE=64')",
            params![island],
        )
        .unwrap();
        for (upgrade, level) in [("size", 1), ("crop-growth", 2), ("size", 4)] {
            conn.execute(
                "INSERT INTO islands_upgrades VALUES (?1, ?2, ?3)",
                params![island, upgrade, level],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO islands_settings (island, size) VALUES (?1, 50)",
            params![island],
        )
        .unwrap();
        drop(conn);

        let sequential = load(&path);

        let loader = Arc::new(new_loader());
        let db_path = path.clone();
        let summary = load_concurrently(Arc::clone(&loader), move || {
            SqliteRecordStore::open(&db_path)
        })
        .await
        .unwrap();

        assert_eq!(summary.islands, 1);
        assert_eq!(
            summary.stats_for(RecordKind::Upgrades).map(|s| s.accepted),
            Some(3)
        );
        assert!(summary.stats_for(RecordKind::BankTransactions).unwrap().skipped);

        let concurrent = Arc::try_unwrap(loader)
            .unwrap_or_else(|_| panic!("loader still shared"))
            .finish();
        assert_eq!(concurrent.islands, sequential.islands);
    }
}
