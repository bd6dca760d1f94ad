#[cfg(test)]
mod tests {
    use brainclock::db::db::Db;
    use brainclock::db::metrics::Metrics;
    use brainclock::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use brainclock::db::periods::SqliteStore;
    use brainclock::db::recommendations::Recommendations;
    use brainclock::db::users::Users;
    use brainclock::libs::metrics::MetricSample;
    use brainclock::libs::notify::ChatDirectory;
    use brainclock::libs::period::{PeriodStore, ProductivityPeriod};
    use chrono::{Duration, NaiveDateTime, NaiveTime};
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            StoreTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl StoreTestContext {
        fn path(&self) -> PathBuf {
            self.temp_dir.path().join("brainclock.db")
        }

        fn db(&self) -> Db {
            Db::open(&self.path()).unwrap()
        }

        fn users(&self) -> Users {
            Users::with_db(self.db())
        }
    }

    fn t(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
    }

    fn samples(count: i64) -> Vec<MetricSample> {
        let start = NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        (0..count)
            .map(|i| {
                let mut sample = MetricSample::new(start + Duration::minutes(5 * i));
                sample.cognitive_score = Some(60 + i);
                sample.relaxation_index = Some(0.5);
                sample
            })
            .collect()
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_migrations_applied_once(ctx: &mut StoreTestContext) {
        let db = ctx.db();
        let manager = MigrationManager::new();
        assert_eq!(get_db_version(&db.conn).unwrap(), manager.latest_version());
        assert!(!needs_migration(&db.conn).unwrap());

        // Reopening runs nothing new.
        let db = ctx.db();
        let history = manager.get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len() as u32, manager.latest_version());
        for (i, (version, _, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
        assert!(manager.is_migration_applied(&db.conn, 2).unwrap());
    }

    #[test]
    fn test_migrations_rerun_is_noop() {
        let mut conn = Connection::open_in_memory().unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(manager.get_current_version(&conn).unwrap(), 3);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 3);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_users_get_or_create(ctx: &mut StoreTestContext) {
        let mut users = ctx.users();
        let ann = users.get_or_create(Some(1001), "Ann").unwrap();
        let again = users.get_or_create(Some(1001), "Ann").unwrap();
        assert_eq!(ann.id, again.id);
        assert!(!ann.notifications_enabled);
        assert_eq!(ann.iaf, None);

        let renamed = users.get_or_create(Some(1001), "Anna").unwrap();
        assert_eq!(renamed.id, ann.id);
        assert_eq!(renamed.name, "Anna");

        let local = users.get_or_create(None, "Bob").unwrap();
        assert_ne!(local.id, ann.id);
        assert_eq!(users.list().unwrap().len(), 2);
        assert_eq!(users.find_by_telegram_id(1001).unwrap().unwrap().id, ann.id);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_users_iaf_and_missing(ctx: &mut StoreTestContext) {
        let mut users = ctx.users();
        let user = users.get_or_create(None, "Ann").unwrap();
        users.set_iaf(user.id, 10.5).unwrap();
        assert_eq!(users.get(user.id).unwrap().iaf, Some(10.5));

        assert!(users.get(999).is_err());
        assert!(users.find(999).unwrap().is_none());
        assert!(users.set_iaf(999, 10.0).is_err());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_metrics_batches_and_limit(ctx: &mut StoreTestContext) {
        let user = ctx.users().get_or_create(None, "Ann").unwrap();
        let mut metrics = Metrics::with_db(ctx.db());

        let rows = samples(5);
        assert_eq!(metrics.save_bulk(user.id, &rows[..3]).unwrap(), 3);
        assert_eq!(metrics.save_bulk(user.id, &rows[3..]).unwrap(), 2);
        assert_eq!(metrics.count(user.id).unwrap(), 5);

        let batch: i64 = ctx
            .db()
            .conn
            .query_row("SELECT MAX(batch_id) FROM metrics WHERE user_id = ?1", [user.id], |row| row.get(0))
            .unwrap();
        assert_eq!(batch, 2);

        let latest = metrics.load(user.id, 2).unwrap();
        assert_eq!(latest, rows[3..].to_vec());

        let all = metrics.load(user.id, 120).unwrap();
        assert_eq!(all, rows);
        assert!(metrics.load(user.id + 1, 120).unwrap().is_empty());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_period_store_replaces_all(ctx: &mut StoreTestContext) {
        let user = ctx.users().get_or_create(Some(77), "Ann").unwrap();
        let store = SqliteStore::with_db(ctx.db());

        let mut first = ProductivityPeriod::new(t("10:00"), t("11:30"), "Deep work");
        first.productivity_score = 0.8;
        let periods = vec![first, ProductivityPeriod::new(t("14:30"), t("15:00"), "Light tasks")];
        store.save_periods(user.id, &periods).unwrap();
        assert_eq!(store.load_periods(user.id).unwrap(), periods);

        let replacement = vec![ProductivityPeriod::new(t("08:00"), t("09:00"), "Run")];
        store.save_periods(user.id, &replacement).unwrap();
        assert_eq!(store.load_periods(user.id).unwrap(), replacement);

        store.save_periods(user.id, &[]).unwrap();
        assert!(store.load_periods(user.id).unwrap().is_empty());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_period_store_flags_and_chat(ctx: &mut StoreTestContext) {
        let mut users = ctx.users();
        let linked = users.get_or_create(Some(77), "Ann").unwrap();
        let local = users.get_or_create(None, "Bob").unwrap();
        let store = SqliteStore::with_db(ctx.db());

        assert_eq!(store.load_users().unwrap(), vec![linked.id, local.id]);
        assert!(!store.notifications_enabled(linked.id).unwrap());
        store.set_notifications_enabled(linked.id, true).unwrap();
        assert!(store.notifications_enabled(linked.id).unwrap());
        assert!(users.get(linked.id).unwrap().notifications_enabled);
        assert!(!store.notifications_enabled(999).unwrap());

        assert_eq!(store.chat_id(linked.id).unwrap(), Some(77));
        assert_eq!(store.chat_id(local.id).unwrap(), None);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_recommendations(ctx: &mut StoreTestContext) {
        let user = ctx.users().get_or_create(None, "Ann").unwrap();
        let mut recommendations = Recommendations::with_db(ctx.db());

        assert!(recommendations.latest_day_plan(user.id).unwrap().is_none());
        recommendations.save_day_plan(user.id, "old plan").unwrap();
        recommendations.save_day_plan(user.id, "new plan").unwrap();
        let (date, plan) = recommendations.latest_day_plan(user.id).unwrap().unwrap();
        assert!(date.is_some());
        assert_eq!(plan, "new plan");

        let suggestions: Vec<String> = vec!["walk".into(), "sleep".into(), "breathe".into()];
        assert_eq!(recommendations.save_suggestions(user.id, &suggestions).unwrap(), 3);
        assert_eq!(recommendations.save_suggestions(user.id, &[]).unwrap(), 0);
        assert_eq!(recommendations.latest_suggestions(user.id, 2).unwrap(), vec!["sleep", "breathe"]);
    }
}
