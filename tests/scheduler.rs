#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use brainclock::libs::clock::{JobCallback, TriggerClock};
    use brainclock::libs::notify::NotificationSender;
    use brainclock::libs::period::{PeriodStore, ProductivityPeriod, UserId};
    use brainclock::libs::scheduler::{reminder_text, JobKey, Scheduler, SchedulerError, SyncAction};
    use chrono::NaiveTime;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use test_context::{test_context, TestContext};

    #[derive(Default)]
    struct FakeClock {
        jobs: Mutex<HashMap<JobKey, JobCallback>>,
        cancelled: Mutex<Vec<JobKey>>,
        fail_cancel: Mutex<bool>,
        fail_hours: Mutex<HashSet<u32>>,
    }

    impl FakeClock {
        fn job_ids(&self) -> Vec<String> {
            let mut ids: Vec<String> = self.jobs.lock().keys().map(|k| k.to_string()).collect();
            ids.sort();
            ids
        }

        fn callback(&self, key: &JobKey) -> JobCallback {
            Arc::clone(self.jobs.lock().get(key).unwrap())
        }
    }

    impl TriggerClock for FakeClock {
        fn schedule_daily(&self, hour: u32, _minute: u32, callback: JobCallback, job_id: &JobKey, replace_existing: bool) -> Result<(), SchedulerError> {
            if self.fail_hours.lock().contains(&hour) {
                return Err(SchedulerError::Trigger("clock refused".into()));
            }
            let mut jobs = self.jobs.lock();
            if jobs.contains_key(job_id) && !replace_existing {
                return Err(SchedulerError::Trigger("duplicate".into()));
            }
            jobs.insert(job_id.clone(), callback);
            Ok(())
        }

        fn cancel(&self, job_id: &JobKey) -> Result<(), SchedulerError> {
            self.cancelled.lock().push(job_id.clone());
            if *self.fail_cancel.lock() {
                return Err(SchedulerError::Trigger("stale id".into()));
            }
            self.jobs.lock().remove(job_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        periods: Mutex<HashMap<UserId, Vec<ProductivityPeriod>>>,
        enabled: Mutex<HashMap<UserId, bool>>,
    }

    impl PeriodStore for FakeStore {
        fn load_periods(&self, user_id: UserId) -> anyhow::Result<Vec<ProductivityPeriod>> {
            Ok(self.periods.lock().get(&user_id).cloned().unwrap_or_default())
        }

        fn save_periods(&self, user_id: UserId, periods: &[ProductivityPeriod]) -> anyhow::Result<()> {
            self.periods.lock().insert(user_id, periods.to_vec());
            Ok(())
        }

        fn load_users(&self) -> anyhow::Result<Vec<UserId>> {
            let mut users: Vec<UserId> = self.periods.lock().keys().copied().collect();
            users.sort();
            Ok(users)
        }

        fn notifications_enabled(&self, user_id: UserId) -> anyhow::Result<bool> {
            Ok(self.enabled.lock().get(&user_id).copied().unwrap_or(false))
        }

        fn set_notifications_enabled(&self, user_id: UserId, enabled: bool) -> anyhow::Result<()> {
            self.enabled.lock().insert(user_id, enabled);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeSender {
        sent: Mutex<Vec<(UserId, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSender for FakeSender {
        async fn send(&self, user_id: UserId, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("chat blocked the bot");
            }
            self.sent.lock().push((user_id, text.to_string()));
            Ok(())
        }
    }

    struct SchedulerTestContext {
        clock: Arc<FakeClock>,
        store: Arc<FakeStore>,
        sender: Arc<FakeSender>,
        scheduler: Scheduler,
    }

    impl TestContext for SchedulerTestContext {
        fn setup() -> Self {
            let clock = Arc::new(FakeClock::default());
            let store = Arc::new(FakeStore::default());
            let sender = Arc::new(FakeSender::default());
            let scheduler = Scheduler::new(clock.clone(), store.clone(), sender.clone());
            SchedulerTestContext {
                clock,
                store,
                sender,
                scheduler,
            }
        }
    }

    fn t(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
    }

    fn periods() -> Vec<ProductivityPeriod> {
        vec![
            ProductivityPeriod::new(t("10:00"), t("11:00"), "Deep work"),
            ProductivityPeriod::new(t("14:30"), t("15:00"), "Light tasks"),
        ]
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_register_creates_deterministic_jobs(ctx: &mut SchedulerTestContext) {
        assert_eq!(ctx.scheduler.register(1, &periods()), 2);
        assert_eq!(ctx.clock.job_ids(), vec!["period_1_1000", "period_1_1430"]);
        assert_eq!(ctx.scheduler.active_jobs(1), vec![JobKey::new(1, t("10:00")), JobKey::new(1, t("14:30"))]);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_register_is_idempotent(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.register(1, &periods());
        ctx.scheduler.register(1, &periods());
        assert_eq!(ctx.scheduler.active_jobs(1).len(), 2);
        assert_eq!(ctx.clock.jobs.lock().len(), 2);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_register_replaces_previous_set(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.register(1, &periods());
        let replacement = vec![ProductivityPeriod::new(t("09:15"), t("10:00"), "Planning")];
        assert_eq!(ctx.scheduler.register(1, &replacement), 1);
        assert_eq!(ctx.clock.job_ids(), vec!["period_1_0915"]);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_users_do_not_share_jobs(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.register(1, &periods());
        ctx.scheduler.register(2, &periods());
        ctx.scheduler.unregister(1);
        assert!(ctx.scheduler.active_jobs(1).is_empty());
        assert_eq!(ctx.scheduler.active_jobs(2).len(), 2);
        assert_eq!(ctx.clock.job_ids(), vec!["period_2_1000", "period_2_1430"]);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_unregister_without_jobs(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.unregister(42);
        assert!(ctx.clock.cancelled.lock().is_empty());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_teardown_errors_are_swallowed(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.register(1, &periods());
        *ctx.clock.fail_cancel.lock() = true;

        let replacement = vec![ProductivityPeriod::new(t("16:00"), t("17:00"), "Review")];
        assert_eq!(ctx.scheduler.register(1, &replacement), 1);
        assert_eq!(ctx.scheduler.active_jobs(1), vec![JobKey::new(1, t("16:00"))]);
        assert_eq!(ctx.clock.cancelled.lock().len(), 2);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_add_errors_skip_single_period(ctx: &mut SchedulerTestContext) {
        ctx.clock.fail_hours.lock().insert(10);
        assert_eq!(ctx.scheduler.register(1, &periods()), 1);
        assert_eq!(ctx.clock.job_ids(), vec!["period_1_1430"]);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_toggle_alternates(ctx: &mut SchedulerTestContext) {
        ctx.store.save_periods(1, &periods()).unwrap();

        assert!(ctx.scheduler.toggle(1).unwrap());
        assert_eq!(ctx.scheduler.active_jobs(1).len(), 2);
        assert!(ctx.store.notifications_enabled(1).unwrap());

        assert!(!ctx.scheduler.toggle(1).unwrap());
        assert!(ctx.scheduler.active_jobs(1).is_empty());
        assert!(!ctx.store.notifications_enabled(1).unwrap());

        assert!(ctx.scheduler.toggle(1).unwrap());
        assert_eq!(ctx.scheduler.active_jobs(1).len(), 2);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_toggle_without_periods_still_enables(ctx: &mut SchedulerTestContext) {
        assert!(ctx.scheduler.toggle(5).unwrap());
        assert!(ctx.scheduler.is_enabled(5));
        assert!(ctx.scheduler.active_jobs(5).is_empty());
        assert!(!ctx.scheduler.toggle(5).unwrap());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_concurrent_register_keeps_one_set(ctx: &mut SchedulerTestContext) {
        let sets: Vec<Vec<ProductivityPeriod>> = vec![
            vec![
                ProductivityPeriod::new(t("08:00"), t("09:00"), "a"),
                ProductivityPeriod::new(t("09:30"), t("10:00"), "a"),
            ],
            vec![ProductivityPeriod::new(t("11:00"), t("12:00"), "b")],
            vec![
                ProductivityPeriod::new(t("13:00"), t("13:30"), "c"),
                ProductivityPeriod::new(t("15:00"), t("16:00"), "c"),
                ProductivityPeriod::new(t("17:00"), t("18:00"), "c"),
            ],
            Vec::new(),
        ];

        let scheduler = &ctx.scheduler;
        std::thread::scope(|scope| {
            for _ in 0..4 {
                for set in &sets {
                    scope.spawn(move || {
                        for _ in 0..20 {
                            scheduler.register(7, set);
                        }
                    });
                }
            }
        });

        let active = ctx.scheduler.active_jobs(7);
        let images: Vec<Vec<JobKey>> = sets
            .iter()
            .map(|set| {
                let mut keys: Vec<JobKey> = set.iter().map(|p| JobKey::new(7, p.start_time)).collect();
                keys.sort();
                keys
            })
            .collect();
        assert!(images.contains(&active), "active jobs mix several sets: {:?}", active);

        let mut clock_jobs: Vec<JobKey> = ctx.clock.jobs.lock().keys().cloned().collect();
        clock_jobs.sort();
        assert_eq!(clock_jobs, active);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_concurrent_toggle_store_matches_registry(ctx: &mut SchedulerTestContext) {
        ctx.store.save_periods(2, &periods()).unwrap();

        let scheduler = &ctx.scheduler;
        std::thread::scope(|scope| {
            for _ in 0..7 {
                scope.spawn(move || {
                    for _ in 0..25 {
                        scheduler.toggle(2).unwrap();
                    }
                });
            }
        });

        // 175 flips from disabled.
        assert!(ctx.scheduler.is_enabled(2));
        assert!(ctx.store.notifications_enabled(2).unwrap());
        assert_eq!(ctx.clock.job_ids(), vec!["period_2_1000", "period_2_1430"]);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_find_period_is_pure_read(ctx: &mut SchedulerTestContext) {
        ctx.store.save_periods(1, &periods()).unwrap();
        let found = ctx.scheduler.find_period_for_time(1, t("12:00")).unwrap().unwrap();
        assert_eq!(found.recommended_activity, "Light tasks");
        assert!(ctx.scheduler.find_period_for_time(1, t("16:00")).unwrap().is_none());
        assert!(!ctx.scheduler.is_enabled(1));
        assert!(ctx.clock.jobs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_sends_reminder() {
        let ctx = SchedulerTestContext::setup();
        ctx.scheduler.register(3, &periods());
        let callback = ctx.clock.callback(&JobKey::new(3, t("10:00")));
        callback().await;
        callback().await;

        let sent = ctx.sender.sent.lock().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], (3, "⏰ 10:00–11:00: Deep work".to_string()));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_not_fatal() {
        let clock = Arc::new(FakeClock::default());
        let sender = Arc::new(FakeSender {
            fail: true,
            ..Default::default()
        });
        let scheduler = Scheduler::new(clock.clone(), Arc::new(FakeStore::default()), sender.clone());
        scheduler.register(1, &periods());

        clock.callback(&JobKey::new(1, t("14:30")))().await;
        assert!(sender.sent.lock().is_empty());
        assert_eq!(scheduler.active_jobs(1).len(), 2);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_bootstrap_registers_enabled_users(ctx: &mut SchedulerTestContext) {
        ctx.store.save_periods(1, &periods()).unwrap();
        ctx.store.save_periods(2, &periods()).unwrap();
        ctx.store.set_notifications_enabled(2, true).unwrap();

        assert_eq!(ctx.scheduler.bootstrap().unwrap(), 1);
        assert!(!ctx.scheduler.is_enabled(1));
        assert_eq!(ctx.scheduler.active_jobs(2).len(), 2);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_resync_follows_store(ctx: &mut SchedulerTestContext) {
        ctx.store.save_periods(1, &periods()).unwrap();
        assert_eq!(ctx.scheduler.resync_user(1).unwrap(), SyncAction::Unchanged);

        ctx.store.set_notifications_enabled(1, true).unwrap();
        assert_eq!(ctx.scheduler.resync_user(1).unwrap(), SyncAction::Enabled);
        assert_eq!(ctx.scheduler.resync_user(1).unwrap(), SyncAction::Unchanged);

        let changed = vec![ProductivityPeriod::new(t("08:00"), t("09:00"), "Run")];
        ctx.store.save_periods(1, &changed).unwrap();
        assert_eq!(ctx.scheduler.resync_user(1).unwrap(), SyncAction::Rescheduled);
        assert_eq!(ctx.clock.job_ids(), vec!["period_1_0800"]);

        ctx.store.set_notifications_enabled(1, false).unwrap();
        assert_eq!(ctx.scheduler.resync_all().unwrap(), vec![(1, SyncAction::Disabled)]);
        assert!(ctx.clock.jobs.lock().is_empty());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_resync_all_drops_removed_users(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.register(9, &periods());
        assert!(ctx.scheduler.resync_all().unwrap().is_empty());
        assert!(!ctx.scheduler.is_enabled(9));
        assert!(ctx.clock.jobs.lock().is_empty());
    }

    #[test]
    fn test_reminder_text() {
        let period = ProductivityPeriod::new(t("09:00"), t("09:45"), "Emails");
        assert_eq!(reminder_text(&period), "⏰ 09:00–09:45: Emails");
        assert_eq!(JobKey::new(12, t("07:05")).to_string(), "period_12_0705");
    }
}
