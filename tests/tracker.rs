mod common;

#[cfg(test)]
mod tests {
    use crate::common::{at, tracker, FailingStore, MemoryStore, RecordingPrompt};
    use chrono::Duration;
    use std::sync::Arc;
    use std::thread;
    use test_context::{test_context, TestContext};
    use timerec::libs::clock::ManualClock;
    use timerec::libs::prompt::{NoPrompt, PromptOutcome};
    use timerec::libs::session::SessionEvent;
    use timerec::libs::storage::WorkDayStore;
    use timerec::libs::tracker::{Tracker, TrackerStatus};

    const SECOND: std::time::Duration = std::time::Duration::from_secs(1);

    struct TrackerTestContext {
        clock: Arc<ManualClock>,
        store: Arc<MemoryStore>,
        prompt: Arc<RecordingPrompt>,
        tracker: Tracker,
    }

    impl TestContext for TrackerTestContext {
        fn setup() -> Self {
            let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
            let store = MemoryStore::new();
            let prompt = RecordingPrompt::new();
            let tracker = tracker(store.clone(), prompt.clone(), clock.clone());
            TrackerTestContext {
                clock,
                store,
                prompt,
                tracker,
            }
        }
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_elapsed_is_zero_before_start(ctx: &mut TrackerTestContext) {
        ctx.clock.advance(Duration::hours(2));
        assert_eq!(ctx.tracker.elapsed(), Duration::zero());
        assert_eq!(ctx.tracker.status(), TrackerStatus::NotStarted);
        assert!(ctx.tracker.start_time().is_none());
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_short_lock_is_classified_without_prompt(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        for _ in 0..60 {
            ctx.tracker.tick(SECOND);
        }
        assert_eq!(ctx.tracker.active_minutes(), 1.0);

        ctx.clock.set(at(9, 1, 0));
        ctx.tracker.handle(SessionEvent::Lock);
        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].reason.as_deref(), Some("Lock"));
        assert!(breaks[0].end.is_none());
        assert_eq!(ctx.tracker.stop_time(), Some(at(9, 1, 0)));
        assert!(ctx.tracker.is_locked());

        ctx.clock.set(at(9, 1, 1));
        ctx.tracker.handle(SessionEvent::Unlock);
        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks[0].reason.as_deref(), Some("Unlock"));
        assert_eq!(breaks[0].end, Some(at(9, 1, 1)));
        assert!(ctx.prompt.requests().is_empty());
        assert_eq!(ctx.tracker.stop_time(), None);

        ctx.clock.set(at(9, 2, 0));
        ctx.tracker.stop();

        let day = ctx.store.load(at(9, 0, 0).date()).unwrap().unwrap();
        assert_eq!(day.active_minutes, 1.0);
        assert_eq!(day.start_time, at(9, 0, 0));
        assert_eq!(day.stop_time, Some(at(9, 2, 0)));
        assert_eq!(day.breaks.len(), 1);
        assert_eq!(day.breaks[0].duration(), Some(Duration::seconds(1)));
        assert_eq!(day.breaks[0].reason.as_deref(), Some("Unlock"));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_long_suspend_asks_for_reason(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.clock.set(at(10, 0, 0));
        ctx.tracker.handle(SessionEvent::Suspend);
        assert_eq!(ctx.tracker.status(), TrackerStatus::OnBreak);

        ctx.clock.set(at(10, 20, 0));
        ctx.tracker.handle(SessionEvent::Resume);

        let requests = ctx.prompt.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].start, at(10, 0, 0));
        assert_eq!(requests[0].end, at(10, 20, 0));
        assert_eq!(requests[0].duration, Duration::minutes(20));
        assert_eq!(ctx.tracker.pending_prompts(), 1);
        assert_eq!(ctx.tracker.status(), TrackerStatus::Running);

        assert!(ctx.prompt.complete(0, PromptOutcome::confirmed("Meeting")));
        assert_eq!(ctx.tracker.breaks()[0].reason.as_deref(), Some("Meeting"));
        assert_eq!(ctx.tracker.pending_prompts(), 0);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_dismissed_prompt_uses_closing_label(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Suspend);
        ctx.clock.advance(Duration::minutes(30));
        ctx.tracker.handle(SessionEvent::Resume);

        ctx.prompt.complete(0, PromptOutcome::dismissed());
        assert_eq!(ctx.tracker.breaks()[0].reason.as_deref(), Some("Resume"));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_break_at_threshold_is_short(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(15));
        ctx.tracker.handle(SessionEvent::Unlock);

        assert!(ctx.prompt.requests().is_empty());
        assert_eq!(ctx.tracker.breaks()[0].reason.as_deref(), Some("Unlock"));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_late_reason_lands_on_its_own_break(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Suspend);
        ctx.clock.advance(Duration::minutes(40));
        ctx.tracker.handle(SessionEvent::Resume);

        ctx.clock.advance(Duration::minutes(5));
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(2));
        ctx.tracker.handle(SessionEvent::Unlock);

        ctx.prompt.complete(0, PromptOutcome::confirmed("Lunch"));

        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].reason.as_deref(), Some("Lunch"));
        assert_eq!(breaks[1].reason.as_deref(), Some("Unlock"));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_reason_for_previous_session_is_dropped(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Suspend);
        ctx.clock.advance(Duration::hours(1));
        ctx.tracker.handle(SessionEvent::Resume);

        ctx.tracker.start();
        ctx.prompt.complete(0, PromptOutcome::confirmed("Lunch"));

        assert!(ctx.tracker.breaks().is_empty());
        assert_eq!(ctx.tracker.pending_prompts(), 0);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_start_begins_a_fresh_session(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.tick(SECOND);
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(1));
        ctx.tracker.handle(SessionEvent::Unlock);

        ctx.clock.advance(Duration::minutes(1));
        ctx.tracker.start();

        assert!(ctx.tracker.breaks().is_empty());
        assert_eq!(ctx.tracker.active_minutes(), 0.0);
        assert_eq!(ctx.tracker.start_time(), Some(at(9, 2, 0)));
        assert_eq!(ctx.tracker.login_time(), at(9, 2, 0));
        assert_eq!(ctx.tracker.stop_time(), None);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_tick_only_counts_while_running(ctx: &mut TrackerTestContext) {
        ctx.tracker.tick(SECOND);
        assert_eq!(ctx.tracker.active_minutes(), 0.0);

        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.tracker.tick(SECOND);
        assert_eq!(ctx.tracker.active_minutes(), 0.0);

        ctx.tracker.handle(SessionEvent::Unlock);
        ctx.tracker.tick(SECOND);
        assert_eq!(ctx.tracker.active_minutes(), 1.0 / 60.0);

        ctx.tracker.stop();
        ctx.tracker.tick(SECOND);
        assert_eq!(ctx.tracker.active_minutes(), 1.0 / 60.0);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_duplicate_events_are_ignored(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Unlock);
        ctx.tracker.handle(SessionEvent::Resume);
        assert!(ctx.tracker.breaks().is_empty());

        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::seconds(10));
        ctx.tracker.handle(SessionEvent::Lock);
        assert_eq!(ctx.tracker.breaks().len(), 1);

        ctx.tracker.handle(SessionEvent::Unlock);
        ctx.tracker.handle(SessionEvent::Unlock);
        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks.len(), 1);
        assert!(breaks.iter().all(|b| b.end.is_some()));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_suspend_while_locked_keeps_one_break(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(1));
        ctx.tracker.handle(SessionEvent::Suspend);
        ctx.clock.advance(Duration::minutes(5));
        ctx.tracker.handle(SessionEvent::Resume);

        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].reason.as_deref(), Some("Resume"));
        assert!(ctx.tracker.is_locked());

        ctx.tracker.tick(SECOND);
        assert_eq!(ctx.tracker.active_minutes(), 0.0);

        ctx.tracker.handle(SessionEvent::Unlock);
        assert_eq!(ctx.tracker.breaks().len(), 1);
        assert!(!ctx.tracker.is_locked());
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_status_follows_events(ctx: &mut TrackerTestContext) {
        assert_eq!(ctx.tracker.status(), TrackerStatus::NotStarted);
        ctx.tracker.start();
        assert_eq!(ctx.tracker.status(), TrackerStatus::Running);
        assert!(ctx.tracker.status_line().starts_with("Running"));
        ctx.tracker.handle(SessionEvent::Lock);
        assert_eq!(ctx.tracker.status(), TrackerStatus::OnBreak);
        ctx.tracker.handle(SessionEvent::Unlock);
        ctx.tracker.handle(SessionEvent::Logoff);
        assert_eq!(ctx.tracker.status(), TrackerStatus::Stopped);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_logon_only_sets_missing_start(ctx: &mut TrackerTestContext) {
        ctx.tracker.handle(SessionEvent::Logon);
        assert_eq!(ctx.tracker.start_time(), Some(at(9, 0, 0)));

        ctx.clock.advance(Duration::minutes(30));
        ctx.tracker.handle(SessionEvent::Logon);
        assert_eq!(ctx.tracker.start_time(), Some(at(9, 0, 0)));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_elapsed_stops_at_stop_time(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.clock.advance(Duration::minutes(10));
        assert_eq!(ctx.tracker.elapsed(), Duration::minutes(10));

        ctx.tracker.handle(SessionEvent::Logoff);
        ctx.clock.advance(Duration::minutes(10));
        assert_eq!(ctx.tracker.elapsed(), Duration::minutes(10));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_checkpoint_before_start_saves_nothing(ctx: &mut TrackerTestContext) {
        assert!(ctx.tracker.checkpoint().unwrap().is_none());
        ctx.tracker.stop();
        assert_eq!(ctx.store.save_count(), 0);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_saved_snapshot_is_not_affected_by_later_breaks(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(1));
        ctx.tracker.handle(SessionEvent::Unlock);
        let saved = ctx.tracker.checkpoint().unwrap().unwrap();

        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(1));
        ctx.tracker.handle(SessionEvent::Unlock);

        assert_eq!(saved.breaks.len(), 1);
        assert_eq!(ctx.store.load(saved.date).unwrap().unwrap().breaks.len(), 1);
        assert_eq!(ctx.tracker.breaks().len(), 2);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_stop_before_start_is_clamped_in_snapshot(ctx: &mut TrackerTestContext) {
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.advance(Duration::minutes(5));
        ctx.tracker.handle(SessionEvent::Logon);

        let day = ctx.tracker.checkpoint().unwrap().unwrap();
        assert_eq!(day.start_time, at(9, 5, 0));
        assert_eq!(day.stop_time, Some(at(9, 5, 0)));
        assert!(day.validate().is_ok());
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_session_ending_saves_the_day(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.clock.advance(Duration::hours(8));
        ctx.tracker.handle(SessionEvent::SessionEnding);

        let day = ctx.store.load(at(9, 0, 0).date()).unwrap().unwrap();
        assert_eq!(day.stop_time, Some(at(17, 0, 0)));
        assert_eq!(ctx.store.save_count(), 1);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_manual_break_is_recorded_and_saved(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.tracker.handle(SessionEvent::ManualBreak {
            start: at(8, 0, 0),
            end: at(8, 30, 0),
            kind: "Commute".to_string(),
        });

        let breaks = ctx.tracker.breaks();
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].reason.as_deref(), Some("Commute"));
        assert!(breaks[1].is_open());
        assert!(ctx.prompt.requests().is_empty());

        let day = ctx.store.load(at(9, 0, 0).date()).unwrap().unwrap();
        assert_eq!(day.breaks.len(), 2);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_earlier_manual_break_is_stored_in_order(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        ctx.clock.set(at(10, 0, 0));
        ctx.tracker.handle(SessionEvent::Lock);
        ctx.clock.set(at(10, 5, 0));
        ctx.tracker.handle(SessionEvent::Unlock);
        ctx.tracker.handle(SessionEvent::ManualBreak {
            start: at(9, 10, 0),
            end: at(9, 20, 0),
            kind: "Coffee".to_string(),
        });

        let starts: Vec<_> = ctx.tracker.breaks().iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![at(9, 10, 0), at(10, 0, 0)]);

        let day = ctx.store.load(at(9, 0, 0).date()).unwrap().unwrap();
        assert_eq!(day.breaks[0].reason.as_deref(), Some("Coffee"));
        assert_eq!(day.breaks[1].reason.as_deref(), Some("Unlock"));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_manual_break_ending_before_start_is_refused(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();
        let saves = ctx.store.save_count();

        assert!(ctx.tracker.add_break_entry(at(23, 30, 0), at(0, 15, 0), "Late").is_none());

        assert!(ctx.tracker.breaks().is_empty());
        assert_eq!(ctx.store.save_count(), saves);
        assert!(ctx.tracker.add_break_entry(at(12, 0, 0), at(12, 30, 0), "Lunch").is_some());
        assert_eq!(ctx.tracker.breaks().len(), 1);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_concurrent_ticks_are_all_counted(ctx: &mut TrackerTestContext) {
        ctx.tracker.start();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = ctx.tracker.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        tracker.tick(std::time::Duration::from_millis(1));
                        let _ = tracker.active_minutes();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ctx.tracker.active_minutes(), 8.0 / 60.0);
    }

    #[test]
    fn test_unavailable_prompt_falls_back_to_closing_label() {
        let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
        let prompt = RecordingPrompt::unavailable();
        let tracker = tracker(MemoryStore::new(), prompt.clone(), clock.clone());

        tracker.start();
        tracker.handle(SessionEvent::Suspend);
        clock.advance(Duration::hours(1));
        tracker.handle(SessionEvent::Resume);

        assert_eq!(tracker.breaks()[0].reason.as_deref(), Some("Resume"));
        assert_eq!(tracker.pending_prompts(), 0);
        assert!(prompt.requests().is_empty());
    }

    #[test]
    fn test_storage_failures_do_not_stop_tracking() {
        let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
        let tracker = tracker(Arc::new(FailingStore), Arc::new(NoPrompt), clock.clone());

        tracker.start();
        clock.advance(Duration::minutes(1));
        tracker.stop();
        tracker.handle(SessionEvent::SessionEnding);

        assert_eq!(tracker.stop_time(), Some(at(9, 1, 0)));
        assert!(tracker.checkpoint().is_err());
        assert!(tracker.load_all().is_empty());
        assert!(tracker.load(at(9, 0, 0).date()).is_none());
    }

    #[test]
    fn test_load_all_returns_newest_first() {
        let clock = Arc::new(ManualClock::new(at(9, 0, 0)));
        let tracker = tracker(MemoryStore::new(), Arc::new(NoPrompt), clock.clone());

        for day in 0..3 {
            clock.set(at(9, 0, 0) + Duration::days(day));
            tracker.start();
            tracker.stop();
        }

        let dates: Vec<_> = tracker.load_all().iter().map(|d| d.date).collect();
        let first = at(9, 0, 0).date();
        assert_eq!(dates, vec![first + Duration::days(2), first + Duration::days(1), first]);
    }
}
