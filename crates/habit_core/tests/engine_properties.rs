use chrono::{Duration, NaiveDate};
use habit_core::engine::window::DateRange;
use habit_core::{
    current_streak, diff, is_week_successful, reconcile, successful_dates, weekly_toggle,
    EngineConfig, Habit, HabitError, HabitType, RepeatPattern, TodayBoundary,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn day_offset(offset: i64) -> NaiveDate {
    origin() + Duration::days(offset)
}

fn log_strategy() -> impl Strategy<Value = BTreeSet<NaiveDate>> {
    prop::collection::btree_set((0i64..120).prop_map(day_offset), 0..40)
}

fn habit_with(habit_type: HabitType, repeat: RepeatPattern, log: BTreeSet<NaiveDate>) -> Habit {
    let mut habit = Habit::new("prop", habit_type, repeat, origin());
    habit.log = log;
    habit
}

fn weekly_build(created_at: NaiveDate, log: BTreeSet<NaiveDate>) -> Habit {
    let mut habit = Habit::new("prop", HabitType::Build, RepeatPattern::Weekly, created_at);
    habit.log = log;
    habit
}

fn boundary_strategy() -> impl Strategy<Value = TodayBoundary> {
    prop_oneof![
        Just(TodayBoundary::Exclusive),
        Just(TodayBoundary::Inclusive)
    ]
}

proptest! {
    #[test]
    fn reconcile_of_identical_logs_is_empty(
        log in log_strategy(),
        today in (0i64..120).prop_map(day_offset),
    ) {
        let delta = reconcile(&log, &log, today).unwrap();
        prop_assert!(delta.is_empty());
    }

    #[test]
    fn applying_diff_yields_proposal(current in log_strategy(), proposed in log_strategy()) {
        let delta = diff(&current, &proposed);
        prop_assert_eq!(delta.apply_to(&current), proposed);
    }

    #[test]
    fn accepted_reconcile_only_moves_today(
        current in log_strategy(),
        proposed in log_strategy(),
        today in (0i64..120).prop_map(day_offset),
    ) {
        match reconcile(&current, &proposed, today) {
            Ok(delta) => {
                prop_assert!(delta.to_insert.iter().all(|d| *d == today));
                prop_assert!(delta.to_delete.iter().all(|d| *d == today));
                prop_assert_eq!(delta.apply_to(&current), proposed);
            }
            Err(err) => prop_assert!(matches!(err, HabitError::InvalidArgument(_))),
        }
    }

    #[test]
    fn build_successes_are_logged_and_break_successes_are_not(
        log in log_strategy(),
        today in (0i64..120).prop_map(day_offset),
        boundary in boundary_strategy(),
    ) {
        let config = EngineConfig::default().with_break_today(boundary);

        let build = habit_with(HabitType::Build, RepeatPattern::Daily, log.clone());
        let successes = successful_dates(&build, today, &config);
        prop_assert!(successes.is_subset(&build.log));

        let brk = habit_with(HabitType::Break, RepeatPattern::Daily, log);
        let successes = successful_dates(&brk, today, &config);
        prop_assert!(successes.is_disjoint(&brk.log));
    }

    #[test]
    fn daily_build_streak_counts_the_logged_run(
        today_offset in 10i64..120,
        run in 1i64..10,
        extra in log_strategy(),
    ) {
        let today = day_offset(today_offset);
        let gap = today - Duration::days(run);
        let mut log: BTreeSet<NaiveDate> = extra.into_iter().filter(|d| *d < gap).collect();
        log.extend((0..run).map(|k| today - Duration::days(k)));

        let habit = habit_with(HabitType::Build, RepeatPattern::Daily, log);
        prop_assert_eq!(current_streak(&habit, today), run as u32);
    }

    #[test]
    fn daily_break_streak_spans_clean_history(today_offset in 0i64..400) {
        let today = day_offset(today_offset);
        let habit = habit_with(HabitType::Break, RepeatPattern::Daily, BTreeSet::new());
        prop_assert_eq!(current_streak(&habit, today), (today_offset + 1) as u32);
    }

    #[test]
    fn weekly_toggle_flips_week_and_only_touches_current_week(
        created_offset in 0i64..60,
        log in log_strategy(),
        days_since_creation in 0i64..60,
    ) {
        let today = day_offset(created_offset + days_since_creation);
        let habit = weekly_build(day_offset(created_offset), log);
        let was_done = is_week_successful(&habit, today);

        let mut toggled = habit.clone();
        toggled.log = weekly_toggle(&habit, today).apply_to(&habit.log);

        let week = DateRange::week_of(today);
        let outside = |set: &BTreeSet<NaiveDate>| -> BTreeSet<NaiveDate> {
            set.iter().copied().filter(|d| !week.contains(*d)).collect()
        };

        prop_assert_ne!(is_week_successful(&toggled, today), was_done);
        prop_assert_eq!(outside(&toggled.log), outside(&habit.log));
        prop_assert!(toggled.log.range(week.start..=week.end).count() <= 1);
    }
}

#[test]
fn daily_build_streak_through_today() {
    let log = BTreeSet::from([date(1, 1), date(1, 2), date(1, 3)]);
    let habit = habit_with(HabitType::Build, RepeatPattern::Daily, log);

    assert_eq!(current_streak(&habit, date(1, 3)), 3);
}

#[test]
fn daily_build_streak_broken_by_gap() {
    let log = BTreeSet::from([date(1, 1), date(1, 2), date(1, 3)]);
    let habit = habit_with(HabitType::Build, RepeatPattern::Daily, log);

    assert_eq!(current_streak(&habit, date(1, 5)), 0);
}

#[test]
fn weekly_build_streak_includes_current_week() {
    let log = BTreeSet::from([date(1, 3), date(1, 9), date(1, 20), date(1, 23)]);
    let habit = habit_with(HabitType::Build, RepeatPattern::Weekly, log);

    assert_eq!(current_streak(&habit, date(1, 24)), 4);
}

#[test]
fn reconcile_rejects_past_insert() {
    let current = BTreeSet::from([date(1, 3)]);
    let proposed = BTreeSet::from([date(1, 2), date(1, 3)]);

    let err = reconcile(&current, &proposed, date(1, 3)).unwrap_err();
    assert!(matches!(err, HabitError::InvalidArgument(_)));
}

#[test]
fn weekly_toggle_deletes_all_stray_entries() {
    let log = BTreeSet::from([date(1, 8), date(1, 10)]);
    let habit = weekly_build(origin(), log.clone());

    let delta = weekly_toggle(&habit, date(1, 11));
    assert!(delta.to_insert.is_empty());
    assert_eq!(delta.to_delete, log);
}
