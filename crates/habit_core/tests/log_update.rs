use chrono::{NaiveDate, NaiveTime};
use habit_core::db::open_db_in_memory;
use habit_core::{
    EngineConfig, FixedClock, Habit, HabitError, HabitRepository, HabitService, HabitType,
    ReminderSlot, RepeatPattern, ServiceError, SqliteHabitRepository, TodayBoundary,
};
use rusqlite::Connection;
use std::collections::BTreeSet;
use uuid::Uuid;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn service_on(
    conn: &Connection,
    today: NaiveDate,
) -> HabitService<SqliteHabitRepository<'_>, FixedClock> {
    let repo = SqliteHabitRepository::try_new(conn).unwrap();
    HabitService::new(repo, FixedClock::on(today))
}

fn seed(
    conn: &Connection,
    habit_type: HabitType,
    repeat: RepeatPattern,
    log: &[NaiveDate],
) -> Uuid {
    let repo = SqliteHabitRepository::try_new(conn).unwrap();
    let mut habit = Habit::new("floss", habit_type, repeat, date(1, 1));
    habit.log.extend(log.iter().copied());
    repo.create_habit(&habit).unwrap()
}

fn stored_log(conn: &Connection, id: Uuid) -> BTreeSet<NaiveDate> {
    let repo = SqliteHabitRepository::try_new(conn).unwrap();
    repo.get_habit(id).unwrap().unwrap().log
}

#[test]
fn update_log_inserts_todays_entry() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Daily, &[date(1, 2)]);
    let service = service_on(&conn, date(1, 3));

    let proposed = BTreeSet::from([date(1, 2), date(1, 3)]);
    let delta = service.update_log(id, &proposed).unwrap();

    assert_eq!(delta.to_insert, BTreeSet::from([date(1, 3)]));
    assert!(delta.to_delete.is_empty());
    assert_eq!(stored_log(&conn, id), proposed);
    assert_eq!(service.overview(id).unwrap().current_streak, 2);
}

#[test]
fn update_log_touching_past_dates_is_rejected_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Daily, &[date(1, 3)]);
    let service = service_on(&conn, date(1, 3));

    let proposed = BTreeSet::from([date(1, 2), date(1, 3)]);
    let result = service.update_log(id, &proposed);

    assert!(matches!(
        result,
        Err(ServiceError::Habit(HabitError::InvalidArgument(_)))
    ));
    assert_eq!(stored_log(&conn, id), BTreeSet::from([date(1, 3)]));
}

#[test]
fn update_log_with_unchanged_log_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Break, RepeatPattern::Daily, &[date(1, 2)]);
    let service = service_on(&conn, date(1, 3));

    let delta = service
        .update_log(id, &BTreeSet::from([date(1, 2)]))
        .unwrap();
    assert!(delta.is_empty());
}

#[test]
fn update_log_on_weekly_habit_is_invalid_state() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Weekly, &[]);
    let service = service_on(&conn, date(1, 10));

    let result = service.update_log(id, &BTreeSet::from([date(1, 10)]));
    assert!(matches!(
        result,
        Err(ServiceError::Habit(HabitError::InvalidState(_)))
    ));
    assert!(stored_log(&conn, id).is_empty());
}

#[test]
fn toggle_week_clears_stray_entries_from_daily_phase() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(
        &conn,
        HabitType::Build,
        RepeatPattern::Weekly,
        &[date(1, 3), date(1, 8), date(1, 9)],
    );
    let service = service_on(&conn, date(1, 10));

    let delta = service.toggle_week(id).unwrap();

    assert!(delta.to_insert.is_empty());
    assert_eq!(delta.to_delete, BTreeSet::from([date(1, 8), date(1, 9)]));
    assert_eq!(stored_log(&conn, id), BTreeSet::from([date(1, 3)]));
    assert_eq!(service.overview(id).unwrap().week_successful, Some(false));
}

#[test]
fn toggle_week_marks_an_empty_week_done() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(
        &conn,
        HabitType::Build,
        RepeatPattern::Weekly,
        &[date(1, 3)],
    );
    let service = service_on(&conn, date(1, 10));

    let delta = service.toggle_week(id).unwrap();

    assert_eq!(delta.to_insert, BTreeSet::from([date(1, 10)]));
    let overview = service.overview(id).unwrap();
    assert_eq!(overview.week_successful, Some(true));
    assert_eq!(overview.current_streak, 2);
}

#[test]
fn toggle_week_marks_week_holding_only_entries_before_creation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    let mut habit = Habit::new("swim", HabitType::Build, RepeatPattern::Weekly, date(1, 3));
    habit.log.insert(date(1, 1));
    let id = repo.create_habit(&habit).unwrap();
    let service = service_on(&conn, date(1, 4));
    assert_eq!(service.overview(id).unwrap().week_successful, Some(false));

    let delta = service.toggle_week(id).unwrap();

    assert_eq!(delta.to_insert, BTreeSet::from([date(1, 4)]));
    assert_eq!(delta.to_delete, BTreeSet::from([date(1, 1)]));
    assert_eq!(stored_log(&conn, id), BTreeSet::from([date(1, 4)]));
    assert_eq!(service.overview(id).unwrap().week_successful, Some(true));
}

#[test]
fn toggle_week_on_daily_habit_is_invalid_state() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Daily, &[]);
    let service = service_on(&conn, date(1, 10));

    assert!(matches!(
        service.toggle_week(id),
        Err(ServiceError::Habit(HabitError::InvalidState(_)))
    ));
}

#[test]
fn toggle_today_flips_daily_entry_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Daily, &[]);
    let service = service_on(&conn, date(1, 5));

    service.toggle_today(id).unwrap();
    assert_eq!(stored_log(&conn, id), BTreeSet::from([date(1, 5)]));
    assert!(service.overview(id).unwrap().today_successful);

    service.toggle_today(id).unwrap();
    assert!(stored_log(&conn, id).is_empty());
}

#[test]
fn missing_habit_is_not_found_for_every_use_case() {
    let conn = open_db_in_memory().unwrap();
    let service = service_on(&conn, date(1, 5));
    let id = Uuid::new_v4();

    let is_not_found = |err: ServiceError| {
        matches!(err, ServiceError::Habit(HabitError::NotFound(found)) if found == id)
    };

    assert!(is_not_found(service.get_habit(id).unwrap_err()));
    assert!(is_not_found(service.overview(id).unwrap_err()));
    assert!(is_not_found(service.month_view(id).unwrap_err()));
    assert!(is_not_found(service.toggle_today(id).unwrap_err()));
    assert!(is_not_found(service.delete_habit(id).unwrap_err()));
    assert!(is_not_found(service.update_log(id, &BTreeSet::new()).unwrap_err()));
}

#[test]
fn month_view_follows_configured_break_boundary() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Break, RepeatPattern::Daily, &[date(1, 2)]);

    let exclusive = service_on(&conn, date(1, 4));
    assert_eq!(exclusive.config().break_today, TodayBoundary::Exclusive);
    let dates = exclusive.successful_dates(id).unwrap();
    assert_eq!(dates, BTreeSet::from([date(1, 1), date(1, 3)]));

    let inclusive = service_on(&conn, date(1, 4))
        .with_config(EngineConfig::default().with_break_today(TodayBoundary::Inclusive));
    assert_eq!(inclusive.config().break_today, TodayBoundary::Inclusive);
    let dates = inclusive.successful_dates(id).unwrap();
    assert_eq!(dates, BTreeSet::from([date(1, 1), date(1, 3), date(1, 4)]));

    let grid = inclusive.month_view(id).unwrap();
    assert_eq!(grid.len(), 42);
    let today = grid.iter().find(|day| day.is_today).unwrap();
    assert_eq!(today.date, date(1, 4));
    assert!(today.is_success);
}

#[test]
fn weekly_month_view_marks_pending_days() {
    let conn = open_db_in_memory().unwrap();
    let id = seed(&conn, HabitType::Build, RepeatPattern::Weekly, &[]);
    let service = service_on(&conn, date(1, 10));

    let pending = service.pending_dates_of_week(id).unwrap();
    let expected: BTreeSet<_> = (11..=14).map(|d| date(1, d)).collect();
    assert_eq!(pending, expected);
}

#[test]
fn next_reminder_uses_slot_and_week_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHabitRepository::try_new(&conn).unwrap();
    let mut habit = Habit::new(
        "journal",
        HabitType::Build,
        RepeatPattern::Weekly,
        date(1, 1),
    );
    habit.reminder = Some(ReminderSlot::Morning);
    let id = repo.create_habit(&habit).unwrap();

    let now = date(1, 10).and_hms_opt(9, 0, 0).unwrap();
    let service = HabitService::new(repo, FixedClock::new(now));

    assert_eq!(
        service.next_reminder(id, None).unwrap(),
        Some(date(1, 11).and_hms_opt(8, 0, 0).unwrap())
    );
    let custom = NaiveTime::from_hms_opt(21, 30, 0).unwrap();
    assert_eq!(
        service.next_reminder(id, Some(custom)).unwrap(),
        Some(date(1, 10).and_time(custom))
    );

    service.toggle_week(id).unwrap();
    assert_eq!(service.next_reminder(id, None).unwrap(), None);
}
