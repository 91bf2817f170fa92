//! Reminder scheduling rule.

use crate::engine::streak::is_week_successful;
use crate::model::habit::{Habit, RepeatPattern};
use crate::model::reminder::next_trigger;
use chrono::{NaiveDateTime, NaiveTime};

/// Whether a reminder should be armed for `habit` right now.
///
/// Daily habits with a reminder are always re-armed. Weekly habits stop
/// reminding once the current week is done.
pub fn should_schedule_reminder(habit: &Habit, now: NaiveDateTime) -> bool {
    if habit.reminder.is_none() {
        return false;
    }
    match habit.repeat {
        RepeatPattern::Daily => true,
        RepeatPattern::Weekly => !is_week_successful(habit, now.date()),
    }
}

/// Next fire time for `habit`, or `None` when no reminder should be armed.
///
/// `custom_time` overrides the slot's default time of day.
pub fn next_reminder(
    habit: &Habit,
    now: NaiveDateTime,
    custom_time: Option<NaiveTime>,
) -> Option<NaiveDateTime> {
    let slot = habit.reminder?;
    if !should_schedule_reminder(habit, now) {
        return None;
    }
    Some(next_trigger(now, custom_time.unwrap_or_else(|| slot.default_time())))
}
