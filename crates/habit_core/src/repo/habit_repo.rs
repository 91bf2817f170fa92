//! Habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist habit metadata in `habits` and log dates in
//!   `habit_log_entries`, keyed by habit id.
//! - Load the aggregate (metadata plus full log) in one call.
//!
//! # Invariants
//! - Write paths call `Habit::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `apply_log_delta` is all-or-nothing.

use crate::db::DbError;
use crate::engine::reconcile::LogDelta;
use crate::model::habit::{Habit, HabitId, HabitType, HabitValidationError, RepeatPattern};
use crate::model::reminder::ReminderSlot;
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    type,
    target,
    unit,
    repeat,
    reminder,
    created_at,
    motivational_note
FROM habits";

const REQUIRED_TABLES: [&str; 2] = ["habits", "habit_log_entries"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for habit persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] HabitValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("habit not found: {0}")]
    NotFound(HabitId),
    #[error("invalid persisted habit data: {0}")]
    InvalidData(String),
    #[error("required table `{0}` is missing; run migrations first")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage boundary for habits and their logs.
pub trait HabitRepository {
    /// Persists a new habit with its initial log and returns its id.
    ///
    /// A nil `habit.id` is replaced by a freshly generated one.
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    /// Replaces habit metadata. The log is left untouched.
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    /// Loads metadata plus full log, `None` when absent.
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Loads every habit ordered by creation date.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
    /// Deletes a habit and its log.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
    /// Adds one log date. Inserting an existing date is a no-op.
    fn insert_log_entry(&self, id: HabitId, date: NaiveDate) -> RepoResult<()>;
    /// Removes one log date. Deleting a missing date is a no-op.
    fn delete_log_entry(&self, id: HabitId, date: NaiveDate) -> RepoResult<()>;
    /// Applies a reconciled delta in a single transaction.
    fn apply_log_delta(&self, id: HabitId, delta: &LogDelta) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the habit tables have not been created yet.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        habit.validate()?;
        let id = if habit.id.is_nil() {
            Uuid::new_v4()
        } else {
            habit.id
        };
        let id_text = id.to_string();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (
                uuid,
                name,
                type,
                target,
                unit,
                repeat,
                reminder,
                created_at,
                motivational_note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id_text.as_str(),
                habit.name.as_str(),
                habit_type_to_db(habit.habit_type),
                i64::from(habit.target),
                habit.unit.as_str(),
                repeat_to_db(habit.repeat),
                habit.reminder.map(ReminderSlot::key),
                habit.created_at,
                habit.motivational_note.as_str(),
            ],
        )?;
        for date in &habit.log {
            tx.execute(
                "INSERT OR IGNORE INTO habit_log_entries (habit_uuid, date) VALUES (?1, ?2);",
                params![id_text.as_str(), date],
            )?;
        }
        tx.commit()?;

        info!(
            "event=habit_create module=repo status=ok habit_id={} log_entries={}",
            id,
            habit.log.len()
        );
        Ok(id)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let changed = self.conn.execute(
            "UPDATE habits
             SET
                name = ?1,
                type = ?2,
                target = ?3,
                unit = ?4,
                repeat = ?5,
                reminder = ?6,
                created_at = ?7,
                motivational_note = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?9;",
            params![
                habit.name.as_str(),
                habit_type_to_db(habit.habit_type),
                i64::from(habit.target),
                habit.unit.as_str(),
                repeat_to_db(habit.repeat),
                habit.reminder.map(ReminderSlot::key),
                habit.created_at,
                habit.motivational_note.as_str(),
                habit.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }
        Ok(())
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let mut habit = parse_habit_row(row)?;
                habit.log = load_log(self.conn, habit.id)?;
                Ok(Some(habit))
            }
            None => Ok(None),
        }
    }

    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        for habit in &mut habits {
            habit.log = load_log(self.conn, habit.id)?;
        }
        Ok(habits)
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=habit_delete module=repo status=ok habit_id={id}");
        Ok(())
    }

    fn insert_log_entry(&self, id: HabitId, date: NaiveDate) -> RepoResult<()> {
        ensure_habit_exists(self.conn, id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO habit_log_entries (habit_uuid, date) VALUES (?1, ?2);",
            params![id.to_string(), date],
        )?;
        Ok(())
    }

    fn delete_log_entry(&self, id: HabitId, date: NaiveDate) -> RepoResult<()> {
        ensure_habit_exists(self.conn, id)?;
        self.conn.execute(
            "DELETE FROM habit_log_entries WHERE habit_uuid = ?1 AND date = ?2;",
            params![id.to_string(), date],
        )?;
        Ok(())
    }

    fn apply_log_delta(&self, id: HabitId, delta: &LogDelta) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        ensure_habit_exists(&tx, id)?;

        for date in &delta.to_delete {
            tx.execute(
                "DELETE FROM habit_log_entries WHERE habit_uuid = ?1 AND date = ?2;",
                params![id_text.as_str(), date],
            )?;
        }
        for date in &delta.to_insert {
            tx.execute(
                "INSERT OR IGNORE INTO habit_log_entries (habit_uuid, date) VALUES (?1, ?2);",
                params![id_text.as_str(), date],
            )?;
        }
        tx.execute(
            "UPDATE habits SET updated_at = (strftime('%s', 'now') * 1000) WHERE uuid = ?1;",
            [id_text.as_str()],
        )?;

        if let Err(err) = tx.commit() {
            error!("event=log_apply module=repo status=error habit_id={id} error={err}");
            return Err(err.into());
        }

        info!(
            "event=log_apply module=repo status=ok habit_id={} inserted={} deleted={}",
            id,
            delta.to_insert.len(),
            delta.to_delete.len()
        );
        Ok(())
    }
}

fn ensure_habit_exists(conn: &Connection, id: HabitId) -> RepoResult<()> {
    let found = conn
        .query_row(
            "SELECT 1 FROM habits WHERE uuid = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound(id)),
    }
}

fn load_log(conn: &Connection, id: HabitId) -> RepoResult<BTreeSet<NaiveDate>> {
    let mut stmt =
        conn.prepare("SELECT date FROM habit_log_entries WHERE habit_uuid = ?1 ORDER BY date;")?;
    let dates = stmt
        .query_map([id.to_string()], |row| row.get::<_, NaiveDate>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(dates)
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in habits.uuid"))
    })?;

    let type_text: String = row.get("type")?;
    let habit_type = parse_habit_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid habit type `{type_text}` in habits.type"))
    })?;

    let repeat_text: String = row.get("repeat")?;
    let repeat = parse_repeat(&repeat_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid repeat pattern `{repeat_text}` in habits.repeat"
        ))
    })?;

    let reminder = match row.get::<_, Option<String>>("reminder")? {
        Some(key) => Some(ReminderSlot::from_key(&key).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid reminder key `{key}` in habits.reminder"))
        })?),
        None => None,
    };

    let target_raw: i64 = row.get("target")?;
    let target = u32::try_from(target_raw).map_err(|_| {
        RepoError::InvalidData(format!("invalid target `{target_raw}` in habits.target"))
    })?;

    let habit = Habit {
        id,
        name: row.get("name")?,
        motivational_note: row.get("motivational_note")?,
        unit: row.get("unit")?,
        habit_type,
        repeat,
        target,
        reminder,
        created_at: row.get("created_at")?,
        log: BTreeSet::new(),
    };
    habit.validate()?;
    Ok(habit)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn habit_type_to_db(habit_type: HabitType) -> &'static str {
    match habit_type {
        HabitType::Build => "build",
        HabitType::Break => "break",
    }
}

fn parse_habit_type(value: &str) -> Option<HabitType> {
    match value {
        "build" => Some(HabitType::Build),
        "break" => Some(HabitType::Break),
        _ => None,
    }
}

fn repeat_to_db(repeat: RepeatPattern) -> &'static str {
    match repeat {
        RepeatPattern::Daily => "daily",
        RepeatPattern::Weekly => "weekly",
    }
}

fn parse_repeat(value: &str) -> Option<RepeatPattern> {
    match value {
        "daily" => Some(RepeatPattern::Daily),
        "weekly" => Some(RepeatPattern::Weekly),
        _ => None,
    }
}
