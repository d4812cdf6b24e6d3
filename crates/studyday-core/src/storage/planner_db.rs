//! SQLite-based day store and week store.
//!
//! Provides persistent storage for:
//! - Lectures and committed plans, keyed by ISO date
//! - The weekly task catalog, keyed by the Monday of the week
//! - History lookups over committed study blocks

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::history::HistoryIndex;
use crate::model::{study_label, BlockKind, Lecture, PlanBlock, WorkItem};
use crate::time::{format_time, monday_of};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A lecture as stored, with its row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLecture {
    pub id: i64,
    pub day: NaiveDate,
    #[serde(flatten)]
    pub lecture: Lecture,
}

/// A catalog task as stored, with its row id and week key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub week_start: NaiveDate,
    #[serde(flatten)]
    pub item: WorkItem,
}

/// What happened to a task after reducing its remaining minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// Minutes still needed
    Reduced(u32),
    /// Reached zero and was removed from the catalog
    Deleted,
}

fn day_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_day(table: &'static str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| {
        DatabaseError::CorruptRow {
            table,
            message: format!("bad date '{s}': {e}"),
        }
        .into()
    })
}

fn parse_kind(s: &str) -> Result<BlockKind> {
    BlockKind::parse(s).ok_or_else(|| {
        DatabaseError::CorruptRow {
            table: "plan_blocks",
            message: format!("unknown block kind '{s}'"),
        }
        .into()
    })
}

/// Raw `week_tasks` row before date parsing.
struct TaskRow {
    id: i64,
    week_start: String,
    course: String,
    title: String,
    due_date: String,
    due_min: i32,
    minutes_needed: u32,
    prepared: bool,
    repeat_weekly: bool,
}

impl TaskRow {
    const COLUMNS: &'static str =
        "id, week_start, course, title, due_date, due_min, minutes_needed, prepared, repeat_weekly";

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            week_start: row.get(1)?,
            course: row.get(2)?,
            title: row.get(3)?,
            due_date: row.get(4)?,
            due_min: row.get(5)?,
            minutes_needed: row.get(6)?,
            prepared: row.get(7)?,
            repeat_weekly: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<TaskRecord> {
        Ok(TaskRecord {
            id: self.id,
            week_start: parse_day("week_tasks", &self.week_start)?,
            item: WorkItem {
                course: self.course,
                title: self.title,
                due_date: parse_day("week_tasks", &self.due_date)?,
                due_min: self.due_min,
                minutes_needed: self.minutes_needed,
                prepared: self.prepared,
                repeat_weekly: self.repeat_weekly,
            },
        })
    }
}

/// SQLite database holding the day store and the week store.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/studyday.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("studyday.db"))
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Day store: lectures ===

    /// Add a lecture on `day`.
    ///
    /// # Errors
    /// Rejects an empty time range and any overlap with a lecture already
    /// stored for that day.
    pub fn add_lecture(&self, day: NaiveDate, lecture: &Lecture) -> Result<i64> {
        if lecture.end_min <= lecture.start_min {
            return Err(ValidationError::InvalidTimeRange {
                start: lecture.start_min,
                end: lecture.end_min,
            }
            .into());
        }
        if let Some(existing) = self
            .lectures_on(day)?
            .into_iter()
            .find(|s| s.lecture.overlaps(lecture.start_min, lecture.end_min))
        {
            return Err(ValidationError::LectureOverlap {
                course: existing.lecture.course,
                start: format_time(existing.lecture.start_min),
                end: format_time(existing.lecture.end_min),
            }
            .into());
        }

        self.conn.execute(
            "INSERT INTO lectures (day, course, start_min, end_min) VALUES (?1, ?2, ?3, ?4)",
            params![day_key(day), lecture.course, lecture.start_min, lecture.end_min],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn remove_lecture(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM lectures WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(ValidationError::LectureNotFound(id).into());
        }
        Ok(())
    }

    /// Lectures on `day`, ordered by start time.
    pub fn lectures_on(&self, day: NaiveDate) -> Result<Vec<StoredLecture>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, course, start_min, end_min FROM lectures
             WHERE day = ?1 ORDER BY start_min, id",
        )?;
        let rows = stmt.query_map([day_key(day)], |row| {
            Ok(StoredLecture {
                id: row.get(0)?,
                day,
                lecture: Lecture {
                    course: row.get(1)?,
                    start_min: row.get(2)?,
                    end_min: row.get(3)?,
                },
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // === Day store: plans ===

    /// Replace the committed plan for `day`.
    pub fn save_plan(&self, day: NaiveDate, blocks: &[PlanBlock]) -> Result<()> {
        let key = day_key(day);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM plan_blocks WHERE day = ?1", [&key])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO plan_blocks (day, seq, start_min, end_min, label, kind, course, manual)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (seq, block) in blocks.iter().enumerate() {
                stmt.execute(params![
                    key,
                    seq as i64,
                    block.start_min,
                    block.end_min,
                    block.label,
                    block.kind.as_str(),
                    block.course,
                    block.manual,
                ])?;
            }
        }
        tx.commit()?;
        info!(day = %key, blocks = blocks.len(), "committed plan");
        Ok(())
    }

    /// Committed plan for `day`, in the order it was saved.
    pub fn plan_on(&self, day: NaiveDate) -> Result<Vec<PlanBlock>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_min, end_min, label, kind, course, manual FROM plan_blocks
             WHERE day = ?1 ORDER BY seq",
        )?;
        let rows = stmt
            .query_map([day_key(day)], |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(start_min, end_min, label, kind, course, manual)| {
                Ok(PlanBlock {
                    start_min,
                    end_min,
                    label,
                    kind: parse_kind(&kind)?,
                    course,
                    manual,
                })
            })
            .collect()
    }

    /// Minutes of committed study for `(course, title)` strictly before
    /// `before`.
    pub fn prior_minutes(&self, course: &str, title: &str, before: NaiveDate) -> Result<u32> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(MAX(0, end_min - start_min)), 0) FROM plan_blocks
             WHERE kind = 'study' AND label = ?1 AND day < ?2",
            params![study_label(course, title), day_key(before)],
            |row| row.get(0),
        )?;
        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    /// Snapshot of all committed study history.
    pub fn history_index(&self) -> Result<HistoryIndex> {
        let mut stmt = self.conn.prepare(
            "SELECT day, start_min, end_min, label, course FROM plan_blocks
             WHERE kind = 'study' ORDER BY day, seq",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, i32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut by_day: BTreeMap<NaiveDate, Vec<PlanBlock>> = BTreeMap::new();
        for (day, start_min, end_min, label, course) in rows {
            by_day.entry(parse_day("plan_blocks", &day)?).or_default().push(PlanBlock {
                start_min,
                end_min,
                label,
                kind: BlockKind::Study,
                course,
                manual: false,
            });
        }
        Ok(HistoryIndex::from_days(
            by_day.iter().map(|(day, blocks)| (*day, blocks.as_slice())),
        ))
    }

    // === Week store ===

    /// Add `item` to the catalog of the week containing `week_of`.
    pub fn add_task(&self, week_of: NaiveDate, item: &WorkItem) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO week_tasks
                (week_start, course, title, due_date, due_min, minutes_needed, prepared, repeat_weekly)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                day_key(monday_of(week_of)),
                item.course,
                item.title,
                day_key(item.due_date),
                item.due_min,
                item.minutes_needed,
                item.prepared,
                item.repeat_weekly,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_task(&self, id: i64) -> Result<Option<TaskRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM week_tasks WHERE id = ?1", TaskRow::COLUMNS),
                [id],
                TaskRow::from_row,
            )
            .optional()?;
        row.map(TaskRow::into_record).transpose()
    }

    /// Catalog of the week containing `week_of`, in insertion order.
    pub fn tasks_for_week(&self, week_of: NaiveDate) -> Result<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM week_tasks WHERE week_start = ?1 ORDER BY id",
            TaskRow::COLUMNS
        ))?;
        let rows = stmt
            .query_map([day_key(monday_of(week_of))], TaskRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(TaskRow::into_record).collect()
    }

    pub fn remove_task(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM week_tasks WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(ValidationError::TaskNotFound(id).into());
        }
        Ok(())
    }

    /// Lower a task's remaining minutes, deleting it once nothing is left.
    pub fn reduce_task(&self, id: i64, by_minutes: u32) -> Result<ReduceOutcome> {
        let record = self.get_task(id)?.ok_or(ValidationError::TaskNotFound(id))?;
        let left = record.item.minutes_needed.saturating_sub(by_minutes);
        if left == 0 {
            self.remove_task(id)?;
            return Ok(ReduceOutcome::Deleted);
        }
        self.conn.execute(
            "UPDATE week_tasks SET minutes_needed = ?1 WHERE id = ?2",
            params![left, id],
        )?;
        Ok(ReduceOutcome::Reduced(left))
    }

    /// Flip the prepared flag; returns the new value.
    pub fn toggle_prepared(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE week_tasks SET prepared = 1 - prepared WHERE id = ?1",
            [id],
        )?;
        if affected == 0 {
            return Err(ValidationError::TaskNotFound(id).into());
        }
        let prepared: bool = self.conn.query_row(
            "SELECT prepared FROM week_tasks WHERE id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::history::HistoryLookup;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn task(minutes: u32) -> WorkItem {
        WorkItem::new("CS", "Lab", date(8), 900, minutes)
    }

    #[test]
    fn add_and_list_lectures() {
        let db = PlannerDb::open_memory().unwrap();
        db.add_lecture(date(4), &Lecture::new("Chem", 780, 840)).unwrap();
        db.add_lecture(date(4), &Lecture::new("Physics", 600, 660)).unwrap();
        db.add_lecture(date(5), &Lecture::new("Bio", 600, 660)).unwrap();

        let lectures = db.lectures_on(date(4)).unwrap();
        let courses: Vec<_> = lectures.iter().map(|l| l.lecture.course.as_str()).collect();
        assert_eq!(courses, vec!["Physics", "Chem"]);
    }

    #[test]
    fn rejects_overlapping_lecture() {
        let db = PlannerDb::open_memory().unwrap();
        db.add_lecture(date(4), &Lecture::new("Physics", 600, 660)).unwrap();
        let err = db.add_lecture(date(4), &Lecture::new("Chem", 650, 700)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::LectureOverlap { ref course, .. }) if course == "Physics"
        ));
        // back-to-back is fine
        db.add_lecture(date(4), &Lecture::new("Chem", 660, 700)).unwrap();
    }

    #[test]
    fn rejects_empty_lecture() {
        let db = PlannerDb::open_memory().unwrap();
        let err = db.add_lecture(date(4), &Lecture::new("Chem", 700, 700)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidTimeRange { .. })));
    }

    #[test]
    fn remove_lecture_by_id() {
        let db = PlannerDb::open_memory().unwrap();
        let id = db.add_lecture(date(4), &Lecture::new("Physics", 600, 660)).unwrap();
        db.remove_lecture(id).unwrap();
        assert!(db.lectures_on(date(4)).unwrap().is_empty());
        assert!(db.remove_lecture(id).is_err());
    }

    #[test]
    fn save_plan_replaces_previous_plan() {
        let db = PlannerDb::open_memory().unwrap();
        let item = task(60);
        db.save_plan(date(4), &[PlanBlock::study(480, 540, &item), PlanBlock::rest(460, 480)])
            .unwrap();
        db.save_plan(date(4), &[PlanBlock::study(600, 630, &item)]).unwrap();

        let plan = db.plan_on(date(4)).unwrap();
        assert_eq!(plan, vec![PlanBlock::study(600, 630, &item)]);
    }

    #[test]
    fn prior_minutes_counts_earlier_days_only() {
        let db = PlannerDb::open_memory().unwrap();
        let item = task(200);
        db.save_plan(date(4), &[PlanBlock::study(480, 540, &item)]).unwrap();
        db.save_plan(date(5), &[PlanBlock::study(480, 500, &item), PlanBlock::rest(500, 520)])
            .unwrap();
        db.save_plan(date(6), &[PlanBlock::study(480, 600, &item)]).unwrap();

        assert_eq!(db.prior_minutes("CS", "Lab", date(6)).unwrap(), 80);
        assert_eq!(db.prior_minutes("CS", "Lab", date(4)).unwrap(), 0);
        assert_eq!(db.prior_minutes("CS", "Other", date(9)).unwrap(), 0);
    }

    #[test]
    fn history_index_matches_sql_lookup() {
        let db = PlannerDb::open_memory().unwrap();
        let item = task(200);
        db.save_plan(date(4), &[PlanBlock::study(480, 540, &item)]).unwrap();
        db.save_plan(date(6), &[PlanBlock::study(480, 600, &item)]).unwrap();

        let index = db.history_index().unwrap();
        for day in 3..9 {
            assert_eq!(
                index.prior_minutes("CS", "Lab", date(day)),
                db.prior_minutes("CS", "Lab", date(day)).unwrap()
            );
        }
    }

    #[test]
    fn tasks_are_keyed_by_monday() {
        let db = PlannerDb::open_memory().unwrap();
        // Wednesday and Sunday of the same week
        db.add_task(date(6), &task(60)).unwrap();
        db.add_task(date(10), &task(30)).unwrap();
        db.add_task(date(11), &task(15)).unwrap();

        let week = db.tasks_for_week(date(4)).unwrap();
        assert_eq!(week.len(), 2);
        assert!(week.iter().all(|t| t.week_start == date(4)));
        assert_eq!(db.tasks_for_week(date(12)).unwrap().len(), 1);
    }

    #[test]
    fn reduce_task_deletes_at_zero() {
        let db = PlannerDb::open_memory().unwrap();
        let id = db.add_task(date(4), &task(15)).unwrap();

        assert_eq!(db.reduce_task(id, 10).unwrap(), ReduceOutcome::Reduced(5));
        assert_eq!(db.get_task(id).unwrap().unwrap().item.minutes_needed, 5);
        assert_eq!(db.reduce_task(id, 10).unwrap(), ReduceOutcome::Deleted);
        assert!(db.get_task(id).unwrap().is_none());
        assert!(matches!(
            db.reduce_task(id, 10).unwrap_err(),
            CoreError::Validation(ValidationError::TaskNotFound(_))
        ));
    }

    #[test]
    fn toggle_prepared_flips() {
        let db = PlannerDb::open_memory().unwrap();
        let id = db.add_task(date(4), &task(15)).unwrap();
        assert!(db.toggle_prepared(id).unwrap());
        assert!(db.get_task(id).unwrap().unwrap().item.prepared);
        assert!(!db.toggle_prepared(id).unwrap());
        assert!(db.toggle_prepared(999).is_err());
    }

    #[test]
    fn task_roundtrips_all_fields() {
        let db = PlannerDb::open_memory().unwrap();
        let mut item = task(45);
        item.repeat_weekly = true;
        let id = db.add_task(date(4), &item).unwrap();
        let record = db.get_task(id).unwrap().unwrap();
        assert_eq!(record.item, item);
    }

    #[test]
    fn open_at_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyday.db");
        {
            let db = PlannerDb::open_at(&path).unwrap();
            db.add_task(date(4), &task(30)).unwrap();
        }
        let db = PlannerDb::open_at(&path).unwrap();
        assert_eq!(db.tasks_for_week(date(4)).unwrap().len(), 1);
    }
}
