mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;

/// Handle to the StudyDesk store.
///
/// Each collection lives in its own table. Every public method is a single
/// read or write against one collection; nothing spans collections
/// atomically. Cloning shares the underlying connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

const TASK_COLUMNS: &str = "id, title, description, due_date, subject, color, priority, task_type, status, created_at";

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "studydesk")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("studydesk.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&mut conn)
    }

    // ============================================================
    // Task operations
    // ============================================================

    /// All tasks in insertion order.
    pub fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY rowid"))
    }

    /// All tasks by due date, earliest first. Tasks without a due date sort
    /// before everything else; malformed dates sort as plain text.
    pub fn get_tasks_by_due_date(&self) -> Result<Vec<Task>> {
        self.query_tasks(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY due_date ASC, rowid"
        ))
    }

    fn query_tasks(&self, sql: &str) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(sql)?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(task_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Insert a new pending task.
    ///
    /// The subject is resolved here and its name and color copied into the
    /// task. An unknown or absent subject id yields the "General" snapshot.
    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let subject = match input.subject_id.as_deref().filter(|s| !s.is_empty()) {
            Some(subject_id) => self.get_subject(subject_id)?,
            None => None,
        };
        let (subject_name, color) = match subject {
            Some(s) => (s.name, s.color),
            None => (
                DEFAULT_SUBJECT.to_string(),
                Some(UNRESOLVED_SUBJECT_COLOR.to_string()),
            ),
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = new_id();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO tasks (id, title, description, due_date, subject, color, priority, task_type, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &id,
                &input.title,
                &input.description,
                &input.due_date,
                &subject_name,
                &color,
                input.priority.map(|p| p.as_str()),
                &input.task_type,
                TaskStatus::Pending.as_str(),
                format_timestamp(now),
            ),
        )?;

        Ok(Task {
            id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            subject: Some(subject_name),
            color,
            priority: input.priority,
            task_type: input.task_type,
            status: TaskStatus::Pending,
            created_at: now,
        })
    }

    /// Flip a task between pending and completed.
    ///
    /// Returns the new status, or `None` when no task has this id.
    pub fn toggle_task_status(&self, id: &str) -> Result<Option<TaskStatus>> {
        let Some(task) = self.get_task(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let new_status = task.status.toggled();
        conn.execute(
            "UPDATE tasks SET status = ? WHERE id = ?",
            (new_status.as_str(), id),
        )?;

        Ok(Some(new_status))
    }

    pub fn delete_task(&self, id: &str) -> Result<bool> {
        self.delete_by_id("tasks", id)
    }

    pub fn count_tasks(&self) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_completed_tasks(&self) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = ?",
            [TaskStatus::Completed.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ============================================================
    // Subject operations
    // ============================================================

    pub fn get_all_subjects(&self) -> Result<Vec<Subject>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name, color FROM subjects ORDER BY rowid")?;

        let subjects = stmt
            .query_map([], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(subjects)
    }

    pub fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name, color FROM subjects WHERE id = ?")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Subject {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_subject(&self, input: CreateSubjectInput) -> Result<Subject> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = new_id();

        conn.execute(
            "INSERT INTO subjects (id, name, color) VALUES (?, ?, ?)",
            (&id, &input.name, &input.color),
        )?;

        Ok(Subject {
            id,
            name: input.name,
            color: input.color,
        })
    }

    /// Remove a subject. Tasks and marks that copied its name keep it.
    pub fn delete_subject(&self, id: &str) -> Result<bool> {
        self.delete_by_id("subjects", id)
    }

    // ============================================================
    // Mark operations
    // ============================================================

    pub fn get_marks_newest_first(&self) -> Result<Vec<Mark>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, subject, score, total, remarks, stars, date
             FROM marks ORDER BY date DESC, rowid DESC",
        )?;

        let marks = stmt
            .query_map([], |row| {
                Ok(Mark {
                    id: row.get(0)?,
                    subject: row.get(1)?,
                    score: row.get(2)?,
                    total: row.get(3)?,
                    remarks: row.get(4)?,
                    stars: row.get(5)?,
                    date: parse_datetime(row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(marks)
    }

    pub fn create_mark(&self, input: CreateMarkInput) -> Result<Mark> {
        let subject = match input.subject_id.as_deref().filter(|s| !s.is_empty()) {
            Some(subject_id) => self.get_subject(subject_id)?,
            None => None,
        };
        let subject_name = subject
            .map(|s| s.name)
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = new_id();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO marks (id, subject, score, total, remarks, stars, date)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                &id,
                &subject_name,
                &input.score,
                &input.total,
                &input.remarks,
                input.stars,
                format_timestamp(now),
            ),
        )?;

        Ok(Mark {
            id,
            subject: subject_name,
            score: input.score,
            total: input.total,
            remarks: input.remarks,
            stars: input.stars,
            date: now,
        })
    }

    /// Sum of `stars` over every mark ever recorded. Zero when there are none.
    pub fn sum_mark_stars(&self) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let total = conn.query_row("SELECT COALESCE(SUM(stars), 0) FROM marks", [], |row| {
            row.get(0)
        })?;
        Ok(total)
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub fn get_notes_newest_first(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, content, date FROM notes ORDER BY date DESC, rowid DESC",
        )?;

        let notes = stmt
            .query_map([], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    date: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = new_id();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, title, content, date) VALUES (?, ?, ?, ?)",
            (&id, &input.title, &input.content, format_timestamp(now)),
        )?;

        Ok(Note {
            id,
            title: input.title,
            content: input.content,
            date: now,
        })
    }

    // ============================================================
    // Reward operations
    // ============================================================

    pub fn get_all_rewards(&self) -> Result<Vec<Reward>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name, cost FROM rewards ORDER BY rowid")?;

        let rewards = stmt
            .query_map([], |row| {
                Ok(Reward {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    cost: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rewards)
    }

    pub fn create_reward(&self, input: CreateRewardInput) -> Result<Reward> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = new_id();

        conn.execute(
            "INSERT INTO rewards (id, name, cost) VALUES (?, ?, ?)",
            (&id, &input.name, input.cost),
        )?;

        Ok(Reward {
            id,
            name: input.name,
            cost: input.cost,
        })
    }

    // ============================================================
    // Shared operations
    // ============================================================

    /// Delete a note, mark or reward by id. Unknown ids are a no-op.
    pub fn delete_from(&self, collection: DeletableCollection, id: &str) -> Result<bool> {
        self.delete_by_id(collection.table(), id)
    }

    pub fn count(&self, collection: DeletableCollection) -> Result<i64> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // `table` is always a compile-time literal.
    fn delete_by_id(&self, table: &'static str, id: &str) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute(&format!("DELETE FROM {table} WHERE id = ?"), [id])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: row.get(3)?,
        subject: row.get(4)?,
        color: row.get(5)?,
        priority: row
            .get::<_, Option<String>>(6)?
            .as_deref()
            .and_then(Priority::from_str),
        task_type: row.get(7)?,
        status: TaskStatus::from_stored(&row.get::<_, String>(8)?),
        created_at: parse_datetime(row.get::<_, String>(9)?),
    })
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

// Fixed-width so that text ordering matches time ordering.
fn format_timestamp(dt: chrono::DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read a stored timestamp. A corrupt value is logged and shown as the epoch.
fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    match chrono::DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!("Unreadable stored timestamp {:?}: {}", s, e);
            chrono::DateTime::UNIX_EPOCH
        }
    }
}
