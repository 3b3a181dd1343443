use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Subject name shown for tasks and marks without a resolvable subject.
pub const DEFAULT_SUBJECT: &str = "General";
/// Color stamped onto a new task whose subject could not be resolved.
pub const UNRESOLVED_SUBJECT_COLOR: &str = "#667eea";
/// Color shown for stored tasks that carry no color at all.
pub const FALLBACK_COLOR: &str = "#ccc";

/// Format of the stored `due_date` string.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// An assignment, exam or other piece of work with an optional due date.
///
/// `subject` and `color` are snapshots copied from the subject at creation
/// time. They are never refreshed, so a task keeps showing a subject that has
/// since been renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Stored verbatim as submitted; may be malformed.
    pub due_date: Option<String>,
    pub subject: Option<String>,
    pub color: Option<String>,
    pub priority: Option<Priority>,
    pub task_type: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Strict `YYYY-MM-DD` parse of the due date.
    ///
    /// `None` when there is no due date, when it is blank, or when it is
    /// malformed.
    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(d, DUE_DATE_FORMAT).ok())
    }

    /// Fill in the display defaults for fields older records may lack.
    ///
    /// Only touches the in-memory value; nothing is written back.
    pub fn with_defaults(mut self) -> Self {
        self.priority.get_or_insert(Priority::Medium);
        self.color.get_or_insert_with(|| FALLBACK_COLOR.to_string());
        self.subject.get_or_insert_with(|| DEFAULT_SUBJECT.to_string());
        self
    }

    // Template accessors.

    pub fn subject_name(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or(FALLBACK_COLOR)
    }

    pub fn priority_label(&self) -> &'static str {
        self.priority.unwrap_or_default().as_str()
    }

    pub fn due_label(&self) -> &str {
        self.due_date.as_deref().unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn type_label(&self) -> &str {
        self.task_type.as_deref().unwrap_or("")
    }
}

/// Task priority. Missing priorities display as [`Priority::Medium`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// The only two states a task can be in. Changes happen through
/// [`TaskStatus::toggled`] and nothing else.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Anything other than `completed` reads back as pending.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

/// Input for creating a task.
///
/// `subject_id` is looked up once; the store copies the subject's name and
/// color into the new task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub subject_id: Option<String>,
    pub priority: Option<Priority>,
    pub task_type: Option<String>,
}
