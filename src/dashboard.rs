//! Landing-page aggregation: task buckets, progress and score.
//!
//! Everything here is a pure function of the records passed in and the date
//! treated as "today", so it can be exercised without a store or a clock.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{Subject, Task};

/// Points awarded for each completed task.
pub const POINTS_PER_COMPLETED_TASK: i64 = 2;

/// How far ahead (in days, inclusive) a pending task still counts as upcoming.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Where a pending task lands on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Overdue,
    DueToday,
    Upcoming,
    /// Due beyond the upcoming window. Not shown on the dashboard at all.
    Later,
}

/// Decide the bucket of a pending task relative to `today`.
///
/// Tasks without a due date, and tasks whose due date does not parse as
/// `YYYY-MM-DD`, are treated as upcoming.
pub fn bucket_for(task: &Task, today: NaiveDate) -> Bucket {
    let Some(due) = task.parsed_due_date() else {
        return Bucket::Upcoming;
    };

    let horizon = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    if due < today {
        Bucket::Overdue
    } else if due == today {
        Bucket::DueToday
    } else if due <= horizon {
        Bucket::Upcoming
    } else {
        Bucket::Later
    }
}

/// Percentage of completed tasks, truncated towards zero. Zero when there are
/// no tasks.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // completed <= total, so this is at most 100.
    (completed * 100 / total) as u32
}

/// The reward score shared by the dashboard and the rewards page.
///
/// Saturates at the `i64` bounds instead of overflowing.
pub fn total_score(completed_tasks: i64, mark_stars: i64) -> i64 {
    completed_tasks
        .saturating_mul(POINTS_PER_COMPLETED_TASK)
        .saturating_add(mark_stars)
}

/// Everything the dashboard template needs.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub overdue: Vec<Task>,
    pub due_today: Vec<Task>,
    pub upcoming: Vec<Task>,
    pub subjects: Vec<Subject>,
    pub progress: u32,
    pub completed_count: usize,
    pub total_score: i64,
}

impl Dashboard {
    /// Categorize `tasks` against `today` and compute progress and score.
    ///
    /// Display defaults are applied to the returned tasks; the inputs are not
    /// persisted back anywhere. Bucket order follows the input order.
    pub fn build(
        tasks: Vec<Task>,
        subjects: Vec<Subject>,
        mark_stars: i64,
        today: NaiveDate,
    ) -> Self {
        let total = tasks.len();
        let mut overdue = Vec::new();
        let mut due_today = Vec::new();
        let mut upcoming = Vec::new();
        let mut completed_count = 0;

        for task in tasks.into_iter().map(Task::with_defaults) {
            if task.is_completed() {
                completed_count += 1;
                continue;
            }

            match bucket_for(&task, today) {
                Bucket::Overdue => overdue.push(task),
                Bucket::DueToday => due_today.push(task),
                Bucket::Upcoming => upcoming.push(task),
                Bucket::Later => {}
            }
        }

        Self {
            overdue,
            due_today,
            upcoming,
            subjects,
            progress: progress_percent(completed_count, total),
            completed_count,
            total_score: total_score(completed_count as i64, mark_stars),
        }
    }
}
