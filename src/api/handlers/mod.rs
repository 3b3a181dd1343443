use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Local;
use serde::Deserialize;

use super::error::AppError;
use super::session::{clear_session_cookie, CurrentUser, Flash, SessionKeys, SessionToken};
use super::views::*;
use crate::dashboard::{total_score, Dashboard};
use crate::db::Database;
use crate::models::*;

// ============================================================
// Helpers
// ============================================================

// Deliberately unvalidated: the value is redirected to as sent, off-site
// URLs included.
fn referrer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Redirect back to the page the request came from, or to `fallback`.
fn back_or(headers: &HeaderMap, fallback: &str) -> Redirect {
    Redirect::to(referrer(headers).unwrap_or(fallback))
}

/// Parse an integer form field. Missing or blank yields `None`; values that
/// do not fit `T` are rejected like any other non-integer.
fn parse_int<T: FromStr>(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::InvalidForm(field)),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Session
// ============================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
}

pub async fn login_page() -> Result<Html<String>, AppError> {
    render(&LoginTemplate::default())
}

pub async fn login(
    State(keys): State<SessionKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(token) = SessionToken::new(form.username.as_deref().unwrap_or(""), keys.ttl())
    else {
        return Ok(render(&LoginTemplate::default())?.into_response());
    };

    let raw = keys.issue(&token)?;
    tracing::info!("{} logged in", token.username());

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, keys.session_cookie(&raw)),
            (header::SET_COOKIE, Flash::LoggedIn.set_cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login"),
    )
}

// ============================================================
// Pages
// ============================================================

pub async fn dashboard(
    State(db): State<Database>,
    CurrentUser(session): CurrentUser,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let tasks = db.get_all_tasks()?;
    let subjects = db.get_all_subjects()?;
    let stars = db.sum_mark_stars()?;
    let today = Local::now().date_naive();

    let flash = Flash::from_headers(&headers);
    let page = render(&IndexTemplate {
        username: session.sub,
        flash: flash.map(|f| f.message()),
        dashboard: Dashboard::build(tasks, subjects, stars, today),
    })?;

    Ok(match flash {
        Some(_) => (
            AppendHeaders([(header::SET_COOKIE, Flash::clear_cookie())]),
            page,
        )
            .into_response(),
        None => page.into_response(),
    })
}

pub async fn assignments(State(db): State<Database>) -> Result<Html<String>, AppError> {
    let (completed, pending): (Vec<Task>, Vec<Task>) = db
        .get_tasks_by_due_date()?
        .into_iter()
        .partition(Task::is_completed);

    render(&AssignmentsTemplate {
        pending,
        completed,
        subjects: db.get_all_subjects()?,
    })
}

pub async fn subjects(State(db): State<Database>) -> Result<Html<String>, AppError> {
    render(&SubjectsTemplate {
        subjects: db.get_all_subjects()?,
    })
}

pub async fn marks(State(db): State<Database>) -> Result<Html<String>, AppError> {
    render(&MarksTemplate {
        marks: db.get_marks_newest_first()?,
        subjects: db.get_all_subjects()?,
    })
}

pub async fn notes(State(db): State<Database>) -> Result<Html<String>, AppError> {
    render(&NotesTemplate {
        notes: db.get_notes_newest_first()?,
    })
}

pub async fn rewards(State(db): State<Database>) -> Result<Html<String>, AppError> {
    let total_stars = total_score(db.count_completed_tasks()?, db.sum_mark_stars()?);
    render(&RewardsTemplate::new(total_stars, db.get_all_rewards()?))
}

pub async fn puzzle() -> Result<Html<String>, AppError> {
    render(&PuzzleTemplate)
}

// ============================================================
// Tasks
// ============================================================

#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub subject: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
}

pub async fn add_task(
    State(db): State<Database>,
    headers: HeaderMap,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    let Some(title) = form.title.filter(|t| !t.trim().is_empty()) else {
        tracing::debug!("Ignoring task without a title");
        return Ok(back_or(&headers, "/assignments"));
    };

    let task = db.create_task(CreateTaskInput {
        title,
        description: form.description,
        due_date: form.due_date,
        subject_id: form.subject,
        priority: form.priority.as_deref().and_then(Priority::from_str),
        task_type: form.task_type,
    })?;
    tracing::debug!("Created task {}", task.id);

    Ok(Redirect::to("/assignments"))
}

pub async fn toggle_task(
    State(db): State<Database>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    if let Some(status) = db.toggle_task_status(&task_id)? {
        tracing::debug!("Task {} is now {}", task_id, status.as_str());
    }
    Ok(back_or(&headers, "/"))
}

pub async fn delete_task(
    State(db): State<Database>,
    Path(task_id): Path<String>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    if db.delete_task(&task_id)? {
        tracing::debug!("Deleted task {}", task_id);
    }
    Ok(back_or(&headers, "/"))
}

// ============================================================
// Subjects
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SubjectForm {
    pub name: Option<String>,
    pub color: Option<String>,
}

pub async fn add_subject(
    State(db): State<Database>,
    Form(form): Form<SubjectForm>,
) -> Result<Redirect, AppError> {
    if let Some(name) = form.name.filter(|n| !n.trim().is_empty()) {
        let subject = db.create_subject(CreateSubjectInput {
            name,
            color: form.color,
        })?;
        tracing::debug!("Created subject {}", subject.id);
    }
    Ok(Redirect::to("/subjects"))
}

pub async fn delete_subject(
    State(db): State<Database>,
    Path(subject_id): Path<String>,
) -> Result<Redirect, AppError> {
    if db.delete_subject(&subject_id)? {
        tracing::debug!("Deleted subject {}", subject_id);
    }
    Ok(Redirect::to("/subjects"))
}

// ============================================================
// Marks, notes and rewards
// ============================================================

#[derive(Debug, Deserialize)]
pub struct MarkForm {
    pub subject: Option<String>,
    pub score: Option<String>,
    pub total: Option<String>,
    pub remarks: Option<String>,
    pub stars: Option<String>,
}

pub async fn add_mark(
    State(db): State<Database>,
    Form(form): Form<MarkForm>,
) -> Result<Redirect, AppError> {
    // Stars fit in i32 so the sum over all marks cannot overflow.
    let stars = parse_int::<i32>(form.stars.as_deref(), "stars")?.map_or(0, i64::from);

    let mark = db.create_mark(CreateMarkInput {
        subject_id: form.subject,
        score: form.score,
        total: form.total,
        remarks: form.remarks,
        stars,
    })?;
    tracing::debug!("Recorded mark {} ({} stars)", mark.id, mark.stars);

    Ok(Redirect::to("/marks"))
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn add_note(
    State(db): State<Database>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, AppError> {
    let note = db.create_note(CreateNoteInput {
        title: form.title,
        content: form.content,
    })?;
    tracing::debug!("Created note {}", note.id);

    Ok(Redirect::to("/notes"))
}

#[derive(Debug, Deserialize)]
pub struct RewardForm {
    pub name: Option<String>,
    pub cost: Option<String>,
}

pub async fn add_reward(
    State(db): State<Database>,
    Form(form): Form<RewardForm>,
) -> Result<Redirect, AppError> {
    let cost = parse_int::<i64>(form.cost.as_deref(), "cost")?
        .ok_or(AppError::InvalidForm("cost"))?;

    let reward = db.create_reward(CreateRewardInput {
        name: form.name,
        cost,
    })?;
    tracing::debug!("Created reward {}", reward.id);

    Ok(Redirect::to("/rewards"))
}

/// Delete a note, mark or reward and go back where the request came from.
///
/// The collection segment only deserializes for the three supported
/// collections; anything else is rejected by the extractor.
pub async fn delete_generic(
    State(db): State<Database>,
    Path((collection, item_id)): Path<(DeletableCollection, String)>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let back = referrer(&headers).ok_or(AppError::MissingReferrer)?;

    if db.delete_from(collection, &item_id)? {
        tracing::debug!("Deleted {} {}", collection.as_str(), item_id);
    }
    Ok(Redirect::to(back))
}
