//! Page templates. Sources live in `templates/` and are compiled in.

use askama::Template;
use axum::response::Html;

use super::error::AppError;
use super::session::MAX_USERNAME_LEN;
use crate::dashboard::Dashboard;
use crate::models::{Mark, Note, Reward, Subject, Task};

pub fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub max_name_len: usize,
}

impl Default for LoginTemplate {
    fn default() -> Self {
        Self {
            max_name_len: MAX_USERNAME_LEN,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
    pub flash: Option<&'static str>,
    pub dashboard: Dashboard,
}

#[derive(Template)]
#[template(path = "assignments.html")]
pub struct AssignmentsTemplate {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub subjects: Vec<Subject>,
}

#[derive(Template)]
#[template(path = "subjects.html")]
pub struct SubjectsTemplate {
    pub subjects: Vec<Subject>,
}

#[derive(Template)]
#[template(path = "marks.html")]
pub struct MarksTemplate {
    pub marks: Vec<Mark>,
    pub subjects: Vec<Subject>,
}

#[derive(Template)]
#[template(path = "notes.html")]
pub struct NotesTemplate {
    pub notes: Vec<Note>,
}

/// A reward plus whether the current star total covers it.
pub struct RewardCard {
    pub reward: Reward,
    pub affordable: bool,
}

#[derive(Template)]
#[template(path = "rewards.html")]
pub struct RewardsTemplate {
    pub total_stars: i64,
    pub rewards: Vec<RewardCard>,
}

impl RewardsTemplate {
    pub fn new(total_stars: i64, rewards: Vec<Reward>) -> Self {
        let rewards = rewards
            .into_iter()
            .map(|reward| RewardCard {
                affordable: reward.is_affordable(total_stars),
                reward,
            })
            .collect();
        Self {
            total_stars,
            rewards,
        }
    }
}

#[derive(Template)]
#[template(path = "puzzle.html")]
pub struct PuzzleTemplate;
