//! StudyDesk: a personal study planner served as a small web app.
//!
//! Tasks, subjects, marks, notes and rewards are stored in SQLite ([`db`]),
//! summarized on the landing page by [`dashboard`], and served as
//! server-rendered HTML by [`api`].

pub mod api;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;
