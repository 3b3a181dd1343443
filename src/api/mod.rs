mod error;
mod handlers;
pub mod session;
mod views;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::db::Database;

pub use error::AppError;
pub use session::SessionKeys;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionKeys,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

pub fn create_router(db: Database, sessions: SessionKeys) -> Router {
    Router::new()
        // Session
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        // Pages
        .route("/", get(handlers::dashboard))
        .route("/assignments", get(handlers::assignments))
        .route("/subjects", get(handlers::subjects))
        .route("/marks", get(handlers::marks))
        .route("/notes", get(handlers::notes))
        .route("/rewards", get(handlers::rewards))
        .route("/puzzle", get(handlers::puzzle))
        // Tasks
        .route("/add", post(handlers::add_task))
        .route("/complete/{task_id}", get(handlers::toggle_task))
        .route("/delete/{task_id}", get(handlers::delete_task))
        // Subjects
        .route("/add_subject", post(handlers::add_subject))
        .route("/delete_subject/{subject_id}", get(handlers::delete_subject))
        // Marks, notes, rewards
        .route("/add_mark", post(handlers::add_mark))
        .route("/add_note", post(handlers::add_note))
        .route("/add_reward", post(handlers::add_reward))
        .route(
            "/delete_generic/{collection}/{item_id}",
            get(handlers::delete_generic),
        )
        // Health
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { db, sessions })
}
