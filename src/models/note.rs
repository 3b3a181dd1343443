use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form study note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: String,
    pub title: Option<String>,
    /// The note body, shown as plain text.
    pub content: Option<String>,
    pub date: DateTime<Utc>,
}

impl Note {
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn recorded_on(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
}
