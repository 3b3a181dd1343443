use serde::{Deserialize, Serialize};

/// A school subject. Tasks and marks copy its name (and tasks its color) when
/// they are created; deleting or changing a subject never touches them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

impl Subject {
    pub fn display_color(&self) -> &str {
        self.color.as_deref().unwrap_or(super::FALLBACK_COLOR)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectInput {
    pub name: String,
    pub color: Option<String>,
}
