use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded test or assignment result.
///
/// `score` and `total` are kept as entered. `stars` feed the reward score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mark {
    pub id: String,
    /// Subject name at the time the mark was recorded.
    pub subject: String,
    pub score: Option<String>,
    pub total: Option<String>,
    pub remarks: Option<String>,
    pub stars: i64,
    pub date: DateTime<Utc>,
}

impl Mark {
    pub fn score_text(&self) -> &str {
        self.score.as_deref().unwrap_or("")
    }

    pub fn total_text(&self) -> &str {
        self.total.as_deref().unwrap_or("")
    }

    pub fn remarks_text(&self) -> &str {
        self.remarks.as_deref().unwrap_or("")
    }

    pub fn recorded_on(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMarkInput {
    /// Subject to snapshot the name from. Unknown ids fall back to "General".
    pub subject_id: Option<String>,
    pub score: Option<String>,
    pub total: Option<String>,
    pub remarks: Option<String>,
    pub stars: i64,
}
