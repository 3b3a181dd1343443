use serde::{Deserialize, Serialize};

/// Something the student promises themselves once enough stars are earned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reward {
    pub id: String,
    pub name: Option<String>,
    pub cost: i64,
}

impl Reward {
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn is_affordable(&self, stars: i64) -> bool {
        stars >= self.cost
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRewardInput {
    pub name: Option<String>,
    pub cost: i64,
}
