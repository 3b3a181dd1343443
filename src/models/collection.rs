use serde::{Deserialize, Serialize};

/// Collections that can be targeted by the generic delete route.
///
/// The route segment is deserialized straight into this enum, so unknown
/// names are rejected before anything reaches the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeletableCollection {
    Notes,
    Marks,
    Rewards,
}

impl DeletableCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Marks => "marks",
            Self::Rewards => "rewards",
        }
    }

    /// Backing table name.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Marks => "marks",
            Self::Rewards => "rewards",
        }
    }
}
