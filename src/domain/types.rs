use serde::Serialize;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationReason {
    Preassigned,
    SpamSignature,
    Threshold,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub score: u32,
    pub reason: ClassificationReason,
}

impl Classification {
    pub fn preassigned(category: Category) -> Self {
        Self {
            category,
            score: 0,
            reason: ClassificationReason::Preassigned,
        }
    }

    pub fn spam() -> Self {
        Self {
            category: Category::Spam,
            score: 0,
            reason: ClassificationReason::SpamSignature,
        }
    }

    pub fn fallback() -> Self {
        Self {
            category: Category::General,
            score: 0,
            reason: ClassificationReason::Fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueSnapshot {
    pub high_priority: usize,
    pub normal_priority: usize,
}
