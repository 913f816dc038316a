use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

impl EmailRecord {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            sender_name: None,
            subject: subject.into(),
            content: content.into(),
            category: None,
            read: false,
            starred: false,
            received_at: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_categorized(&self) -> bool {
        self.category.is_some()
    }

    /// Bare address part of `sender`, so `Name <user@host>` and `user@host`
    /// match the same sender rules.
    pub fn sender_address(&self) -> &str {
        let sender = self.sender.trim();
        match (sender.rfind('<'), sender.rfind('>')) {
            (Some(open), Some(close)) if open < close => sender[open + 1..close].trim(),
            _ => sender,
        }
    }

    /// Unread or starred mail is sorted ahead of the rest.
    pub fn needs_attention(&self) -> bool {
        !self.read || self.starred
    }
}
