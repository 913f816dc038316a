use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed label set an email can be sorted into.
///
/// Variant order is the registry order; `general` is the fallback and `spam`
/// overrides every other category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Promotions,
    Urgent,
    Bills,
    Social,
    Newsletters,
    Travel,
    Shopping,
    Security,
    Spam,
    General,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Work,
        Category::Personal,
        Category::Promotions,
        Category::Urgent,
        Category::Bills,
        Category::Social,
        Category::Newsletters,
        Category::Travel,
        Category::Shopping,
        Category::Security,
        Category::Spam,
        Category::General,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Promotions => "promotions",
            Self::Urgent => "urgent",
            Self::Bills => "bills",
            Self::Social => "social",
            Self::Newsletters => "newsletters",
            Self::Travel => "travel",
            Self::Shopping => "shopping",
            Self::Security => "security",
            Self::Spam => "spam",
            Self::General => "general",
        }
    }

    pub fn info(&self) -> &'static CategoryInfo {
        category_info(*self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Display metadata rendered next to a categorized email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

const fn entry(
    id: Category,
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    description: &'static str,
) -> CategoryInfo {
    CategoryInfo {
        id,
        name,
        icon,
        color,
        description,
    }
}

// Indexed by `Category as usize`, so the rows must follow variant order.
static REGISTRY: [CategoryInfo; 12] = [
    entry(Category::Work, "Work", "💼", "blue", "Work-related emails and communications"),
    entry(Category::Personal, "Personal", "👤", "green", "Messages from friends and family"),
    entry(Category::Promotions, "Promotions", "🏷️", "purple", "Deals, discounts and marketing offers"),
    entry(Category::Urgent, "Urgent", "🚨", "red", "Time-sensitive messages that need attention"),
    entry(Category::Bills, "Bills", "💳", "orange", "Invoices, payments and account statements"),
    entry(Category::Social, "Social", "👥", "pink", "Notifications from social networks"),
    entry(Category::Newsletters, "Newsletters", "📰", "indigo", "Subscriptions, digests and updates"),
    entry(Category::Travel, "Travel", "✈️", "cyan", "Bookings, itineraries and boarding passes"),
    entry(Category::Shopping, "Shopping", "🛍️", "yellow", "Orders, shipping and delivery updates"),
    entry(Category::Security, "Security", "🔒", "emerald", "Login alerts, passwords and verification codes"),
    entry(Category::Spam, "Spam", "🚫", "gray", "Suspicious or unwanted messages"),
    entry(Category::General, "General", "📧", "slate", "Everything else"),
];

pub fn category_info(category: Category) -> &'static CategoryInfo {
    &REGISTRY[category as usize]
}
