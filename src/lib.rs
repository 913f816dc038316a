//! Rule-based email sorting.
//!
//! [`classifier::Classifier`] assigns one [`domain::Category`] per email from
//! weighted regex hits over sender, subject and body, with spam signatures
//! taking priority over everything else. [`presentation`] turns a category into
//! badge metadata. The remaining modules make up the `inbox-sorter` batch tool.

pub mod app;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod inbox;
pub mod infrastructure;
pub mod presentation;
pub mod tasks;

pub use classifier::Classifier;
pub use domain::{category_info, Category, CategoryInfo, EmailRecord};
pub use presentation::{color_classes, Badge, ColorClasses};
