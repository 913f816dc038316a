pub mod category;
pub mod email;
pub mod types;

pub use category::{category_info, Category, CategoryInfo, UnknownCategory};
pub use email::EmailRecord;
pub use types::{Classification, ClassificationReason, QueueSnapshot};
