pub mod engine;
pub mod patterns;
pub mod spam;

pub use engine::{Classifier, THRESHOLD};
pub use patterns::{
    builtin, warm_up, ClassificationPattern, PatternError, PatternLibrary, RuleTable,
};
