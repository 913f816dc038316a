use crate::domain::{Category, Classification, ClassificationReason, EmailRecord};

use super::{
    patterns::{builtin, ClassificationPattern, PatternLibrary},
    spam::find_signature,
};

pub const SENDER_WEIGHT: u32 = 3;
pub const SUBJECT_WEIGHT: u32 = 2;
pub const CONTENT_WEIGHT: u32 = 1;
pub const THRESHOLD: u32 = 2;

/// Rule-based classifier over a compiled [`PatternLibrary`].
///
/// Categories are tried in the library's scoring order and the first one whose
/// running score reaches [`THRESHOLD`] wins, so this is not a best-score
/// search. Spam signatures are checked before any scoring.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    library: &'a PatternLibrary,
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Self::new(builtin())
    }
}

impl<'a> Classifier<'a> {
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Returns the stored category when one is set, otherwise scores the text.
    pub fn classify(&self, email: &EmailRecord) -> Category {
        self.explain(email).category
    }

    pub fn explain(&self, email: &EmailRecord) -> Classification {
        match email.category {
            Some(category) => Classification::preassigned(category),
            None => self.score(email),
        }
    }

    /// Scores the text even when the record already carries a category.
    pub fn reclassify(&self, email: &EmailRecord) -> Category {
        self.score(email).category
    }

    pub fn classify_all(&self, emails: &[EmailRecord]) -> Vec<Category> {
        emails.iter().map(|email| self.classify(email)).collect()
    }

    /// Runs the spam check and the ordered scoring pass, ignoring `email.category`.
    pub fn score(&self, email: &EmailRecord) -> Classification {
        if let Some(signature) =
            find_signature(self.library.spam_signatures(), &email.subject, &email.content)
        {
            tracing::debug!(
                target: "classifier",
                email_id = %email.id,
                signature = signature.as_str(),
                "spam signature matched"
            );
            return Classification::spam();
        }

        let sender = email.sender_address().to_lowercase();
        let subject = email.subject.to_lowercase();
        let content = email.content.to_lowercase();

        for (category, pattern) in self.library.scoring_order() {
            if let Some(score) = running_score(pattern, &sender, &subject, &content) {
                tracing::trace!(
                    target: "classifier",
                    email_id = %email.id,
                    category = %category,
                    score,
                    "threshold reached"
                );
                return Classification {
                    category,
                    score,
                    reason: ClassificationReason::Threshold,
                };
            }
        }

        Classification::fallback()
    }
}

/// Accumulates weighted hits and stops as soon as the threshold is reached.
fn running_score(
    pattern: &ClassificationPattern,
    sender: &str,
    subject: &str,
    content: &str,
) -> Option<u32> {
    let mut score = 0;

    if pattern.senders.iter().any(|re| re.is_match(sender)) {
        score += SENDER_WEIGHT;
        if score >= THRESHOLD {
            return Some(score);
        }
    }

    let hits = pattern
        .subjects
        .iter()
        .filter(|re| re.is_match(subject))
        .map(|_| SUBJECT_WEIGHT)
        .chain(
            pattern
                .content
                .iter()
                .filter(|re| re.is_match(content))
                .map(|_| CONTENT_WEIGHT),
        );
    for weight in hits {
        score += weight;
        if score >= THRESHOLD {
            return Some(score);
        }
    }

    None
}
