use regex::Regex;

pub fn build_haystack(subject: &str, content: &str) -> String {
    let mut haystack = String::with_capacity(subject.len() + content.len() + 1);
    haystack.push_str(subject);
    haystack.push(' ');
    haystack.push_str(content);
    haystack.to_lowercase()
}

/// Returns the first signature that hits `subject + " " + content`.
pub fn find_signature<'a>(signatures: &'a [Regex], subject: &str, content: &str) -> Option<&'a Regex> {
    let haystack = build_haystack(subject, content);
    signatures.iter().find(|re| re.is_match(&haystack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::patterns::builtin;

    #[test]
    fn haystack_joins_with_space_and_lowercases() {
        assert_eq!(build_haystack("Hello", "WORLD"), "hello world");
        assert_eq!(build_haystack("", ""), " ");
    }

    #[test]
    fn signature_can_span_subject_and_body() {
        let signatures = builtin().spam_signatures();
        assert!(find_signature(signatures, "Act now", "offer is limited").is_some());
        assert!(find_signature(signatures, "Lunch?", "see you at noon").is_none());
    }

    #[test]
    fn portuguese_signatures_hit() {
        let signatures = builtin().spam_signatures();
        assert!(find_signature(signatures, "Você ganhou!", "resgate seu prêmio hoje").is_some());
    }
}
