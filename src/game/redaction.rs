//! Redaction preview
//!
//! Masks sensitive substrings according to the detections attached to a
//! request. Substitutions run in detection order over the progressively
//! redacted text, so the order of `detected` is observable in the output.

use crate::data::{Confidence, Detection, ThreatTag};
use regex::Regex;
use std::sync::LazyLock;

// Word, digit and boundary classes are ASCII-only.

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:[\w.-]+@[\w.-]+\.\w+)").expect("email pattern compiles"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b\d{3}-\d{3}-\d{4}\b)").expect("phone pattern compiles"));

static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\bsk_test_\w+)").expect("api key pattern compiles"));

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b[A-Za-z0-9]{20,}\b)").expect("token pattern compiles"));

/// Pattern and placeholder for a tag, or `None` when the tag is not
/// something that gets masked (TOXICITY, XSS, SQLI, CMDI).
fn substitution(tag: ThreatTag) -> Option<(&'static Regex, &'static str)> {
    match tag {
        ThreatTag::Email => Some((&*EMAIL_PATTERN, "[EMAIL]")),
        ThreatTag::Phone => Some((&*PHONE_PATTERN, "[PHONE]")),
        ThreatTag::ApiKey => Some((&*API_KEY_PATTERN, "[API_KEY]")),
        ThreatTag::Token => Some((&*TOKEN_PATTERN, "[TOKEN]")),
        ThreatTag::Toxicity | ThreatTag::Xss | ThreatTag::Sqli | ThreatTag::Cmdi => None,
    }
}

/// Apply every detection's substitution to `content`, in order.
pub fn redact(content: &str, detections: &[Detection]) -> String {
    detections
        .iter()
        .filter_map(|d| substitution(d.tag))
        .fold(content.to_string(), |text, (pattern, placeholder)| {
            pattern.replace_all(&text, placeholder).into_owned()
        })
}

pub fn confidence(detections: &[Detection]) -> Confidence {
    Confidence::from_detection_count(detections.len())
}

/// Original and masked text side by side, as shown in the confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionPreview {
    pub original: String,
    pub redacted: String,
    pub confidence: Confidence,
    pub chips: Vec<String>,
}

impl RedactionPreview {
    pub fn build(content: &str, detections: &[Detection]) -> Self {
        Self {
            original: content.to_string(),
            redacted: redact(content, detections),
            confidence: confidence(detections),
            chips: detections.iter().map(Detection::chip_label).collect(),
        }
    }

    pub fn changed(&self) -> bool {
        self.original != self.redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_tags_leave_text_alone() {
        let content = "<script>alert(1)</script>; DROP TABLE users;";
        let detections = [Detection::new(ThreatTag::Xss), Detection::new(ThreatTag::Sqli)];
        assert_eq!(redact(content, &detections), content);
    }

    #[test]
    fn preview_reports_change() {
        let preview = RedactionPreview::build(
            "call 555-123-4567",
            &[Detection::with_count(ThreatTag::Phone, 1)],
        );
        assert_eq!(preview.redacted, "call [PHONE]");
        assert!(preview.changed());
        assert_eq!(preview.confidence, Confidence::Medium);
    }
}
