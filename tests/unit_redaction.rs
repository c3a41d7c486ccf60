// Unit tests for the redaction engine: per-tag substitutions, ordering over
// partially redacted text, idempotence and the confidence rating.

use guardrail_ops::data::{default_fixtures, Confidence, Detection, ThreatTag};
use guardrail_ops::game::redaction::{confidence, redact, RedactionPreview};

// ============================================================
// Substitutions
// ============================================================

#[test]
fn email_and_api_key_are_masked() {
    let fixtures = default_fixtures();
    let request = &fixtures[1];
    let redacted = redact(&request.content, &request.detected);
    assert_eq!(
        redacted,
        "Here is my contact: [EMAIL] and my API key: [API_KEY]"
    );
}

#[test]
fn phone_numbers_need_the_dashed_form() {
    let detections = [Detection::new(ThreatTag::Phone)];
    assert_eq!(redact("call 555-123-4567 now", &detections), "call [PHONE] now");
    assert_eq!(redact("call 5551234567 now", &detections), "call 5551234567 now");
}

#[test]
fn long_alphanumeric_runs_become_tokens() {
    let detections = [Detection::new(ThreatTag::Token)];
    assert_eq!(
        redact("bearer abcdefghij0123456789XYZ ok", &detections),
        "bearer [TOKEN] ok"
    );
    assert_eq!(redact("short abc123", &detections), "short abc123");
}

#[test]
fn every_match_is_replaced() {
    let detections = [Detection::with_count(ThreatTag::Email, 2)];
    assert_eq!(
        redact("a@x.io and b@y.org", &detections),
        "[EMAIL] and [EMAIL]"
    );
}

#[test]
fn tags_without_a_match_change_nothing() {
    let detections = [Detection::new(ThreatTag::Email)];
    assert_eq!(redact("no address here", &detections), "no address here");
}

#[test]
fn no_detections_returns_the_input() {
    assert_eq!(redact("hello", &[]), "hello");
}

#[test]
fn character_classes_are_ascii_only() {
    let token = [Detection::new(ThreatTag::Token)];
    assert_eq!(redact("cléABCDEFGHIJKLMNOPQRSTUVWX", &token), "clé[TOKEN]");

    let email = [Detection::new(ThreatTag::Email)];
    assert_eq!(redact("josé@exämple.com", &email), "josé@exämple.com");

    let phone = [Detection::new(ThreatTag::Phone)];
    assert_eq!(redact("٥٥٥-١٢٣-٤٥٦٧", &phone), "٥٥٥-١٢٣-٤٥٦٧");
}

// ============================================================
// Ordering and idempotence
// ============================================================

#[test]
fn earlier_substitutions_shape_later_ones() {
    // A long local part is also a token; whichever runs first wins.
    let content = "mail averyveryverylongusername@example.com";
    let email_first = [Detection::new(ThreatTag::Email), Detection::new(ThreatTag::Token)];
    let token_first = [Detection::new(ThreatTag::Token), Detection::new(ThreatTag::Email)];

    assert_eq!(redact(content, &email_first), "mail [EMAIL]");
    assert_eq!(redact(content, &token_first), "mail [TOKEN]@example.com");
}

#[test]
fn api_keys_are_not_tokens() {
    // The underscore keeps the key body from starting a word boundary.
    let detections = [Detection::new(ThreatTag::Token)];
    let content = "key sk_test_4eC39HqLyjWDarjtT1zdp7dc";
    assert_eq!(redact(content, &detections), content);
}

#[test]
fn redacting_twice_is_the_same_as_once() {
    for request in default_fixtures() {
        let once = redact(&request.content, &request.detected);
        let twice = redact(&once, &request.detected);
        assert_eq!(once, twice, "request {}", request.id);
    }
}

// ============================================================
// Confidence
// ============================================================

#[test]
fn confidence_follows_detection_count() {
    let one = vec![Detection::new(ThreatTag::Email)];
    let three = vec![
        Detection::new(ThreatTag::Email),
        Detection::new(ThreatTag::Phone),
        Detection::new(ThreatTag::Token),
    ];
    assert_eq!(confidence(&[]), Confidence::Low);
    assert_eq!(confidence(&one), Confidence::Medium);
    assert_eq!(confidence(&three[..2]), Confidence::Medium);
    assert_eq!(confidence(&three), Confidence::High);
}

#[test]
fn preview_lists_chip_labels() {
    let detections = [
        Detection::with_count(ThreatTag::Email, 3),
        Detection::new(ThreatTag::Phone),
    ];
    let preview = RedactionPreview::build("x", &detections);
    assert_eq!(preview.chips, vec!["EMAIL ×3".to_string(), "PHONE".to_string()]);
    assert!(!preview.changed());
}
