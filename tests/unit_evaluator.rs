// Unit tests for the round evaluator: the allow/block truth table, failure
// reasons, the redaction sub-decision and which reasons feed the FP/FN tallies.

use guardrail_ops::data::{Assessment, ErrorTally, Risk};
use guardrail_ops::game::evaluator::{
    evaluate, judge, judge_redaction, reason_for_incorrect, Action, FailureReason,
    RedactionChoice, Verdict,
};

fn assessment(malicious: bool, redaction_required: bool) -> Assessment {
    Assessment {
        malicious,
        risk: if malicious { Risk::High } else { Risk::Low },
        redaction_required,
    }
}

// ============================================================
// Truth table
// ============================================================

#[test]
fn allow_is_correct_only_for_clean_requests() {
    assert!(evaluate(Action::Allow, &assessment(false, false)));
    assert!(!evaluate(Action::Allow, &assessment(false, true)));
    assert!(!evaluate(Action::Allow, &assessment(true, false)));
    assert!(!evaluate(Action::Allow, &assessment(true, true)));
}

#[test]
fn block_is_correct_only_for_malicious_requests() {
    assert!(evaluate(Action::Block, &assessment(true, false)));
    assert!(evaluate(Action::Block, &assessment(true, true)));
    assert!(!evaluate(Action::Block, &assessment(false, false)));
    assert!(!evaluate(Action::Block, &assessment(false, true)));
}

#[test]
fn redact_is_never_decided_directly() {
    assert!(!evaluate(Action::Redact, &assessment(false, true)));
}

// ============================================================
// Failure reasons
// ============================================================

#[test]
fn allowing_malicious_content_is_a_false_negative() {
    let reason = reason_for_incorrect(Action::Allow, &assessment(true, false));
    assert_eq!(reason, FailureReason::AllowedMalicious);
    assert_eq!(reason.error_tally(), Some(ErrorTally::FalseNegative));
}

#[test]
fn allowing_sensitive_data_is_not_a_tallied_error() {
    let reason = reason_for_incorrect(Action::Allow, &assessment(false, true));
    assert_eq!(reason, FailureReason::UnredactedSensitiveData);
    assert_eq!(reason.error_tally(), None);
}

#[test]
fn blocking_safe_content_is_a_false_positive() {
    let reason = reason_for_incorrect(Action::Block, &assessment(false, false));
    assert_eq!(reason, FailureReason::BlockedSafeContent);
    assert_eq!(reason.error_tally(), Some(ErrorTally::FalsePositive));
}

#[test]
fn malicious_takes_precedence_over_redaction_when_allowing() {
    let reason = reason_for_incorrect(Action::Allow, &assessment(true, true));
    assert_eq!(reason, FailureReason::AllowedMalicious);
}

#[test]
fn time_and_redaction_reasons_touch_no_tally() {
    for reason in [
        FailureReason::TimeExpired,
        FailureReason::ShouldHaveRedacted,
        FailureReason::UnnecessaryRedaction,
        FailureReason::GenericIncorrect,
    ] {
        assert_eq!(reason.error_tally(), None, "{reason:?}");
    }
}

#[test]
fn judge_wraps_the_reason() {
    assert_eq!(judge(Action::Block, &assessment(true, false)), Verdict::Correct);
    assert_eq!(
        judge(Action::Block, &assessment(false, false)),
        Verdict::Incorrect(FailureReason::BlockedSafeContent)
    );
}

// ============================================================
// Redaction confirmation
// ============================================================

#[test]
fn confirming_redaction_when_required_is_correct() {
    let verdict = judge_redaction(RedactionChoice::ConfirmRedaction, &assessment(false, true));
    assert!(verdict.is_correct());
}

#[test]
fn confirming_redaction_when_not_required_is_unnecessary() {
    let verdict = judge_redaction(RedactionChoice::ConfirmRedaction, &assessment(false, false));
    assert_eq!(verdict.reason(), Some(FailureReason::UnnecessaryRedaction));
}

#[test]
fn allowing_original_when_redaction_required_is_wrong() {
    let verdict = judge_redaction(RedactionChoice::AllowOriginal, &assessment(false, true));
    assert_eq!(verdict.reason(), Some(FailureReason::ShouldHaveRedacted));
}

#[test]
fn allowing_original_when_nothing_to_redact_is_correct() {
    let verdict = judge_redaction(RedactionChoice::AllowOriginal, &assessment(false, false));
    assert_eq!(verdict, Verdict::Correct);
}
