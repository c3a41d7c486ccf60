//! Round evaluation
//!
//! Decides whether a player's call matches the request's ground truth and,
//! when it does not, why.

use crate::data::{Assessment, ErrorTally};
use serde::{Deserialize, Serialize};

/// A decision the player can submit directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Allow,
    Redact,
    Block,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Allow => "ALLOW ○",
            Action::Redact => "REDACT ◊",
            Action::Block => "BLOCK ⊗",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::Allow => "Allow Request to Proceed",
            Action::Redact => "Remove Sensitive Data",
            Action::Block => "Block Malicious Request",
        }
    }
}

/// The two ways out of the redaction confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedactionChoice {
    AllowOriginal,
    ConfirmRedaction,
}

/// Why a decision was scored as wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    AllowedMalicious,
    UnredactedSensitiveData,
    BlockedSafeContent,
    GenericIncorrect,
    TimeExpired,
    ShouldHaveRedacted,
    UnnecessaryRedaction,
}

impl FailureReason {
    /// Only the two allow/block misreads feed the error tallies.
    pub fn error_tally(&self) -> Option<ErrorTally> {
        match self {
            FailureReason::BlockedSafeContent => Some(ErrorTally::FalsePositive),
            FailureReason::AllowedMalicious => Some(ErrorTally::FalseNegative),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::AllowedMalicious => "Allowed malicious content",
            FailureReason::UnredactedSensitiveData => "Sensitive data not redacted",
            FailureReason::BlockedSafeContent => "Blocked safe content",
            FailureReason::GenericIncorrect => "Incorrect decision",
            FailureReason::TimeExpired => "Time expired",
            FailureReason::ShouldHaveRedacted => "Should have redacted",
            FailureReason::UnnecessaryRedaction => "Unnecessary redaction",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Outcome of one resolved round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect(FailureReason),
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            Verdict::Correct => None,
            Verdict::Incorrect(reason) => Some(*reason),
        }
    }
}

/// Whether a direct allow/block is right. `Redact` is never decided here; it
/// goes through the confirmation first.
pub fn evaluate(action: Action, assessment: &Assessment) -> bool {
    match action {
        Action::Allow => !assessment.malicious && !assessment.redaction_required,
        Action::Block => assessment.malicious,
        Action::Redact => false,
    }
}

pub fn reason_for_incorrect(action: Action, assessment: &Assessment) -> FailureReason {
    match action {
        Action::Allow if assessment.malicious => FailureReason::AllowedMalicious,
        Action::Allow if assessment.redaction_required => FailureReason::UnredactedSensitiveData,
        Action::Block if !assessment.malicious => FailureReason::BlockedSafeContent,
        _ => FailureReason::GenericIncorrect,
    }
}

/// Full verdict for a direct allow/block.
pub fn judge(action: Action, assessment: &Assessment) -> Verdict {
    if evaluate(action, assessment) {
        Verdict::Correct
    } else {
        Verdict::Incorrect(reason_for_incorrect(action, assessment))
    }
}

/// Verdict for a choice made in the redaction confirmation.
pub fn judge_redaction(choice: RedactionChoice, assessment: &Assessment) -> Verdict {
    match choice {
        RedactionChoice::AllowOriginal if !assessment.redaction_required => Verdict::Correct,
        RedactionChoice::AllowOriginal => Verdict::Incorrect(FailureReason::ShouldHaveRedacted),
        RedactionChoice::ConfirmRedaction if assessment.redaction_required => Verdict::Correct,
        RedactionChoice::ConfirmRedaction => {
            Verdict::Incorrect(FailureReason::UnnecessaryRedaction)
        }
    }
}
