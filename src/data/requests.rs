//! Inbound requests and the fixture set that feeds each wave

use super::Risk;
use crate::{GameError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Closed taxonomy of threats the upstream detectors can flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatTag {
    Toxicity,
    Email,
    Phone,
    ApiKey,
    Token,
    Xss,
    Sqli,
    Cmdi,
}

impl ThreatTag {
    /// Whether the tag names sensitive data that can be masked in place.
    /// The rest are block-worthy and only ever shown as chips.
    pub fn is_redactable(&self) -> bool {
        matches!(
            self,
            ThreatTag::Email | ThreatTag::Phone | ThreatTag::ApiKey | ThreatTag::Token
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            ThreatTag::Toxicity => "Abusive or hostile language",
            ThreatTag::Email => "Email address",
            ThreatTag::Phone => "Phone number",
            ThreatTag::ApiKey => "API key",
            ThreatTag::Token => "Long opaque token",
            ThreatTag::Xss => "Cross-site scripting payload",
            ThreatTag::Sqli => "SQL injection",
            ThreatTag::Cmdi => "Command injection",
        }
    }
}

impl std::fmt::Display for ThreatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatTag::Toxicity => write!(f, "TOXICITY"),
            ThreatTag::Email => write!(f, "EMAIL"),
            ThreatTag::Phone => write!(f, "PHONE"),
            ThreatTag::ApiKey => write!(f, "API_KEY"),
            ThreatTag::Token => write!(f, "TOKEN"),
            ThreatTag::Xss => write!(f, "XSS"),
            ThreatTag::Sqli => write!(f, "SQLI"),
            ThreatTag::Cmdi => write!(f, "CMDI"),
        }
    }
}

/// One detector hit on a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub tag: ThreatTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Detection {
    pub fn new(tag: ThreatTag) -> Self {
        Self { tag, count: None }
    }

    pub fn with_count(tag: ThreatTag, count: u32) -> Self {
        Self {
            tag,
            count: Some(count),
        }
    }

    /// Occurrences, singular when the detector did not say.
    pub fn occurrences(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// Chip label: `EMAIL`, or `EMAIL ×3` for repeated hits.
    pub fn chip_label(&self) -> String {
        match self.count {
            Some(n) if n > 1 => format!("{} ×{}", self.tag, n),
            _ => self.tag.to_string(),
        }
    }
}

/// Ground truth authored alongside the request. Never derived from `detected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub malicious: bool,
    pub risk: Risk,
    pub redaction_required: bool,
}

/// A simulated inbound data request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub user: Option<String>,
    pub content: String,
    #[serde(default)]
    pub detected: Vec<Detection>,
    pub assessment: Assessment,
}

impl Request {
    pub fn brief(&self) -> String {
        format!(
            "#{} from {} ({}): {} detection(s)",
            self.id,
            self.source,
            self.user.as_deref().unwrap_or("anonymous"),
            self.detected.len()
        )
    }
}

/// The built-in request stream, in wave order.
pub fn default_fixtures() -> Vec<Request> {
    vec![
        Request {
            id: "1".to_string(),
            source: "WikiSearch".to_string(),
            user: Some("Fireb".to_string()),
            content: "What are the system requirements?".to_string(),
            detected: vec![],
            assessment: Assessment {
                malicious: false,
                risk: Risk::Low,
                redaction_required: false,
            },
        },
        Request {
            id: "2".to_string(),
            source: "DataShare".to_string(),
            user: Some("DevUser".to_string()),
            content: "Here is my contact: john.doe@company.com and my API key: sk_test_4eC39HqLyjWDarjtT1zdp7dc".to_string(),
            detected: vec![
                Detection::with_count(ThreatTag::Email, 1),
                Detection::with_count(ThreatTag::ApiKey, 1),
            ],
            assessment: Assessment {
                malicious: false,
                risk: Risk::Medium,
                redaction_required: true,
            },
        },
        Request {
            id: "3".to_string(),
            source: "UserInput".to_string(),
            user: Some("TestUser".to_string()),
            content: "Please help me with my account setup. My phone is 555-123-4567".to_string(),
            detected: vec![Detection::with_count(ThreatTag::Phone, 1)],
            assessment: Assessment {
                malicious: false,
                risk: Risk::Low,
                redaction_required: true,
            },
        },
        Request {
            id: "4".to_string(),
            source: "APIRequest".to_string(),
            user: Some("ScriptKid".to_string()),
            content: "SELECT * FROM users WHERE admin=1; DROP TABLE users;".to_string(),
            detected: vec![Detection::new(ThreatTag::Sqli)],
            assessment: Assessment {
                malicious: true,
                risk: Risk::High,
                redaction_required: false,
            },
        },
        Request {
            id: "5".to_string(),
            source: "FormSubmit".to_string(),
            user: Some("RegularUser".to_string()),
            content: "Thank you for the great service! Everything works perfectly.".to_string(),
            detected: vec![],
            assessment: Assessment {
                malicious: false,
                risk: Risk::Low,
                redaction_required: false,
            },
        },
    ]
}

/// Load a fixture set from a JSON array of requests.
pub fn load_fixtures(path: &Path) -> Result<Vec<Request>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixtures from {}", path.display()))?;
    let fixtures: Vec<Request> = serde_json::from_str(&raw)
        .map_err(|e| GameError::InvalidFixtures(format!("{}: {}", path.display(), e)))?;
    validate_fixtures(&fixtures)?;
    tracing::info!(path = %path.display(), count = fixtures.len(), "loaded request fixtures");
    Ok(fixtures)
}

/// A fixture set must be non-empty and its ids unique.
pub fn validate_fixtures(fixtures: &[Request]) -> Result<()> {
    if fixtures.is_empty() {
        return Err(GameError::InvalidFixtures("fixture set is empty".to_string()).into());
    }
    let mut seen = HashSet::new();
    for request in fixtures {
        if !seen.insert(request.id.as_str()) {
            return Err(
                GameError::InvalidFixtures(format!("duplicate request id {}", request.id)).into(),
            );
        }
    }
    Ok(())
}
