//! Training catalogue shown on the side screen

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl std::fmt::Display for TopicLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicLevel::Beginner => write!(f, "Beginner"),
            TopicLevel::Intermediate => write!(f, "Intermediate"),
            TopicLevel::Advanced => write!(f, "Advanced"),
            TopicLevel::Expert => write!(f, "Expert"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingTopic {
    pub title: String,
    pub description: String,
    pub available: bool,
    pub level: TopicLevel,
}

impl TrainingTopic {
    fn new(title: &str, description: &str, available: bool, level: TopicLevel) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            available,
            level,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.available {
            "Available"
        } else {
            "Coming Soon"
        }
    }

    /// What happens when the player tries to open the topic.
    pub fn launch_message(&self) -> String {
        if self.available {
            format!("{} module will be available in future updates!", self.title)
        } else {
            format!("{} is not available yet.", self.title)
        }
    }
}

pub fn training_topics() -> Vec<TrainingTopic> {
    vec![
        TrainingTopic::new(
            "Threat Detection Basics",
            "Learn to identify common security threats in data requests",
            true,
            TopicLevel::Beginner,
        ),
        TrainingTopic::new(
            "Advanced Redaction Techniques",
            "Master the art of sensitive data redaction",
            true,
            TopicLevel::Intermediate,
        ),
        TrainingTopic::new(
            "Malicious Content Analysis",
            "Deep dive into identifying malicious intent",
            false,
            TopicLevel::Advanced,
        ),
        TrainingTopic::new(
            "Real-time Decision Making",
            "Build speed and accuracy under pressure",
            false,
            TopicLevel::Expert,
        ),
    ]
}
