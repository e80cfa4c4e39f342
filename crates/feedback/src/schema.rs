use serde::{Deserialize, Serialize};

/// Structured coaching feedback parsed from a model's free-text reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub tone: String,
    pub clarity: String,
    pub content: String,
    pub suggestions: Vec<String>,
}
