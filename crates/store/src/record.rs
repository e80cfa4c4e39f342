use chrono::{DateTime, Utc};
use feedback::Feedback;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded interview: the stored clip plus the feedback, once analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub video_file: String,
    pub feedback: Option<Feedback>,
    pub recorded_at: DateTime<Utc>,
}

impl Interview {
    pub fn new(video_file: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            video_file,
            feedback: None,
            recorded_at: Utc::now(),
        }
    }
}
