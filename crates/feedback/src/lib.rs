pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use gemini::GeminiClient;
pub use parser::{NO_FEEDBACK, NO_SUGGESTIONS, extract_section, extract_suggestions, parse_feedback};
pub use schema::Feedback;

use anyhow::Result;
use tracing::warn;

pub struct Analyzer {
    client: GeminiClient,
}

impl Analyzer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Run one model call over the clip and parse the reply into structured feedback.
    pub async fn analyze(&self, media: &[u8], mime_type: &str) -> Result<Feedback> {
        let prompt = prompt::build_feedback_prompt();
        let reply = self.client.generate(&prompt, media, mime_type).await?;
        parser::parse_feedback(&reply)
    }

    /// Analyze with retries. The parser is deterministic, so only the model
    /// call is re-issued when a reply comes back malformed.
    pub async fn analyze_with_retry(
        &self,
        media: &[u8],
        mime_type: &str,
        max_retries: usize,
    ) -> Result<Feedback> {
        let mut attempt = 0;

        loop {
            match self.analyze(media, mime_type).await {
                Ok(feedback) => return Ok(feedback),
                Err(e) if attempt < max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries,
                        error = %e,
                        "analysis attempt failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
