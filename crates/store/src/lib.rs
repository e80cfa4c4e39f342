pub mod record;

pub use record::Interview;

use anyhow::{Context, Result};
use feedback::Feedback;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// File-backed interview store: uploaded clips under `uploads/`, one JSON
/// document per interview under `records/`.
pub struct InterviewStore {
    root: PathBuf,
}

impl InterviewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.records_dir().join(format!("{}.json", id))
    }

    /// Create the data directories.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(self.uploads_dir())
            .await
            .context("Failed to create uploads directory")?;
        fs::create_dir_all(self.records_dir())
            .await
            .context("Failed to create records directory")?;
        Ok(())
    }

    /// Persist an uploaded clip and return the stored file name.
    pub async fn save_video(&self, file_name: &str, data: &[u8]) -> Result<String> {
        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let path = self.uploads_dir().join(&stored_name);

        fs::write(&path, data)
            .await
            .context(format!("Failed to write video file: {:?}", path))?;

        Ok(stored_name)
    }

    /// Create a new interview record for a stored clip.
    pub async fn create(&self, video_file: &str) -> Result<Interview> {
        let interview = Interview::new(video_file.to_string());
        self.write_record(&interview).await?;
        Ok(interview)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Interview>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .await
            .context(format!("Failed to read record: {:?}", path))?;
        let interview =
            serde_json::from_str(&json).context(format!("Failed to parse record: {:?}", path))?;

        Ok(Some(interview))
    }

    /// Attach feedback to an existing record and persist it.
    pub async fn set_feedback(&self, id: &str, feedback: Feedback) -> Result<Interview> {
        let mut interview = self
            .get(id)
            .await?
            .context(format!("Interview not found: {}", id))?;

        interview.feedback = Some(feedback);
        self.write_record(&interview).await?;

        Ok(interview)
    }

    /// Read the clip bytes for a record.
    pub async fn read_video(&self, interview: &Interview) -> Result<Vec<u8>> {
        let path = self.uploads_dir().join(&interview.video_file);
        if !path.exists() {
            anyhow::bail!("Video file not found: {:?}", path);
        }

        fs::read(&path)
            .await
            .context(format!("Failed to read video file: {:?}", path))
    }

    /// All interviews, newest first.
    pub async fn history(&self) -> Result<Vec<Interview>> {
        let mut interviews = Vec::new();

        let mut entries = fs::read_dir(self.records_dir())
            .await
            .context("Failed to read records directory")?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let json = fs::read_to_string(&path)
                .await
                .context(format!("Failed to read record: {:?}", path))?;
            let interview: Interview = serde_json::from_str(&json)
                .context(format!("Failed to parse record: {:?}", path))?;
            interviews.push(interview);
        }

        interviews.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        Ok(interviews)
    }

    /// Delete all interview records. Stored clips are left on disk.
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;

        let mut entries = fs::read_dir(self.records_dir())
            .await
            .context("Failed to read records directory")?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            fs::remove_file(&path)
                .await
                .context(format!("Failed to delete record: {:?}", path))?;
            removed += 1;
        }

        Ok(removed)
    }

    async fn write_record(&self, interview: &Interview) -> Result<()> {
        let path = self.record_path(&interview.id);
        let json =
            serde_json::to_string_pretty(interview).context("Failed to serialize record")?;

        fs::write(&path, json)
            .await
            .context(format!("Failed to write record: {:?}", path))?;

        Ok(())
    }
}

/// Keep file names shell- and URL-safe; anything unexpected becomes a dash.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("recording")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "recording".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback::parser::{NO_FEEDBACK, NO_SUGGESTIONS};

    fn test_feedback() -> Feedback {
        Feedback {
            tone: "Confident".to_string(),
            clarity: "Clear".to_string(),
            content: "Relevant".to_string(),
            suggestions: vec!["Slow down".to_string()],
        }
    }

    async fn new_test_store(dir: &tempfile::TempDir) -> InterviewStore {
        let store = InterviewStore::new(dir.path());
        store.init().await.expect("store should initialize");
        store
    }

    #[tokio::test]
    async fn test_save_video_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        let stored = store.save_video("take one.webm", b"clip bytes").await.unwrap();
        assert!(stored.ends_with("take-one.webm"));

        let interview = store.create(&stored).await.unwrap();
        let bytes = store.read_video(&interview).await.unwrap();
        assert_eq!(bytes, b"clip bytes");
    }

    #[tokio::test]
    async fn test_read_video_fails_when_clip_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        let interview = store.create("gone.webm").await.unwrap();
        assert!(store.read_video(&interview).await.is_err());
    }

    #[tokio::test]
    async fn test_record_roundtrip_with_feedback() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        let interview = store.create("clip.webm").await.unwrap();
        assert!(interview.feedback.is_none());

        let updated = store.set_feedback(&interview.id, test_feedback()).await.unwrap();
        assert_eq!(updated.feedback.as_ref().unwrap().tone, "Confident");

        let loaded = store.get(&interview.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, interview.id);
        assert_eq!(loaded.feedback.unwrap().suggestions, vec!["Slow down"]);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        assert!(store.get("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_clear_empties_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        let first = store.create("first.webm").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create("second.webm").await.unwrap();

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);

        let removed = store.clear().await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sentinel_feedback_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = new_test_store(&dir).await;

        let interview = store.create("clip.webm").await.unwrap();
        let sentinel = Feedback {
            tone: NO_FEEDBACK.to_string(),
            clarity: NO_FEEDBACK.to_string(),
            content: NO_FEEDBACK.to_string(),
            suggestions: vec![NO_SUGGESTIONS.to_string()],
        };

        store.set_feedback(&interview.id, sentinel.clone()).await.unwrap();
        let loaded = store.get(&interview.id).await.unwrap().unwrap();
        assert_eq!(loaded.feedback, Some(sentinel));
    }
}
