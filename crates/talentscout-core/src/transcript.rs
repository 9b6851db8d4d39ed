//! Append-only conversation transcript for display.
//!
//! The transcript is never consulted when deciding a transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// Ordered log of displayed messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message as typed by the candidate.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content.into());
    }

    /// Append a reply as shown to the candidate.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.entries.push(TranscriptEntry {
            role,
            content,
            recorded_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order_and_roles() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("Hello 👋");

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].role, Role::User);
        assert_eq!(transcript.entries()[1].content, "Hello 👋");
        assert!(transcript.entries()[0].recorded_at <= transcript.entries()[1].recorded_at);
    }

    #[test]
    fn test_serializes_as_list() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");

        let json = serde_json::to_value(&transcript).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["content"], "hi");
    }
}
