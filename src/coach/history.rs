// ABOUTME: Bounded per-user conversation history used as prompt context
// ABOUTME: Entries are JSON role/content records; store failures are logged, never raised
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use crate::database::HistoryStore;
use crate::llm::MessageRole;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::warn;

/// One remembered turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who said it
    pub role: MessageRole,
    /// What was said
    pub content: String,
}

impl HistoryEntry {
    /// Entry for something the user wrote
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Entry for a coach reply
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Stored string form
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.content.clone())
    }

    /// Decode a stored string; anything that is not an entry record is a user line
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self::user(raw))
    }
}

/// Keep only the `limit` most recent entries
pub fn trim_to_recent<T>(entries: &mut Vec<T>, limit: usize) {
    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
}

/// Render entries as prompt lines, oldest first
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let speaker = match entry.role {
            MessageRole::Assistant => "Coach",
            MessageRole::User | MessageRole::System => "User",
        };
        let _ = writeln!(out, "{speaker}: {}", entry.content);
    }
    out
}

/// History store wrapper that bounds and decodes entries
#[derive(Clone)]
pub struct ConversationHistory {
    store: Arc<dyn HistoryStore>,
    limit: usize,
}

impl ConversationHistory {
    /// Wrap a store, keeping at most `limit` entries per user
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    /// Entries kept per user
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Current entries, empty when the store fails
    pub async fn load(&self, user_id: &str) -> Vec<HistoryEntry> {
        self.load_raw(user_id)
            .await
            .iter()
            .map(|raw| HistoryEntry::decode(raw))
            .collect()
    }

    /// Append one entry, trim, persist, and return the trimmed entries
    ///
    /// A failed read starts from empty and a failed write is only logged,
    /// so the caller always gets a usable history.
    pub async fn append(&self, user_id: &str, entry: &HistoryEntry) -> Vec<HistoryEntry> {
        let mut raw = self.load_raw(user_id).await;
        raw.push(entry.encode());
        trim_to_recent(&mut raw, self.limit);

        if let Err(e) = self.store.put_history(user_id, &raw).await {
            warn!(user_id, error = %e, "Failed to persist conversation history");
        }

        raw.iter().map(|r| HistoryEntry::decode(r)).collect()
    }

    async fn load_raw(&self, user_id: &str) -> Vec<String> {
        match self.store.get_history(user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to load conversation history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_plain_string_decodes_as_user() {
        let entry = HistoryEntry::decode("did 3x10 squats");
        assert_eq!(entry, HistoryEntry::user("did 3x10 squats"));
    }

    #[test]
    fn test_encode_decode_preserves_role() {
        let entry = HistoryEntry::assistant("Logged!");
        assert_eq!(HistoryEntry::decode(&entry.encode()), entry);
    }

    #[test]
    fn test_trim_keeps_most_recent() {
        let mut entries: Vec<u32> = (1..=7).collect();
        trim_to_recent(&mut entries, 5);
        assert_eq!(entries, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_render_history_labels_speakers() {
        let rendered = render_history(&[HistoryEntry::user("hi"), HistoryEntry::assistant("hey")]);
        assert_eq!(rendered, "User: hi\nCoach: hey\n");
    }
}
