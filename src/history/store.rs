use crate::core::error::AssistantError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const TITLE_CHARS: usize = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created: DateTime<Local>,
    pub messages: Vec<StoredMessage>,
}

/// Conversations kept in a single JSON object keyed by id.
pub struct ConversationStore {
    path: PathBuf,
    conversations: BTreeMap<String, Conversation>,
}

fn title_from(message: &str) -> String {
    let message = message.trim();
    if message.chars().count() > TITLE_CHARS {
        let head: String = message.chars().take(TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

impl ConversationStore {
    /// A missing file is an empty store; an unreadable one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AssistantError> {
        let path = path.into();
        let conversations = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).map_err(|e| {
                AssistantError::Storage(format!("Parse {}: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), count = conversations.len(), "opened conversation store");
        Ok(Self {
            path,
            conversations,
        })
    }

    fn save(&self) -> Result<(), AssistantError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.conversations)?)?;
        Ok(())
    }

    pub fn create_conversation(&mut self, title: &str) -> Result<String, AssistantError> {
        self.create_conversation_at(title, Local::now())
    }

    fn create_conversation_at(
        &mut self,
        title: &str,
        now: DateTime<Local>,
    ) -> Result<String, AssistantError> {
        let base = now.format("%Y%m%d_%H%M%S").to_string();
        let mut id = base.clone();
        let mut n = 2;
        while self.conversations.contains_key(&id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }

        self.conversations.insert(
            id.clone(),
            Conversation {
                id: id.clone(),
                title: title.to_string(),
                created: now,
                messages: Vec::new(),
            },
        );
        self.save()?;
        Ok(id)
    }

    /// The first user message also becomes the conversation title.
    pub fn append_message(
        &mut self,
        id: &str,
        text: &str,
        is_user: bool,
    ) -> Result<(), AssistantError> {
        let conversation = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| AssistantError::Storage(format!("No conversation with id {}", id)))?;

        let first_user_message = is_user && !conversation.messages.iter().any(|m| m.is_user);
        conversation.messages.push(StoredMessage {
            text: text.to_string(),
            is_user,
            timestamp: Local::now(),
        });
        if first_user_message {
            conversation.title = title_from(text);
        }
        self.save()
    }

    /// Newest first.
    pub fn list_conversations(&self) -> Vec<&Conversation> {
        let mut all: Vec<&Conversation> = self.conversations.values().collect();
        all.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));
        all
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Returns whether anything was removed.
    pub fn delete_conversation(&mut self, id: &str) -> Result<bool, AssistantError> {
        if self.conversations.remove(id).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, h, m, s).unwrap()
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("conversations.json")).unwrap();
        assert!(store.list_conversations().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            ConversationStore::open(&path),
            Err(AssistantError::Storage(_))
        ));
    }

    #[test]
    fn ids_are_timestamps_with_collision_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConversationStore::open(dir.path().join("c.json")).unwrap();

        let first = store.create_conversation_at("New chat", at(9, 5, 7)).unwrap();
        let second = store.create_conversation_at("New chat", at(9, 5, 7)).unwrap();
        assert_eq!(first, "20250314_090507");
        assert_eq!(second, "20250314_090507_2");
    }

    #[test]
    fn first_user_message_sets_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let mut store = ConversationStore::open(&path).unwrap();
        let id = store.create_conversation("Новий чат").unwrap();
        assert_eq!(store.get(&id).unwrap().title, "Новий чат");

        store
            .append_message(&id, "розкажи мені про історію україни коротко", true)
            .unwrap();
        store.append_message(&id, "Звісно!", false).unwrap();
        store.append_message(&id, "дякую", true).unwrap();

        let reopened = ConversationStore::open(&path).unwrap();
        let conversation = reopened.get(&id).unwrap();
        assert_eq!(conversation.title, "розкажи мені про історію ...");
        assert_eq!(conversation.messages.len(), 3);
        assert!(!conversation.messages[1].is_user);
    }

    #[test]
    fn short_title_is_kept_whole() {
        assert_eq!(title_from("  hello  "), "hello");
        assert_eq!(title_from(&"a".repeat(25)), "a".repeat(25));
    }

    #[test]
    fn list_is_newest_first_and_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let mut store = ConversationStore::open(&path).unwrap();
        let old = store.create_conversation_at("a", at(8, 0, 0)).unwrap();
        let new = store.create_conversation_at("b", at(10, 0, 0)).unwrap();

        let ids: Vec<&str> = store.list_conversations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![new.as_str(), old.as_str()]);

        assert!(store.delete_conversation(&old).unwrap());
        assert!(!store.delete_conversation(&old).unwrap());
        assert_eq!(ConversationStore::open(&path).unwrap().list_conversations().len(), 1);
    }

    #[test]
    fn append_to_unknown_conversation_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConversationStore::open(dir.path().join("c.json")).unwrap();
        assert!(store.append_message("missing", "hi", true).is_err());
    }
}
