//! Conversations by id, for hosting behind a request/response boundary.

use std::collections::BTreeMap;

use talentscout_core::{Language, TurnRequest, TurnResponse};

use crate::conversation::{Conversation, ScreeningRuntime};
use crate::RuntimeError;

/// Owns a runtime and the conversations it serves.
///
/// A request for an unknown session id opens a conversation in the default
/// language, the way a chat page starts a session on first message.
///
/// Ended conversations are kept so later turns get
/// [`RuntimeError::ConversationEnded`] instead of a fresh interview. The
/// host must call [`close`](Self::close) to release them.
pub struct ConversationRegistry {
    runtime: ScreeningRuntime,
    default_language: Language,
    conversations: BTreeMap<String, Conversation>,
}

impl ConversationRegistry {
    pub fn new(runtime: ScreeningRuntime) -> Self {
        Self {
            runtime,
            default_language: Language::default(),
            conversations: BTreeMap::new(),
        }
    }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn runtime(&self) -> &ScreeningRuntime {
        &self.runtime
    }

    /// Open a conversation with an explicit display language.
    pub fn open(&mut self, id: impl Into<String>, language: Language) -> Result<(), RuntimeError> {
        let id = id.into();
        if self.conversations.contains_key(&id) {
            return Err(RuntimeError::DuplicateConversation(id));
        }

        let conversation = self.runtime.start(id.clone(), language)?;
        self.conversations.insert(id, conversation);
        Ok(())
    }

    /// Route a turn to its conversation. Check `done` on the response and
    /// call [`close`](Self::close) once the transcript has been exported.
    pub async fn handle(&mut self, request: TurnRequest) -> Result<TurnResponse, RuntimeError> {
        if !self.conversations.contains_key(&request.session_id) {
            self.open(request.session_id.clone(), self.default_language)?;
        }

        let conversation = self
            .conversations
            .get_mut(&request.session_id)
            .ok_or_else(|| RuntimeError::UnknownConversation(request.session_id.clone()))?;

        self.runtime
            .handle_turn(conversation, &request.utterance)
            .await
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Remove a conversation, returning it for export.
    pub fn close(&mut self, id: &str) -> Option<Conversation> {
        let closed = self.conversations.remove(id);
        if closed.is_some() {
            tracing::info!(conversation = id, "Conversation closed");
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentscout_core::{replies, Stage};

    fn request(id: &str, utterance: &str) -> TurnRequest {
        TurnRequest {
            session_id: id.to_string(),
            utterance: utterance.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_request_opens_conversation() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());

        let response = registry.handle(request("a", "hi")).await.unwrap();

        assert_eq!(response.reply, replies::GREETING);
        assert_eq!(response.stage, Stage::Name);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_conversations_are_isolated() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());

        registry.handle(request("a", "hi")).await.unwrap();
        registry.handle(request("a", "Ada")).await.unwrap();
        registry.handle(request("b", "hi")).await.unwrap();

        assert_eq!(registry.get("a").unwrap().session().stage(), Stage::Email);
        assert_eq!(registry.get("b").unwrap().session().stage(), Stage::Name);
    }

    #[tokio::test]
    async fn test_ended_conversation_rejects_turns() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());

        let response = registry.handle(request("a", "quit")).await.unwrap();
        assert!(response.done);

        assert!(matches!(
            registry.handle(request("a", "hi")).await,
            Err(RuntimeError::ConversationEnded(_))
        ));
    }

    #[tokio::test]
    async fn test_ended_conversation_is_held_until_closed() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());
        registry.handle(request("a", "hi")).await.unwrap();
        registry.handle(request("b", "hi")).await.unwrap();

        let response = registry.handle(request("a", "bye")).await.unwrap();
        assert!(response.done);
        assert_eq!(registry.len(), 2);

        let closed = registry.close("a").unwrap();
        assert!(closed.is_ended());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("b").is_some());
    }

    #[test]
    fn test_open_rejects_duplicates_and_unsupported_languages() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());

        registry.open("a", Language::English).unwrap();
        assert!(matches!(
            registry.open("a", Language::English),
            Err(RuntimeError::DuplicateConversation(_))
        ));
        assert!(matches!(
            registry.open("b", Language::Tamil),
            Err(RuntimeError::ProviderNotConfigured(_))
        ));
    }

    #[test]
    fn test_close_returns_conversation() {
        let mut registry = ConversationRegistry::new(ScreeningRuntime::builder().build());
        registry.open("a", Language::English).unwrap();

        let closed = registry.close("a").unwrap();
        assert_eq!(closed.id(), "a");
        assert!(registry.is_empty());
        assert!(registry.close("a").is_none());
    }
}
