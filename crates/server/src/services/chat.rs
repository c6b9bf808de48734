//! Per-store chat sessions.
//!
//! Each visitor gets at most one session per store, created lazily on the
//! first turn and scoped to the store's persona for the rest of the browsing
//! session. A session allows a single in-flight turn: submissions while a
//! reply streams are rejected, and a failed turn appends a fixed fallback
//! message without killing the session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use tienditas_core::{Author, Transcript};

use crate::genai::{Content, GenAiError};

/// Appended when a turn fails mid-flight; the widget stays usable.
pub const CHAT_FALLBACK: &str = "¡Uy! Algo salió mal. Por favor, intenta de nuevo.";

/// Shown when the assistant cannot be reached at all.
pub const CHAT_UNAVAILABLE: &str =
    "Lo siento, no puedo conectarme con el asistente en este momento.";

/// Errors from the chat service.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// A turn is already streaming for this session.
    #[error("another turn is already in flight")]
    Busy,

    /// The generative AI call failed.
    #[error(transparent)]
    GenAi(#[from] GenAiError),
}

/// One visitor's conversation with one store's assistant.
#[derive(Debug)]
pub struct ChatSession {
    persona: String,
    transcript: Transcript,
    next_turn: u64,
    in_flight: Option<u64>,
}

impl ChatSession {
    fn new(persona: &str) -> Self {
        Self {
            persona: persona.to_string(),
            transcript: Transcript::new(),
            next_turn: 1,
            in_flight: None,
        }
    }

    /// The fixed system persona this session was opened with.
    #[must_use]
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The visible conversation.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a turn is currently streaming.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start a turn: the user entry becomes visible immediately and the
    /// session is marked busy until [`finish_turn`](Self::finish_turn) or
    /// [`fail_turn`](Self::fail_turn).
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Busy`] while a previous turn is still streaming;
    /// the transcript is untouched.
    pub fn begin_turn(&mut self, user_text: &str) -> Result<u64, ChatError> {
        if self.in_flight.is_some() {
            return Err(ChatError::Busy);
        }
        let turn = self.next_turn;
        self.next_turn += 1;
        self.transcript.push_user(turn, user_text);
        self.in_flight = Some(turn);
        Ok(turn)
    }

    /// Append a streamed chunk of the reply for `turn`.
    pub fn append_chunk(&mut self, turn: u64, chunk: &str) {
        self.transcript.append_chunk(turn, chunk);
    }

    /// Mark a turn complete.
    pub fn finish_turn(&mut self, turn: u64) {
        if self.in_flight == Some(turn) {
            self.in_flight = None;
        }
    }

    /// Mark a turn failed: the fixed fallback message is appended and the
    /// session becomes available for another attempt.
    pub fn fail_turn(&mut self, turn: u64) {
        self.fail_turn_with(turn, CHAT_FALLBACK);
    }

    /// Like [`fail_turn`](Self::fail_turn) with a specific fallback (the
    /// could-not-connect copy for turns that never started streaming).
    pub fn fail_turn_with(&mut self, turn: u64, message: &str) {
        self.transcript.push_assistant(turn, message);
        self.finish_turn(turn);
    }

    /// The conversation history in API shape, current turn included last.
    #[must_use]
    pub fn request_contents(&self) -> Vec<Content> {
        self.transcript
            .entries()
            .iter()
            .map(|entry| match entry.author {
                Author::User => Content::user(entry.content.clone()),
                Author::Assistant => Content::model(entry.content.clone()),
            })
            .collect()
    }
}

type ChatKey = (Uuid, String);
type SharedSession = Arc<tokio::sync::Mutex<ChatSession>>;

/// All live chat sessions, keyed by (visitor, store).
///
/// The registry lock guards only lookup and insert; each session has its own
/// async lock so one streaming turn never blocks another visitor.
#[derive(Default)]
pub struct ChatRegistry {
    sessions: Mutex<HashMap<ChatKey, SharedSession>>,
}

impl ChatRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for (visitor, store), creating it lazily with the
    /// given persona on first use.
    ///
    /// # Panics
    ///
    /// Panics if the registry lock was poisoned.
    #[must_use]
    pub fn session(&self, visitor: Uuid, store_id: &str, persona: &str) -> SharedSession {
        let mut sessions = self.sessions.lock().expect("chat registry lock poisoned");
        Arc::clone(
            sessions
                .entry((visitor, store_id.to_string()))
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(ChatSession::new(persona)))),
        )
    }

    /// Get an existing session without creating one (transcript reads).
    ///
    /// # Panics
    ///
    /// Panics if the registry lock was poisoned.
    #[must_use]
    pub fn get(&self, visitor: Uuid, store_id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.lock().expect("chat registry lock poisoned");
        sessions.get(&(visitor, store_id.to_string())).map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_turn_rejects_while_busy() {
        let mut session = ChatSession::new("Eres CacaoBot.");
        let turn = session.begin_turn("hola").expect("first turn");
        assert!(session.is_busy());

        assert!(matches!(session.begin_turn("otra"), Err(ChatError::Busy)));
        // The rejected submission left no trace.
        assert_eq!(session.transcript().entries().len(), 1);

        session.finish_turn(turn);
        assert!(!session.is_busy());
        session.begin_turn("otra").expect("free again");
    }

    #[test]
    fn test_fail_turn_appends_fallback_and_frees_session() {
        let mut session = ChatSession::new("persona");
        let turn = session.begin_turn("hola").expect("turn");
        session.fail_turn(turn);

        assert!(!session.is_busy());
        assert_eq!(session.transcript().assistant_reply(turn), Some(CHAT_FALLBACK));

        // Failure is per-turn: the next attempt starts normally.
        session.begin_turn("de nuevo").expect("next turn");
    }

    #[test]
    fn test_request_contents_mirror_transcript_roles() {
        let mut session = ChatSession::new("persona");
        let turn = session.begin_turn("¿precios?").expect("turn");
        session.append_chunk(turn, "Desde S/ 2.50");
        session.finish_turn(turn);
        session.begin_turn("gracias").expect("turn 2");

        let contents = session.request_contents();
        let roles: Vec<Option<&str>> = contents.iter().map(|c| c.role.as_deref()).collect();
        assert_eq!(roles, [Some("user"), Some("model"), Some("user")]);
        assert_eq!(contents[2].text(), "gracias");
    }

    #[test]
    fn test_registry_reuses_sessions_per_visitor_and_store() {
        let registry = ChatRegistry::new();
        let visitor = Uuid::new_v4();

        assert!(registry.get(visitor, "sachacacao").is_none(), "lazy");

        let a = registry.session(visitor, "sachacacao", "persona A");
        let b = registry.session(visitor, "sachacacao", "persona B");
        assert!(Arc::ptr_eq(&a, &b), "same session reused, persona fixed");

        let other_store = registry.session(visitor, "cafedelvalle", "persona C");
        assert!(!Arc::ptr_eq(&a, &other_store));

        let other_visitor = registry.session(Uuid::new_v4(), "sachacacao", "persona A");
        assert!(!Arc::ptr_eq(&a, &other_visitor));
    }
}
