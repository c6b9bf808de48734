//! Chat transcript accumulation.
//!
//! A streamed assistant reply grows its transcript entry in place as chunks
//! arrive. Appending is guarded by the turn id: a chunk only extends the last
//! entry when that entry is an assistant entry of the same turn, so a stray
//! late chunk from an earlier turn can never corrupt a newer reply.

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One visible entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub author: Author,
    /// The turn this entry belongs to.
    pub turn: u64,
    pub content: String,
}

/// The ordered, visible conversation of one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append the user side of a turn.
    ///
    /// Always called before any chunk of the corresponding reply, so the user
    /// entry is visible first.
    pub fn push_user(&mut self, turn: u64, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            author: Author::User,
            turn,
            content: content.into(),
        });
    }

    /// Append a complete assistant entry (fallback messages).
    pub fn push_assistant(&mut self, turn: u64, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            author: Author::Assistant,
            turn,
            content: content.into(),
        });
    }

    /// Append a streamed chunk of the reply for `turn`.
    ///
    /// Extends the last entry when it is the assistant entry of the same
    /// turn; starts that entry when the chunk is the turn's first; drops the
    /// chunk when it belongs to an older turn than the transcript has moved
    /// past (a stray late arrival).
    pub fn append_chunk(&mut self, turn: u64, chunk: &str) {
        let extends_last = matches!(
            self.entries.last(),
            Some(last) if last.author == Author::Assistant && last.turn == turn
        );
        if extends_last {
            if let Some(last) = self.entries.last_mut() {
                last.content.push_str(chunk);
            }
            return;
        }
        // Stray chunk from an aborted or superseded turn.
        if self.entries.last().is_some_and(|last| last.turn > turn) {
            return;
        }
        self.push_assistant(turn, chunk);
    }

    /// The assistant's full reply for a turn, if any of it arrived.
    #[must_use]
    pub fn assistant_reply(&self, turn: u64) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.author == Author::Assistant && e.turn == turn)
            .map(|e| e.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_grow_entry_in_place() {
        let mut transcript = Transcript::new();
        transcript.push_user(1, "¿Tienen bombones?");
        transcript.append_chunk(1, "Sí, ");
        transcript.append_chunk(1, "cajas de 12.");

        assert_eq!(transcript.entries().len(), 2);
        assert_eq!(transcript.assistant_reply(1), Some("Sí, cajas de 12."));
    }

    #[test]
    fn test_user_entry_precedes_reply() {
        let mut transcript = Transcript::new();
        transcript.push_user(1, "hola");
        transcript.append_chunk(1, "buenas");

        let authors: Vec<Author> = transcript.entries().iter().map(|e| e.author).collect();
        assert_eq!(authors, [Author::User, Author::Assistant]);
    }

    #[test]
    fn test_stale_chunk_is_dropped() {
        let mut transcript = Transcript::new();
        transcript.push_user(1, "primera");
        transcript.append_chunk(1, "respuesta uno");
        transcript.push_user(2, "segunda");
        transcript.append_chunk(2, "respuesta dos");

        // A late chunk from turn 1 must not touch turn 2's entry.
        transcript.append_chunk(1, " (tarde)");

        assert_eq!(transcript.assistant_reply(1), Some("respuesta uno"));
        assert_eq!(transcript.assistant_reply(2), Some("respuesta dos"));
        assert_eq!(transcript.entries().len(), 4);
    }

    #[test]
    fn test_separate_turns_make_separate_entries() {
        let mut transcript = Transcript::new();
        transcript.push_user(1, "a");
        transcript.append_chunk(1, "b");
        transcript.push_user(2, "c");
        transcript.append_chunk(2, "d");

        assert_eq!(transcript.entries().len(), 4);
    }

    #[test]
    fn test_fallback_message_is_a_plain_entry() {
        let mut transcript = Transcript::new();
        transcript.push_user(1, "hola");
        transcript.push_assistant(1, "¡Uy! Algo salió mal. Por favor, intenta de nuevo.");
        assert_eq!(
            transcript.assistant_reply(1),
            Some("¡Uy! Algo salió mal. Por favor, intenta de nuevo.")
        );
    }
}
