//! Chat route handlers: transcript fragment and the streaming turn endpoint.
//!
//! A turn streams the model's reply to the client as SSE chunk events while
//! growing the server-side transcript entry in place. The user entry is
//! committed to the transcript before the first chunk is emitted, and one
//! turn at a time is enforced per session - a submission while a reply is in
//! flight is rejected without touching the transcript.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use async_stream::stream;
use axum::{
    Json,
    extract::{Path, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::StreamExt;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use tienditas_core::Author;

use crate::error::{AppError, Result};
use crate::genai::Content;
use crate::services::chat::{CHAT_FALLBACK, CHAT_UNAVAILABLE, ChatError};
use crate::session_keys;
use crate::state::AppState;

/// Request to send a chat turn.
#[derive(Debug, Deserialize)]
pub struct SendTurnRequest {
    pub message: String,
}

/// One transcript entry for the fragment template.
#[derive(Clone)]
pub struct ChatMessageView {
    /// "user" or "model" (CSS class contract of the widget).
    pub author: &'static str,
    pub content: String,
}

/// Chat transcript fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_messages.html")]
pub struct ChatMessagesTemplate {
    pub entries: Vec<ChatMessageView>,
    pub busy: bool,
}

/// The visitor's chat identity, created on first use.
async fn visitor_id(session: &Session) -> Result<Uuid> {
    if let Some(id) = session.get::<Uuid>(session_keys::CHAT_VISITOR).await.ok().flatten() {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(session_keys::CHAT_VISITOR, id).await?;
    Ok(id)
}

/// Render the visible transcript for this visitor and store.
#[instrument(skip(state, session))]
pub async fn transcript(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
) -> Result<Response> {
    if !state.committed().contains_key(&store_id) {
        return Err(AppError::NotFound(format!("store '{store_id}'")));
    }

    let visitor = visitor_id(&session).await?;
    // Reading the transcript never creates a session; it stays lazy until
    // the first turn.
    let Some(chat) = state.chats().get(visitor, &store_id) else {
        return Ok(ChatMessagesTemplate {
            entries: Vec::new(),
            busy: false,
        }
        .into_response());
    };

    let guard = chat.lock().await;
    let entries = guard
        .transcript()
        .entries()
        .iter()
        .map(|entry| ChatMessageView {
            author: match entry.author {
                Author::User => "user",
                Author::Assistant => "model",
            },
            content: entry.content.clone(),
        })
        .collect();
    let busy = guard.is_busy();
    drop(guard);

    Ok(ChatMessagesTemplate { entries, busy }.into_response())
}

/// Send one turn and stream the reply as SSE chunk events.
#[instrument(skip(state, session, request))]
pub async fn stream_turn(
    State(state): State<AppState>,
    session: Session,
    Path(store_id): Path<String>,
    Json(request): Json<SendTurnRequest>,
) -> Result<Response> {
    let collection = state.committed();
    let record = collection
        .get(&store_id)
        .ok_or_else(|| AppError::NotFound(format!("store '{store_id}'")))?;

    let visitor = visitor_id(&session).await?;
    // Lazily opens the session, fixing the store's persona for its lifetime.
    let chat = state
        .chats()
        .session(visitor, &store_id, &record.chat_instruction);

    // The user turn becomes visible before any part of the reply.
    let (turn, persona, contents) = {
        let mut guard = chat.lock().await;
        match guard.begin_turn(&request.message) {
            Ok(turn) => (
                turn,
                guard.persona().to_string(),
                guard.request_contents(),
            ),
            Err(ChatError::Busy) => {
                return Err(AppError::Conflict(
                    "espera la respuesta anterior".to_string(),
                ));
            }
            Err(ChatError::GenAi(e)) => return Err(AppError::Upstream(e.to_string())),
        }
    };

    let upstream = state
        .genai()
        .clone()
        .generate_stream(Some(Content::system(persona)), contents)
        .await;

    match upstream {
        Ok(chunks) => {
            let reply = stream! {
                let mut chunks = std::pin::pin!(chunks);
                let mut failed = false;

                while let Some(result) = chunks.next().await {
                    match result {
                        Ok(text) => {
                            chat.lock().await.append_chunk(turn, &text);
                            yield Ok::<Event, Infallible>(Event::default().data(text));
                        }
                        Err(e) => {
                            tracing::warn!("chat stream failed mid-turn: {e}");
                            chat.lock().await.fail_turn(turn);
                            yield Ok(Event::default().event("error").data(CHAT_FALLBACK));
                            failed = true;
                            break;
                        }
                    }
                }

                if !failed {
                    chat.lock().await.finish_turn(turn);
                    yield Ok(Event::default().event("done").data(""));
                }
            };

            Ok(Sse::new(reply.boxed())
                .keep_alive(KeepAlive::default())
                .into_response())
        }
        Err(e) => {
            // Failure is per-turn: the fallback lands in the transcript and
            // the session stays usable for another attempt. A turn that never
            // started streaming gets the could-not-connect copy.
            tracing::warn!("chat turn could not start: {e}");
            chat.lock().await.fail_turn_with(turn, CHAT_UNAVAILABLE);

            let fallback = futures::stream::iter([Ok::<Event, Infallible>(
                Event::default().event("error").data(CHAT_UNAVAILABLE),
            )]);
            Ok(Sse::new(fallback.boxed())
                .keep_alive(KeepAlive::default())
                .into_response())
        }
    }
}
