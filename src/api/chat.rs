//! Conversational intake endpoints.

use crate::api::{
    ApiError, AppState, ChatRequest, ChatResponse, ResetQuery, ResetResponse, StreamEvent,
    StreamQuery,
};
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

/// POST /api/chat - Run one intake turn and return the whole reply.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (session_id, handle) = state.sessions.get_or_create(request.session_id.as_deref());
    let mut session = handle.lock().await;

    let out = state.intake.reply(&mut session, &request.message).await;

    Ok(Json(ChatResponse {
        session_id,
        reply: out.reply,
        state: out.turn.state,
        missing_fields: out.turn.status.missing_required,
        core_complete: out.turn.status.core_complete,
        complete: out.turn.status.ready,
    }))
}

fn event(payload: &StreamEvent) -> Result<Event, Infallible> {
    Ok(Event::default().data(serde_json::to_string(payload).unwrap_or_default()))
}

/// GET /api/stream - Run one intake turn and stream the reply.
///
/// The session stays locked until the stream ends, so a second turn for
/// the same session waits for this one to finish.
pub async fn handle_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        let (session_id, handle) = state.sessions.get_or_create(query.session_id.as_deref());
        let mut session = handle.lock_owned().await;

        let turn = state.intake.begin(&mut session, &query.user_input).await;

        let mut deltas = match state.intake.stream(&turn).await {
            Ok(deltas) => deltas,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Chat stream failed to start");
                yield event(&StreamEvent::Error { error: e.to_string() });
                return;
            }
        };

        let mut reply = String::new();
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) => {
                    reply.push_str(&text);
                    yield event(&StreamEvent::Chunk { content: text });
                }
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Chat stream interrupted");
                    yield event(&StreamEvent::Error { error: e.to_string() });
                    return;
                }
            }
        }

        state.intake.finish(&mut session, &reply);
        info!(session_id = %session_id, next_step = turn.next_step(), "Streaming turn completed");

        let next_step = turn.next_step();
        yield event(&StreamEvent::Complete {
            session_id,
            state: turn.state,
            missing_fields: turn.status.missing_required,
            core_complete: turn.status.core_complete,
            complete: turn.status.ready,
            next_step,
        });
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /api/reset - Discard a session.
pub async fn handle_reset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
) -> Result<Json<ResetResponse>, ApiError> {
    match query.session_id {
        Some(id) => {
            if !state.sessions.remove(&id) {
                return Err(ApiError::session_not_found(&id));
            }
            info!(session_id = %id, "Session reset");
            Ok(Json(ResetResponse {
                status: "reset",
                session_id: Some(id),
            }))
        }
        None => Ok(Json(ResetResponse {
            status: "reset",
            session_id: None,
        })),
    }
}
