//! Session manager for the SSE transport.
//!
//! Each SSE connection owns one session: an identifier mapped to the sending
//! half of a channel whose receiving half feeds the connection's event
//! stream. The mapping lives exactly as long as the stream; dropping the
//! stream (the client disconnected) removes it, and the identifier is never
//! reused.
//!
//! Map updates are short synchronous critical sections and no lock is held
//! across an `.await`, so a lookup never observes a half-applied update.

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Messages buffered per session before senders wait.
const CHANNEL_CAPACITY: usize = 64;

/// Errors raised when addressing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No live session carries this identifier.
    #[error("Session not found: {0}")]
    NotFound(String),

    /// The session's stream went away while a message was being delivered.
    #[error("Session closed: {0}")]
    Closed(String),

    /// The client stopped reading and the session's buffer is full.
    #[error("Session backlog full: {0}")]
    Full(String),
}

#[derive(Debug)]
struct Session {
    channel: mpsc::Sender<Value>,
    opened_at: DateTime<Utc>,
}

/// Owner of the session-to-channel mapping.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session and return the stream carrying its messages.
    pub fn open(self: &Arc<Self>) -> SessionStream {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id.clone(),
                Session {
                    channel: tx,
                    opened_at: Utc::now(),
                },
            );
        info!("Session opened: {}", id);

        SessionStream {
            id,
            manager: Arc::clone(self),
            receiver: ReceiverStream::new(rx),
        }
    }

    /// Queue a message on a session's stream.
    ///
    /// Never waits: once `CHANNEL_CAPACITY` messages are pending on a stream
    /// nobody reads, further messages are rejected with [`SessionError::Full`].
    pub fn deliver(&self, id: &str, message: Value) -> Result<(), SessionError> {
        let channel = self
            .channel(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        channel.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => {
                warn!("Session {} is not reading, dropping message", id);
                SessionError::Full(id.to_string())
            }
            TrySendError::Closed(_) => SessionError::Closed(id.to_string()),
        })
    }

    fn channel(&self, id: &str) -> Option<mpsc::Sender<Value>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|session| session.channel.clone())
    }

    /// Remove a session. Returns whether it was still registered.
    pub fn close(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);

        match removed {
            Some(session) => {
                let lifetime = Utc::now() - session.opened_at;
                info!(
                    "Session closed: {} (open for {}s)",
                    id,
                    lifetime.num_seconds()
                );
                true
            }
            None => {
                debug!("Session already closed: {}", id);
                false
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The receiving side of a session. Dropping it closes the session.
#[derive(Debug)]
pub struct SessionStream {
    id: String,
    manager: Arc<SessionManager>,
    receiver: ReceiverStream<Value>,
}

impl SessionStream {
    /// The session identifier clients must post messages to.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Stream for SessionStream {
    type Item = Value;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Value>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.manager.close(&self.id);
    }
}
