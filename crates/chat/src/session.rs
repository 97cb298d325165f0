//! Single-flight chat session.
//!
//! At most one request is in flight per session. Each request is identified
//! by a [`Ticket`]; a completion that does not match the in-flight ticket is
//! dropped, which lets a timeout and a late response race safely.

use std::sync::atomic::{AtomicU64, Ordering};

use protocol::{CONNECTION_FAILED, ChatRequest, REQUEST_TIMED_OUT};
use thiserror::Error;

use crate::turn::{ChatHistory, ChatTurn};

/// Tickets are unique per process, so a reply or timeout still running for
/// a dropped session can never match a newer session's request.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A request the host must send, then resolve with [`ChatSession::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: ChatRequest,
}

/// Why a request produced no reply. The display text is what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelayFailure {
    #[error("{}", CONNECTION_FAILED)]
    Connection,
    #[error("{}", REQUEST_TIMED_OUT)]
    TimedOut,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    history: ChatHistory,
    in_flight: Option<Ticket>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// True while a request is outstanding; the widget disables input.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record the user's turn and open a request.
    ///
    /// Returns `None` without touching the history when the trimmed input is
    /// empty or another request is still outstanding.
    pub fn submit(&mut self, input: &str) -> Option<PendingRequest> {
        let text = input.trim();
        if text.is_empty() || self.is_busy() {
            return None;
        }

        let ticket = Ticket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed));
        self.in_flight = Some(ticket);
        self.history.push(ChatTurn::user(text));

        Some(PendingRequest {
            ticket,
            request: ChatRequest::new(text),
        })
    }

    /// Resolve the in-flight request with a bot turn.
    ///
    /// Returns false, changing nothing, if `ticket` is not the in-flight one.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<String, RelayFailure>) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        let text = match outcome {
            Ok(reply) => reply,
            Err(failure) => failure.to_string(),
        };
        self.history.push(ChatTurn::bot(text));
        true
    }

    /// Resolve `ticket` with the timeout message if it is still in flight.
    pub fn expire(&mut self, ticket: Ticket) -> bool {
        self.complete(ticket, Err(RelayFailure::TimedOut))
    }
}
