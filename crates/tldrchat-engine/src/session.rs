//! Send lifecycle state.
//!
//! [`ChatSession`] is the single owned container for everything a send
//! touches: the conversation store, the transient reveal text and the
//! in-flight phase. Every transition is a synchronous method so that the
//! caller decides when network results and timer ticks are applied.
//!
//! ```text
//!  Idle --begin_send--> Waiting --complete_request(Ok)--> Revealing --advance_reveal (final)--> Idle
//!                          |
//!                          +--complete_request(Err) (error turn appended)--> Idle
//! ```

use tracing::{debug, info, warn};

use crate::client::{ReplyError, ReplyRequest};
use crate::message::Message;
use crate::reveal::{Reveal, RevealFrame};
use crate::store::ConversationStore;

/// Where the session is in the send lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No send is active.
    #[default]
    Idle,
    /// A request is out; no reply text yet.
    Waiting,
    /// The reply arrived and is being revealed.
    Revealing,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Waiting,
    Revealing(Reveal),
}

/// Result of [`ChatSession::begin_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendDecision {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    /// A send is already in flight; nothing happened and the input is kept.
    Busy,
    /// The user turn was committed; dispatch this request.
    Dispatch(ReplyRequest),
}

/// Result of [`ChatSession::complete_request`].
#[derive(Debug)]
pub enum RequestOutcome {
    /// The reply is now being revealed.
    Revealing,
    /// The error turn was committed. The cause is handed back for logging.
    Failed(ReplyError),
    /// No request was waiting for this result; it was dropped.
    Stale,
}

/// Result of [`ChatSession::advance_reveal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep {
    /// A partial prefix is now the transient text.
    Frame(RevealFrame),
    /// The full reply was shown and committed as a bot turn.
    Completed(RevealFrame),
    /// Nothing is being revealed.
    Idle,
}

/// Owned state for one chat view.
#[derive(Debug, Default)]
pub struct ChatSession {
    store: ConversationStore,
    transient: Option<String>,
    phase: Phase,
}

impl ChatSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// The partial bot reply currently on display, if any.
    pub fn transient(&self) -> Option<&str> {
        self.transient.as_deref()
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Waiting => SessionState::Waiting,
            Phase::Revealing(_) => SessionState::Revealing,
        }
    }

    /// True from dispatch until the error turn or the end of the reveal.
    pub fn in_flight(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Whether the "typing" indicator should be visible.
    pub fn show_typing_indicator(&self) -> bool {
        self.in_flight() && self.transient.as_deref().map_or(true, str::is_empty)
    }

    /// Start a send from the contents of `input`.
    ///
    /// On dispatch the user turn is appended and `input` is cleared before
    /// the request is handed back, so the user message is always committed
    /// ahead of any network activity.
    pub fn begin_send(&mut self, input: &mut String) -> SendDecision {
        if input.trim().is_empty() {
            return SendDecision::Ignored;
        }
        if self.in_flight() {
            debug!("send rejected while another send is in flight");
            return SendDecision::Busy;
        }

        let text = std::mem::take(input);
        self.store.append(Message::user(text.clone()));
        self.transient = None;
        self.phase = Phase::Waiting;

        info!(turns = self.store.len(), "user message committed");
        SendDecision::Dispatch(ReplyRequest::new(text))
    }

    /// Apply the result of the request started by [`Self::begin_send`].
    pub fn complete_request(&mut self, result: Result<String, ReplyError>) -> RequestOutcome {
        if !matches!(self.phase, Phase::Waiting) {
            warn!(state = ?self.state(), "dropping reply for a request that is no longer waiting");
            return RequestOutcome::Stale;
        }

        match result {
            Ok(reply) => {
                debug!(chars = reply.chars().count(), "starting reveal");
                self.phase = Phase::Revealing(Reveal::new(reply));
                RequestOutcome::Revealing
            }
            Err(err) => {
                warn!(error = %err, "reply fetch failed");
                self.store.append(Message::server_error());
                self.transient = None;
                self.phase = Phase::Idle;
                RequestOutcome::Failed(err)
            }
        }
    }

    /// Emit the next reveal frame.
    ///
    /// The final frame performs the completion action exactly once: the
    /// full reply is appended as a bot turn, the transient text is cleared
    /// and the session returns to idle.
    pub fn advance_reveal(&mut self) -> RevealStep {
        let Phase::Revealing(reveal) = &mut self.phase else {
            return RevealStep::Idle;
        };

        let frame = match reveal.next() {
            Some(frame) => frame,
            // Unreachable in practice: the final frame leaves this phase.
            None => RevealFrame {
                prefix: reveal.text().to_string(),
                is_final: true,
            },
        };

        if frame.is_final {
            self.store.append(Message::bot(frame.prefix.clone()));
            self.transient = None;
            self.phase = Phase::Idle;
            info!(turns = self.store.len(), "bot reply committed");
            RevealStep::Completed(frame)
        } else {
            self.transient = Some(frame.prefix.clone());
            RevealStep::Frame(frame)
        }
    }
}
