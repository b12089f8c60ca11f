//! One complete send, driven to the end on the current task.
//!
//! Used by the headless `ask` command. The TUI drives the same
//! [`ChatSession`] transitions from its own event loop instead.

use std::time::Duration;

use crate::client::{ReplyError, ReplyService};
use crate::message::Message;
use crate::reveal::RevealTicker;
use crate::session::{ChatSession, RequestOutcome, RevealStep, SendDecision};

/// Callbacks fired while a send progresses. All methods default to no-ops.
pub trait LifecycleObserver {
    /// The user turn was committed.
    fn on_user_message(&mut self, _message: &Message) {}

    /// A reveal frame is on display (including the final, full one).
    fn on_frame(&mut self, _prefix: &str) {}

    /// The bot turn (reply or error) was committed.
    fn on_committed(&mut self, _message: &Message) {}
}

impl LifecycleObserver for () {}

/// How a call to [`run_send`] ended.
#[derive(Debug)]
pub enum SendOutcome {
    /// Empty input, nothing sent.
    Ignored,
    /// Another send was still in flight.
    Busy,
    /// The reply was revealed and committed.
    Replied,
    /// The request failed and the error turn was committed.
    Failed(ReplyError),
}

/// Run a send lifecycle from `input` to a settled conversation.
///
/// Exactly one request is made. On success the reply is revealed at
/// `cadence`; the ticker is dropped as soon as the last frame is applied.
pub async fn run_send<O>(
    session: &mut ChatSession,
    service: &dyn ReplyService,
    input: &mut String,
    cadence: Duration,
    observer: &mut O,
) -> SendOutcome
where
    O: LifecycleObserver + ?Sized,
{
    let request = match session.begin_send(input) {
        SendDecision::Ignored => return SendOutcome::Ignored,
        SendDecision::Busy => return SendOutcome::Busy,
        SendDecision::Dispatch(request) => request,
    };
    if let Some(message) = session.store().last() {
        observer.on_user_message(message);
    }

    let result = service.fetch_reply(&request).await;

    match session.complete_request(result) {
        RequestOutcome::Revealing => {}
        RequestOutcome::Failed(err) => {
            if let Some(message) = session.store().last() {
                observer.on_committed(message);
            }
            return SendOutcome::Failed(err);
        }
        // begin_send just moved us to Waiting, so this cannot happen here.
        RequestOutcome::Stale => return SendOutcome::Busy,
    }

    let mut ticker = RevealTicker::new(cadence);
    loop {
        ticker.tick().await;
        match session.advance_reveal() {
            RevealStep::Frame(frame) => observer.on_frame(&frame.prefix),
            RevealStep::Completed(frame) => {
                observer.on_frame(&frame.prefix);
                if let Some(message) = session.store().last() {
                    observer.on_committed(message);
                }
                break;
            }
            RevealStep::Idle => break,
        }
    }

    SendOutcome::Replied
}
