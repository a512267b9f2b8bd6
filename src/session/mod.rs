pub mod confirm;
pub mod transcript;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::actions::ActionSurface;
use crate::clock::Clock;
use crate::grammar;
use crate::parser::types::AfterReply;
use crate::parser::Parser;
use crate::typewriter::{Typewriter, DEFAULT_CHAR_INTERVAL};
use confirm::ConfirmationManager;
use transcript::{Speaker, Transcript, Turn};

/// Delivered when a capability call blows up mid-turn. The conversation
/// keeps going; nothing is retried.
const FAILURE_LINE: &str = "Something sparked in there. Nothing changed, try again.";

/// Where the session is between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    AwaitingConfirmation,
    Responding,
}

/// What to do with input that arrives while a reply is still being revealed.
/// Dropping is the default; queueing keeps at most one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    #[default]
    Drop,
    QueueOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The line was processed and every resulting turn delivered.
    Replied,
    /// Empty or whitespace-only input; nothing happened.
    IgnoredEmpty,
    /// A reply was in flight and the policy says drop.
    DroppedBusy,
    /// A reply was in flight; the line waits in the one-deep queue.
    Queued,
}

/// Feed for the presentation layer. Partial carries the growing prefix of
/// the in-flight assistant turn; TurnAppended fires once per completed turn.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Partial(String),
    TurnAppended(Turn),
}

pub struct SessionConfig {
    pub char_interval: Duration,
    /// Beat between consecutive assistant turns of one submission.
    pub turn_pause: Duration,
    pub input_policy: InputPolicy,
    /// Instant system line shown before the welcome script.
    pub banner: Option<String>,
    /// Typed out one turn at a time by `greet`.
    pub welcome: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            char_interval: DEFAULT_CHAR_INTERVAL,
            turn_pause: Duration::from_millis(300),
            input_policy: InputPolicy::Drop,
            banner: Some("----- TERMINAL INITIALIZED -----".to_string()),
            welcome: vec![
                "Welcome to the lab!".to_string(),
                "This is where new ideas get tested.".to_string(),
                "Try: 'paint it green' or type 'help'".to_string(),
            ],
        }
    }
}

/// One conversation. Owns the transcript and the confirmation slot for its
/// whole lifetime; borrows the action surface from the host.
pub struct Session {
    parser: Parser,
    confirmations: ConfirmationManager,
    transcript: Transcript,
    typewriter: Typewriter,
    clock: Arc<dyn Clock>,
    turn_pause: Duration,
    input_policy: InputPolicy,
    banner: Option<String>,
    welcome: Vec<String>,
    queued: Option<String>,
    responding: Arc<AtomicBool>,
    events_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl Session {
    pub fn new(
        actions: Arc<dyn ActionSurface>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            parser: Parser::new(actions, Arc::clone(&clock)),
            confirmations: ConfirmationManager::new(),
            transcript: Transcript::new(),
            typewriter: Typewriter::new(Arc::clone(&clock), config.char_interval),
            clock,
            turn_pause: config.turn_pause,
            input_policy: config.input_policy,
            banner: config.banner,
            welcome: config.welcome,
            queued: None,
            responding: Arc::new(AtomicBool::new(false)),
            events_tx: None,
        }
    }

    /// Subscribe the presentation layer. Replaces any previous subscriber.
    pub fn events(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events_tx = Some(tx);
        rx
    }

    pub fn transcript(&self) -> &[Turn] {
        self.transcript.turns()
    }

    /// True while an assistant turn is being revealed.
    pub fn speaking(&self) -> watch::Receiver<bool> {
        self.typewriter.speaking()
    }

    /// Cancel this on teardown; in-flight deliveries stop producing
    /// prefixes, but completed turns keep their full text.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.typewriter.cancellation_token()
    }

    pub fn state(&self) -> DialogState {
        if self.responding.load(Ordering::SeqCst) {
            DialogState::Responding
        } else if self.confirmations.is_pending() {
            DialogState::AwaitingConfirmation
        } else {
            DialogState::Idle
        }
    }

    /// Run the scripted greeting. Meant to be called once, right after the
    /// widget mounts.
    pub async fn greet(&mut self) {
        let _guard = RespondingGuard::engage(&self.responding);
        if let Some(banner) = self.banner.clone() {
            self.push_system(&banner);
        }
        for line in self.welcome.clone() {
            self.pause().await;
            self.speak(&line).await;
        }
    }

    /// Feed one line of user input. No-op while a reply is in flight
    /// (subject to the input policy) and for whitespace-only text.
    pub async fn submit(&mut self, line: &str) -> SubmitOutcome {
        let text = line.trim().to_string();
        if text.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }

        if self.responding.load(Ordering::SeqCst) {
            return match self.input_policy {
                InputPolicy::Drop => {
                    debug!(input = %text, "dropped input during delivery");
                    SubmitOutcome::DroppedBusy
                }
                InputPolicy::QueueOne if self.queued.is_none() => {
                    self.queued = Some(text);
                    SubmitOutcome::Queued
                }
                InputPolicy::QueueOne => SubmitOutcome::DroppedBusy,
            };
        }

        self.process(text).await;
        while let Some(next) = self.queued.take() {
            self.process(next).await;
        }
        SubmitOutcome::Replied
    }

    async fn process(&mut self, text: String) {
        self.push_turn(Speaker::User, &text);
        let _guard = RespondingGuard::engage(&self.responding);

        // An open confirmation outranks everything, help included.
        if self.confirmations.is_pending() {
            match self.confirmations.resolve(&text).await {
                Ok(reply) => self.speak(&reply).await,
                Err(err) => {
                    warn!(error = %err, "confirmed action failed");
                    self.speak(FAILURE_LINE).await;
                }
            }
            return;
        }

        // Dedicated help path: one structured system turn, no typewriter.
        if text.eq_ignore_ascii_case("help") {
            self.push_system(&grammar::render_help());
            return;
        }

        let result = match self.parser.parse(&text) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "capability call failed");
                self.speak(FAILURE_LINE).await;
                return;
            }
        };

        self.speak(&result.response).await;

        match result.after {
            None => {}
            Some(AfterReply::Confirm(confirmation)) => {
                let prompt = confirmation.prompt.clone();
                match self.confirmations.set_pending(confirmation) {
                    Ok(()) => {
                        self.pause().await;
                        self.speak(&prompt).await;
                    }
                    Err(err) => {
                        // Sequencing bug upstream; surfaced, never swallowed.
                        error!(error = %err, "confirmation slot rejected");
                        self.speak(FAILURE_LINE).await;
                    }
                }
            }
            Some(AfterReply::FollowUp(follow_up)) => {
                self.pause().await;
                match follow_up.resolve().await {
                    Ok(text) => self.speak(&text).await,
                    Err(err) => {
                        warn!(error = %err, "follow-up failed");
                        self.speak(FAILURE_LINE).await;
                    }
                }
            }
        }
    }

    /// Reveal one assistant turn. The transcript records the complete text
    /// even when the reveal is cancelled partway.
    async fn speak(&mut self, text: &str) {
        let mut delivery = self.typewriter.deliver(text);
        while let Some(prefix) = delivery.next().await {
            self.emit(SessionEvent::Partial(prefix));
        }
        drop(delivery);
        self.push_turn(Speaker::Assistant, text);
    }

    fn push_turn(&mut self, speaker: Speaker, text: &str) {
        let turn = self.transcript.push(speaker, text);
        self.emit(SessionEvent::TurnAppended(turn));
    }

    fn push_system(&mut self, text: &str) {
        self.push_turn(Speaker::System, text);
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event);
        }
    }

    async fn pause(&self) {
        self.clock.sleep(self.turn_pause).await;
    }
}

/// RAII marker for the Responding phase. Dropping it, even via a cancelled
/// future, always releases the flag, so the session cannot wedge.
struct RespondingGuard {
    flag: Arc<AtomicBool>,
}

impl RespondingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self {
            flag: Arc::clone(flag),
        }
    }
}

impl Drop for RespondingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
