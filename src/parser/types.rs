use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed async reply: resolves to the next assistant line, or the capability
/// failure that prevented it.
pub type Reply = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send>>;

/// Deferred reply producer. Nothing runs until the session invokes it.
pub type ReplyThunk = Box<dyn FnOnce() -> Reply + Send>;

/// Two-step gate for commands that must not fire off a single utterance.
/// The side effect lives entirely inside `on_confirm`; until the user says
/// yes, nothing has happened.
pub struct PendingConfirmation {
    pub prompt: String,
    pub on_confirm: ReplyThunk,
    pub on_deny: Box<dyn FnOnce() -> String + Send>,
}

impl fmt::Debug for PendingConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingConfirmation")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// Second assistant turn produced after the immediate acknowledgement, for
/// actions whose full effect lands after a delay.
pub struct FollowUp(pub ReplyThunk);

impl FollowUp {
    pub async fn resolve(self) -> anyhow::Result<String> {
        (self.0)().await
    }
}

impl fmt::Debug for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FollowUp(..)")
    }
}

/// At most one of these rides along with a parse result; a command either
/// asks for confirmation or schedules a follow-up, never both.
#[derive(Debug)]
pub enum AfterReply {
    Confirm(PendingConfirmation),
    FollowUp(FollowUp),
}

/// Outcome of interpreting one line. `handled == false` means the input was
/// not understood, the response is guidance text, and no side effect ran.
#[derive(Debug)]
pub struct ParseResult {
    pub handled: bool,
    pub response: String,
    pub after: Option<AfterReply>,
}

impl ParseResult {
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            handled: true,
            response: response.into(),
            after: None,
        }
    }

    pub fn unhandled(response: impl Into<String>) -> Self {
        Self {
            handled: false,
            response: response.into(),
            after: None,
        }
    }

    pub fn then(response: impl Into<String>, after: AfterReply) -> Self {
        Self {
            handled: true,
            response: response.into(),
            after: Some(after),
        }
    }
}
