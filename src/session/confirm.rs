use anyhow::{bail, Result};
use thiserror::Error;

use crate::parser::types::PendingConfirmation;

/// Sent when a pending confirmation gets an answer that is neither yes nor
/// no. The original prompt is not repeated.
pub const REPROMPT: &str = "Please answer yes or no.";

const AFFIRMATIVE: &[&str] = &[
    "yes", "yeah", "yep", "yup", "sure", "ok", "okay", "y", "confirm", "do it",
];
const NEGATIVE: &[&str] = &["no", "nope", "nah", "n", "cancel", "negative", "stop"];

/// Exact-or-prefix match against a lexicon, case-insensitive, on the trimmed
/// input. Prefix matches must end at a word boundary so "yesterday" is not
/// an answer.
fn matches_lexicon(text: &str, lexicon: &[&str]) -> bool {
    let t = text.trim().to_lowercase();
    lexicon.iter().any(|kw| {
        t == *kw
            || (t.starts_with(kw)
                && t[kw.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| !c.is_alphanumeric()))
    })
}

pub fn is_affirmative(text: &str) -> bool {
    matches_lexicon(text, AFFIRMATIVE)
}

pub fn is_denial(text: &str) -> bool {
    matches_lexicon(text, NEGATIVE)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmError {
    /// A second confirmation was requested before the first was answered.
    /// That is a sequencing bug upstream, never silently absorbed.
    #[error("a confirmation is already pending")]
    AlreadyPending,
}

/// Holds at most one outstanding yes/no question: `None -> Pending -> None`.
#[derive(Debug, Default)]
pub struct ConfirmationManager {
    pending: Option<PendingConfirmation>,
}

impl ConfirmationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.prompt.as_str())
    }

    pub fn set_pending(&mut self, confirmation: PendingConfirmation) -> Result<(), ConfirmError> {
        if self.pending.is_some() {
            return Err(ConfirmError::AlreadyPending);
        }
        self.pending = Some(confirmation);
        Ok(())
    }

    /// Feed one user line at the gate. Affirmative runs the confirmed action
    /// and clears the slot; negative clears the slot without side effects;
    /// anything else keeps the slot and asks again.
    pub async fn resolve(&mut self, text: &str) -> Result<String> {
        if self.pending.is_none() {
            bail!("resolve called with no confirmation pending");
        }

        if is_affirmative(text) {
            // Slot is cleared before the action runs, so a failing action
            // still leaves the manager in a clean state.
            if let Some(pending) = self.pending.take() {
                return (pending.on_confirm)().await;
            }
        } else if is_denial(text) {
            if let Some(pending) = self.pending.take() {
                return Ok((pending.on_deny)());
            }
        }

        Ok(REPROMPT.to_string())
    }
}
