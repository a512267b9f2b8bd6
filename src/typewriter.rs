use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;

pub const DEFAULT_CHAR_INTERVAL: Duration = Duration::from_millis(30);

/// Reveals assistant text one character at a time through the injected
/// clock, and raises a "speaking" signal for the presentation layer while a
/// reveal is in flight.
pub struct Typewriter {
    clock: Arc<dyn Clock>,
    interval: Duration,
    speaking_tx: watch::Sender<bool>,
    speaking_rx: watch::Receiver<bool>,
    cancel: CancellationToken,
}

impl Typewriter {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (speaking_tx, speaking_rx) = watch::channel(false);
        Self {
            clock,
            interval,
            speaking_tx,
            speaking_rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Signal consumed by the host, e.g. to animate the robot's mouth.
    pub fn speaking(&self) -> watch::Receiver<bool> {
        self.speaking_rx.clone()
    }

    pub fn is_speaking(&self) -> bool {
        *self.speaking_rx.borrow()
    }

    /// Cancelling this token stops every current and future delivery.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start one reveal. Lazy: nothing happens until `next` is polled.
    pub fn deliver(&self, text: &str) -> Delivery<'_> {
        Delivery {
            typewriter: self,
            chars: text.chars().collect(),
            revealed: 0,
            finished: false,
        }
    }

    fn set_speaking(&self, on: bool) {
        // Only fails with no receivers; we always hold one ourselves.
        let _ = self.speaking_tx.send(on);
    }
}

/// One in-flight reveal of a single turn's text. Yields successive prefixes,
/// one per character interval, until the text is out or the typewriter is
/// cancelled.
pub struct Delivery<'a> {
    typewriter: &'a Typewriter,
    chars: Vec<char>,
    revealed: usize,
    finished: bool,
}

impl Delivery<'_> {
    pub async fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        if self.typewriter.cancel.is_cancelled() || self.revealed >= self.chars.len() {
            self.finish();
            return None;
        }

        if self.revealed == 0 {
            self.typewriter.set_speaking(true);
        }

        tokio::select! {
            _ = self.typewriter.cancel.cancelled() => {
                self.finish();
                return None;
            }
            _ = self.typewriter.clock.sleep(self.typewriter.interval) => {}
        }

        self.revealed += 1;
        let prefix: String = self.chars[..self.revealed].iter().collect();
        if self.revealed == self.chars.len() {
            self.finish();
        }
        Some(prefix)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        self.finished = true;
        self.typewriter.set_speaking(false);
    }
}

impl Drop for Delivery<'_> {
    fn drop(&mut self) {
        // A discarded delivery must not leave the mouth moving.
        if !self.finished {
            self.typewriter.set_speaking(false);
        }
    }
}
