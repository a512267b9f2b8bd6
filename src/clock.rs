use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type Sleep = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Injectable time source. All delivery pacing goes through this so tests
/// can run the whole dialog pipeline without real delays.
pub trait Clock: Send + Sync {
    fn sleep(&self, dur: Duration) -> Sleep;
}

/// Wall-clock implementation backed by the tokio timer.
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, dur: Duration) -> Sleep {
        Box::pin(tokio::time::sleep(dur))
    }
}

/// Test clock: every sleep resolves immediately.
pub struct NullClock;

impl Clock for NullClock {
    fn sleep(&self, _dur: Duration) -> Sleep {
        Box::pin(std::future::ready(()))
    }
}
