//! The process-wide `unauthorized` signal.
//!
//! Any collaborator that sees an authorization failure from the backend
//! raises the signal; the session gate consumes it. The signal is an explicit
//! object created by the composition root and cloned into publishers and
//! subscribers.

use tokio::sync::broadcast;
use tracing::debug;

/// Name the signal is known by in logs.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Pending signals kept per subscriber before it starts lagging.
/// Signals carry no payload, so lagging only collapses duplicates.
const SIGNAL_CAPACITY: usize = 16;

/// Payload-less marker carried on the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized;

/// Publisher handle for the `unauthorized` signal. Clone is cheap.
#[derive(Debug, Clone)]
pub struct UnauthorizedSignal {
    tx: broadcast::Sender<Unauthorized>,
}

impl Default for UnauthorizedSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl UnauthorizedSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { tx }
    }

    /// Fire and forget. Raising with nobody listening is not an error.
    pub fn raise(&self) {
        let delivered = self.tx.send(Unauthorized).unwrap_or(0);
        debug!(signal = UNAUTHORIZED, delivered, "Signal raised");
    }

    pub fn subscribe(&self) -> UnauthorizedSubscription {
        UnauthorizedSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Receiving side of the signal. Dropping it unregisters the subscriber.
#[derive(Debug)]
pub struct UnauthorizedSubscription {
    rx: broadcast::Receiver<Unauthorized>,
}

impl UnauthorizedSubscription {
    /// Drain everything raised since the last call without blocking.
    ///
    /// Returns the number of signals observed; signals lost to lagging are
    /// included in the count.
    pub fn drain(&mut self) -> usize {
        let mut seen = 0;
        loop {
            match self.rx.try_recv() {
                Ok(Unauthorized) => seen += 1,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    seen += skipped as usize;
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_without_subscribers_is_fine() {
        let signal = UnauthorizedSignal::new();
        assert_eq!(signal.subscriber_count(), 0);
        signal.raise();
        signal.raise();
    }

    #[test]
    fn test_every_subscriber_sees_the_signal() {
        let signal = UnauthorizedSignal::new();
        let mut a = signal.subscribe();
        let mut b = signal.subscribe();

        signal.clone().raise();

        assert_eq!(a.drain(), 1);
        assert_eq!(b.drain(), 1);
        // Drained, nothing left
        assert_eq!(a.drain(), 0);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let signal = UnauthorizedSignal::new();
        let sub = signal.subscribe();
        assert_eq!(signal.subscriber_count(), 1);
        drop(sub);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_lagged_signals_are_counted() {
        let signal = UnauthorizedSignal::new();
        let mut sub = signal.subscribe();
        for _ in 0..(SIGNAL_CAPACITY + 4) {
            signal.raise();
        }
        assert_eq!(sub.drain(), SIGNAL_CAPACITY + 4);
    }

    #[test]
    fn test_subscription_only_sees_later_signals() {
        let signal = UnauthorizedSignal::new();
        signal.raise();
        let mut sub = signal.subscribe();
        assert_eq!(sub.drain(), 0);
    }
}
