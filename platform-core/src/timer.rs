//! Scoped countdown timer for rate-limited actions.
//!
//! A `Countdown` owns a background tick task for its whole life and aborts it
//! on drop, so whichever state holds the timer tears it down by going out of
//! scope. Completion, failure, and navigating away all take the same path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A watch-observable countdown that ticks down once per second.
///
/// The counter never goes below zero and never increases on its own; the only
/// way back up is an explicit [`reset`](Countdown::reset). Must be started
/// from within a Tokio runtime.
#[derive(Debug)]
pub struct Countdown {
    budget: u64,
    channel: Arc<watch::Sender<u64>>,
    remaining: watch::Receiver<u64>,
    ticker: JoinHandle<()>,
}

impl Countdown {
    /// Start a countdown from `budget` seconds.
    pub fn start(budget: u64) -> Self {
        let (tx, rx) = watch::channel(budget);
        let channel = Arc::new(tx);

        let tick_channel = Arc::clone(&channel);
        let ticker = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; consume it so the counter
            // holds its initial value for a full second.
            tick.tick().await;
            loop {
                tick.tick().await;
                tick_channel.send_modify(|remaining| *remaining = remaining.saturating_sub(1));
            }
        });

        Self {
            budget,
            channel,
            remaining: rx,
            ticker,
        }
    }

    /// Seconds left on the counter.
    pub fn remaining(&self) -> u64 {
        *self.remaining.borrow()
    }

    /// True once the counter has reached zero.
    pub fn finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Put the counter back to its starting budget; ticking continues.
    pub fn reset(&self) {
        self.channel.send_replace(self.budget);
    }

    /// Observe counter changes without polling.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn advance_secs(rx: &mut watch::Receiver<u64>, secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(Duration::from_secs(1)).await;
            rx.changed().await.expect("ticker alive");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn holds_initial_budget_before_first_second() {
        let countdown = Countdown::start(30);
        assert_eq!(countdown.remaining(), 30);
        assert!(!countdown.finished());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_down_once_per_second() {
        let countdown = Countdown::start(30);
        let mut rx = countdown.subscribe();

        advance_secs(&mut rx, 1).await;
        assert_eq!(countdown.remaining(), 29);

        advance_secs(&mut rx, 4).await;
        assert_eq!(countdown.remaining(), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_exactly_at_zero_and_saturates() {
        let countdown = Countdown::start(3);
        let mut rx = countdown.subscribe();

        advance_secs(&mut rx, 2).await;
        assert!(!countdown.finished());

        advance_secs(&mut rx, 1).await;
        assert!(countdown.finished());

        // Further ticks keep firing but the counter stays at zero.
        advance_secs(&mut rx, 2).await;
        assert_eq!(countdown.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_the_full_budget() {
        let countdown = Countdown::start(30);
        let mut rx = countdown.subscribe();

        advance_secs(&mut rx, 7).await;
        assert_eq!(countdown.remaining(), 23);

        countdown.reset();
        assert_eq!(countdown.remaining(), 30);

        advance_secs(&mut rx, 1).await;
        assert_eq!(countdown.remaining(), 29);
    }
}
