use crate::MatchupKey;
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_DEAL_DELAY: Duration = Duration::from_millis(2000);

/// Timer driver for matchup reveals.
///
/// Every accepted deal gets one task that sleeps for `delay` and then sends
/// the matchup's key on the completion channel. The owner feeds those keys
/// back into `ProgressionEngine::complete`. Dropping the dealer aborts every
/// pending task, so a discarded view never sees a late completion.
pub struct Dealer {
    delay: Duration,
    completions: mpsc::Sender<MatchupKey>,
    pending: HashMap<MatchupKey, JoinHandle<()>>,
}

impl Dealer {
    pub fn new(delay: Duration, completions: mpsc::Sender<MatchupKey>) -> Self {
        Self { delay, completions, pending: HashMap::new() }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the completion for `key`. Returns false if one is already
    /// pending. Must be called from within a tokio runtime.
    pub fn deal(&mut self, key: MatchupKey) -> bool {
        if self.is_pending(key) {
            debug!("deal {key} already pending");
            return false;
        }
        let delay = self.delay;
        let completions = self.completions.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if completions.send(key).await.is_err() {
                warn!("deal {key} finished after its receiver went away");
            }
        });
        self.pending.insert(key, handle);
        debug!("deal {key} scheduled in {}ms", delay.as_millis());
        true
    }

    /// Forget the task of a delivered completion.
    pub fn settle(&mut self, key: MatchupKey) {
        self.pending.remove(&key);
    }

    pub fn is_pending(&self, key: MatchupKey) -> bool {
        self.pending
            .get(&key)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for Dealer {
    fn drop(&mut self) {
        for (key, handle) in self.pending.drain() {
            if !handle.is_finished() {
                debug!("aborting pending deal {key}");
            }
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::eight_team;
    use crate::progression::ProgressionEngine;
    use tokio::time::{Instant, timeout};

    const DELAY: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn completion_arrives_after_exactly_the_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        let start = Instant::now();
        assert!(dealer.deal(MatchupKey::new(0, 1)));

        let key = rx.recv().await.expect("completion");
        assert_eq!(key, MatchupKey::new(0, 1));
        let elapsed = start.elapsed();
        assert!(elapsed >= DELAY, "fired early: {elapsed:?}");
        assert!(elapsed < DELAY + Duration::from_millis(5), "fired late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_arrives_before_the_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        dealer.deal(MatchupKey::new(0, 0));
        let early = timeout(DELAY - Duration::from_millis(1), rx.recv()).await;
        assert!(early.is_err(), "completion delivered before the delay");
        assert!(dealer.is_pending(MatchupKey::new(0, 0)));
    }

    #[tokio::test(start_paused = true)]
    async fn double_deal_schedules_one_timer() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        let key = MatchupKey::new(0, 3);
        assert!(dealer.deal(key));
        assert!(!dealer.deal(key));
        assert_eq!(dealer.pending_count(), 1);

        assert_eq!(rx.recv().await, Some(key));
        dealer.settle(key);
        let second = timeout(DELAY * 5, rx.recv()).await;
        assert!(second.is_err(), "duplicate completion delivered");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_dealer_cancels_pending_deals() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        dealer.deal(MatchupKey::new(0, 0));
        dealer.deal(MatchupKey::new(0, 1));
        drop(dealer);
        // Every sender is gone once the aborted tasks are torn down.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_is_not_a_crash() {
        let (tx, rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        dealer.deal(MatchupKey::new(0, 0));
        drop(rx);
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(dealer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn engine_and_dealer_reveal_a_round() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut dealer = Dealer::new(DELAY, tx);
        let mut engine = ProgressionEngine::new(eight_team());

        for m in 0..4 {
            if engine.trigger(0, m).is_started() {
                dealer.deal(MatchupKey::new(0, m));
            }
            // Repeated gesture while dealing.
            assert!(!engine.trigger(0, m).is_started());
        }
        assert!(!engine.is_round_visible(1));

        let mut completed = 0;
        while completed < 4 {
            let key = rx.recv().await.expect("completion");
            dealer.settle(key);
            assert!(engine.is_animating(key));
            engine.complete(key.round, key.matchup);
            assert!(engine.is_played(key) && !engine.is_animating(key));
            completed += 1;
        }
        assert!(engine.is_round_visible(1));
        assert_eq!(dealer.pending_count(), 0);
    }
}
