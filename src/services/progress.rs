use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Ceiling the ticker may approach while the pipeline is still running.
const SIMULATED_CEILING: f32 = 95.0;
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const TICK_STEP: f32 = 2.0;

/// Cosmetic progress reporter for one analysis run.
///
/// Owns a watch channel and a ticker task that nudges the value toward (but
/// never past) the ceiling. Completing the run aborts the ticker and pins the
/// value at 100. Consumers only read the channel; nothing here participates in
/// pipeline control flow or error propagation.
pub struct ProgressReporter {
    tx: watch::Sender<f32>,
    ticker: JoinHandle<()>,
}

impl ProgressReporter {
    pub fn start() -> (Self, watch::Receiver<f32>) {
        let (tx, rx) = watch::channel(0.0_f32);
        let ticker_tx = tx.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.tick().await; // first tick is immediate
            loop {
                interval.tick().await;
                let current = *ticker_tx.borrow();
                if current >= SIMULATED_CEILING {
                    break;
                }
                if ticker_tx
                    .send((current + TICK_STEP).min(SIMULATED_CEILING))
                    .is_err()
                {
                    break;
                }
            }
        });

        (Self { tx, ticker }, rx)
    }

    /// Stop the ticker and pin progress at 100.
    pub fn complete(&self) {
        self.ticker.abort();
        let _ = self.tx.send(100.0);
    }

    /// Stop the ticker, leaving the last reported value in place.
    pub fn halt(&self) {
        self.ticker.abort();
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}
