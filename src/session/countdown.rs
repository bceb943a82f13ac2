//! Countdown tick source
//!
//! Spawns a tokio task that sends one message per period on an mpsc
//! channel until it is stopped. The session itself never sleeps; the front
//! end forwards each tick as `Command::Tick`.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handle to a running countdown task
#[derive(Debug)]
pub struct Countdown {
    /// Join handle for the ticking task
    handle: Option<JoinHandle<()>>,
    /// Cancellation sender for stopping the task
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl Countdown {
    /// Start ticking every `period` on `tick_tx`.
    ///
    /// The first tick is sent one full period after the start. Must be
    /// called from within a tokio runtime.
    pub fn start(period: Duration, tick_tx: mpsc::Sender<()>) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut cancel_rx => break,
                    _ = interval.tick() => {
                        if tick_tx.send(()).await.is_err() {
                            // Receiver gone, nobody is counting anymore
                            break;
                        }
                    }
                }
            }
            debug!("countdown task exited");
        });

        Self {
            handle: Some(handle),
            cancel_tx: Some(cancel_tx),
        }
    }

    /// A countdown that is not running
    pub fn idle() -> Self {
        Self {
            handle: None,
            cancel_tx: None,
        }
    }

    /// Check if the ticking task is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    /// Stop ticking and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
