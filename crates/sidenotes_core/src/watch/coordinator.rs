//! Worker that turns watch events into refresh callbacks.

use super::subscription::{FsSubscription, Next, SubscriptionCloser};
use super::WatchError;
use crate::config::NotesConfig;
use log::{debug, error, info};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Inactive,
    Active,
}

/// Owns the watch worker thread.
///
/// With a zero debounce window the callback runs once per event. Otherwise
/// events arriving within the window after the first one collapse into a
/// single callback at the end of the window.
pub struct WatchCoordinator {
    closer: SubscriptionCloser,
    worker: Option<JoinHandle<()>>,
}

impl WatchCoordinator {
    /// Registers both watches and starts the worker (Inactive -> Active).
    pub fn start<F>(config: &NotesConfig, on_change: F) -> Result<Self, WatchError>
    where
        F: Fn() + Send + 'static,
    {
        let subscription = FsSubscription::open(config)?;
        let closer = subscription.closer();
        let debounce = config.debounce();

        let worker = std::thread::Builder::new()
            .name("sidenotes-watch".to_string())
            .spawn(move || run_worker(subscription, debounce, on_change))
            .map_err(WatchError::Spawn)?;

        info!(
            "event=watch_start module=watch status=ok debounce_ms={}",
            debounce.as_millis()
        );
        Ok(Self {
            closer,
            worker: Some(worker),
        })
    }

    pub fn state(&self) -> WatchState {
        if self.worker.is_some() {
            WatchState::Active
        } else {
            WatchState::Inactive
        }
    }

    /// Releases both watches and joins the worker (Active -> Inactive).
    ///
    /// Idempotent. Must not be called from inside the callback.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.closer.close();
        if worker.join().is_err() {
            error!("event=watch_stop module=watch status=error reason=worker_panicked");
            return;
        }
        info!("event=watch_stop module=watch status=ok");
    }
}

impl Drop for WatchCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<F: Fn()>(mut subscription: FsSubscription, debounce: Duration, on_change: F) {
    loop {
        let first = match subscription.next_event(None) {
            Next::Event(event) => event,
            Next::Timeout => continue,
            Next::Closed => break,
        };
        debug!(
            "event=watch_event module=watch status=ok scope={:?} kind={:?} path={}",
            first.scope,
            first.kind,
            first.path.display()
        );

        if debounce.is_zero() {
            on_change();
            continue;
        }

        let deadline = Instant::now() + debounce;
        let mut coalesced = 1usize;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match subscription.next_event(Some(remaining)) {
                Next::Event(_) => coalesced += 1,
                Next::Timeout => break,
                Next::Closed => {
                    subscription.close();
                    return;
                }
            }
        }
        debug!(
            "event=watch_flush module=watch status=ok coalesced={}",
            coalesced
        );
        on_change();
    }
    subscription.close();
}
