//! Timers that widen the evader's choices and stop long rounds.

use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::debug;

use crate::PursuitConfig;

/// Messages delivered to a round through its inbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundSignal {
    /// Replace the upper bound of the evader's random candidate offset.
    WidenWindow {
        /// New upper bound.
        limit_index: usize,
    },
    /// Stop the round.
    Abort,
}

/// One-shot deadlines evaluated against the round's simulated clock.
#[derive(Clone, Debug)]
pub struct Watchdog {
    widen_after: Duration,
    abort_after: Duration,
    widened_limit_index: usize,
    widened: bool,
    aborted: bool,
}

impl Watchdog {
    /// Creates a watchdog armed with the configured deadlines.
    #[must_use]
    pub fn new(config: &PursuitConfig) -> Self {
        Self {
            widen_after: config.widen_after,
            abort_after: config.abort_after,
            widened_limit_index: config.widened_limit_index,
            widened: false,
            aborted: false,
        }
    }

    /// Posts every deadline passed by `elapsed` that has not fired yet.
    pub fn poll(&mut self, elapsed: Duration, inbox: &Sender<RoundSignal>) {
        if !self.widened && elapsed >= self.widen_after {
            self.widened = true;
            debug!("widen deadline passed after {elapsed:?}");
            let _ = inbox.send(RoundSignal::WidenWindow {
                limit_index: self.widened_limit_index,
            });
        }

        if !self.aborted && elapsed >= self.abort_after {
            self.aborted = true;
            debug!("abort deadline passed after {elapsed:?}");
            let _ = inbox.send(RoundSignal::Abort);
        }
    }
}

/// Background thread posting the deadlines against the wall clock.
///
/// Dropping the handle cancels any deadline still pending and joins the
/// thread without waiting for the deadline to pass.
#[derive(Debug)]
pub struct WallClock {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl WallClock {
    /// Waits until every deadline has been posted or the inbox has closed.
    pub fn join(mut self) -> thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

impl Drop for WallClock {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns a thread posting both deadlines against the wall clock.
///
/// The thread exits after the last deadline, as soon as the returned handle
/// is dropped, or at the next deadline once the inbox has been closed.
#[must_use = "dropping the handle cancels the deadlines"]
pub fn spawn_wall_clock(config: &PursuitConfig, inbox: Sender<RoundSignal>) -> WallClock {
    let widen_after = config.widen_after;
    let abort_after = config.abort_after;
    let limit_index = config.widened_limit_index;
    let (stop, stopped) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        let mut schedule = vec![
            (widen_after, RoundSignal::WidenWindow { limit_index }),
            (abort_after, RoundSignal::Abort),
        ];
        schedule.sort_by_key(|(deadline, _)| *deadline);

        let mut waited = Duration::ZERO;
        for (deadline, signal) in schedule {
            match stopped.recv_timeout(deadline.saturating_sub(waited)) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("wall clock cancelled after {waited:?}");
                    return;
                }
            }
            waited = deadline;
            if inbox.send(signal).is_err() {
                return;
            }
        }
    });

    WallClock {
        stop: Some(stop),
        handle: Some(handle),
    }
}
