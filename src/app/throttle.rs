// ColaCup - app/throttle.rs
//
// Time-gated executor: runs submitted work on a dedicated background thread,
// at most once per interval, last call wins.
//
// Architecture:
//   - `Throttler` is owned by the caller; `run_worker` runs on its own thread.
//   - One pending slot guarded by a mutex. `execute` replaces whatever is in
//     the slot, so superseded work is dropped without ever running.
//   - The worker sleeps on a condvar until the pending job is due, a newer
//     job replaces it, or the throttler is dropped.
//
// Delay rule: every job is due `interval` after the call that submitted it,
// so calls closer together than `interval` always collapse into the last one,
// and two runs are never closer than `interval`.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PendingJob {
    due: Instant,
    work: Job,
}

#[derive(Default)]
struct ThrottleState {
    pending: Option<PendingJob>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<ThrottleState>,
    wake: Condvar,
}

/// Runs work at most once per `interval` on a background thread.
pub struct Throttler {
    interval: Duration,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Throttler {
    /// Create a throttler and start its worker thread.
    pub fn new(interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(ThrottleState::default()),
            wake: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || run_worker(worker_shared));

        tracing::debug!(interval_ms = interval.as_millis() as u64, "Throttler started");

        Self {
            interval,
            shared,
            worker: Some(worker),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule `work`, replacing any job that has not started yet.
    pub fn execute<F>(&self, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let due = Instant::now() + self.interval;
        let mut state = self.shared.state.lock();

        if state.pending.is_some() {
            tracing::trace!("Throttled job replaced before running");
        }
        state.pending = Some(PendingJob {
            due,
            work: Box::new(work),
        });
        drop(state);

        self.shared.wake.notify_one();
    }

    /// True while a submitted job is waiting to run.
    pub fn has_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl Drop for Throttler {
    fn drop(&mut self) {
        self.shared.state.lock().shutdown = true;
        self.shared.wake.notify_one();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Throttler worker panicked");
            }
        }
    }
}

fn run_worker(shared: Arc<Shared>) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            return;
        }

        let due = match &state.pending {
            None => {
                shared.wake.wait(&mut state);
                continue;
            }
            Some(job) => job.due,
        };

        if Instant::now() < due {
            // Woken early either by a replacement or by timeout; re-check.
            shared.wake.wait_until(&mut state, due);
            continue;
        }

        let Some(job) = state.pending.take() else {
            continue;
        };

        // Run without the lock so `execute` never blocks on the work itself.
        drop(state);
        (job.work)();
        state = shared.state.lock();
    }
}
