//! Background bucket-boundary timer for native hosts.

use crate::clock::{next_boundary, Bucket, Clock};
use crate::error::PulseError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Longest single sleep, so cancellation is noticed promptly.
const MAX_SLEEP: Duration = Duration::from_millis(50);

/// Spawns a thread that emits each new [`Bucket`] as its boundary passes.
#[derive(Debug, Clone, Copy)]
pub struct BucketTimer {
    width_ms: i64,
}

impl BucketTimer {
    /// Create a timer for buckets `width_ms` wide.
    pub fn new(width_ms: i64) -> Result<Self, PulseError> {
        if width_ms <= 0 {
            return Err(PulseError::InvalidBucketWidth(width_ms));
        }
        Ok(Self { width_ms })
    }

    /// Bucket width in milliseconds.
    #[must_use]
    pub const fn width_ms(&self) -> i64 {
        self.width_ms
    }

    /// Start the timer thread reading `clock`.
    ///
    /// The thread exits when the handle is cancelled or dropped, or when the
    /// receiver goes away.
    pub fn start<C>(self, clock: C) -> TimerHandle
    where
        C: Clock + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);
        let (tx, rx) = mpsc::channel();
        let width_ms = self.width_ms;

        let handle = thread::spawn(move || {
            let Ok(mut boundary) = next_boundary(clock.now_ms(), width_ms) else {
                return;
            };
            while running_clone.load(Ordering::Relaxed) {
                let now = clock.now_ms();
                if now < boundary {
                    let wait = Duration::from_millis((boundary - now) as u64);
                    thread::sleep(wait.min(MAX_SLEEP));
                    continue;
                }
                let bucket = match Bucket::containing(now, width_ms) {
                    Ok(bucket) => bucket,
                    Err(e) => {
                        tracing::warn!(error = %e, "bucket timer stopped");
                        return;
                    }
                };
                boundary = bucket.end_ms();
                if tx.send(bucket).is_err() {
                    return;
                }
            }
        });

        TimerHandle {
            running,
            handle: Some(handle),
            rx,
        }
    }
}

/// Owner of a running [`BucketTimer`] thread.
pub struct TimerHandle {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    rx: Receiver<Bucket>,
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl TimerHandle {
    /// Channel of buckets, one per boundary crossed.
    #[must_use]
    pub const fn receiver(&self) -> &Receiver<Bucket> {
        &self.rx
    }

    /// Next bucket if one has arrived, without blocking.
    #[must_use]
    pub fn try_next(&self) -> Option<Bucket> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next bucket.
    #[must_use]
    pub fn next_timeout(&self, timeout: Duration) -> Option<Bucket> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Whether the thread has not been asked to stop.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the thread and wait for it to exit.
    pub fn cancel(mut self) {
        self.stop_internal();
    }

    fn stop_internal(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop_internal();
    }
}
