//! Background gesture tracking
//!
//! The tracker owns its landmark source for the whole session. The source is
//! opened on the worker thread and dropped there when the loop ends, so a
//! camera or child process is always released on shutdown.

use crate::error::DetectorError;
use crate::interpreter::GestureInterpreter;
use crate::landmarks::LandmarkFrame;
use crate::source::{LandmarkSource, SourcePoll};
use crate::state::GestureState;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Minimum spacing between repeated warnings from one tracker
const WARN_INTERVAL: Duration = Duration::from_secs(2);

pub struct GestureTracker {
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GestureTracker {
    /// Start tracking on a dedicated thread.
    ///
    /// `open` runs on that thread. If it fails the error is logged and the
    /// shared state simply never sees a hand.
    pub fn spawn<S, F>(
        open: F,
        interpreter: GestureInterpreter,
        state: Arc<GestureState>,
    ) -> Result<Self, DetectorError>
    where
        S: LandmarkSource + 'static,
        F: FnOnce() -> Result<S, DetectorError> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let stop = Arc::clone(&stop);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("gesture-tracker".into())
                .spawn(move || {
                    match open() {
                        Ok(source) => {
                            log::info!("✓ Landmark source opened");
                            track(source, &interpreter, &state, &stop);
                        }
                        Err(e) => log::error!("Failed to open landmark source: {e}"),
                    }
                    state.clear_hand();
                    running.store(false, Ordering::Release);
                })?
        };

        Ok(Self {
            stop,
            running,
            handle: Some(handle),
        })
    }

    /// Whether the worker loop is still alive
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Signal the worker and wait for it to finish. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Gesture tracker thread panicked");
            }
        }
    }
}

impl Drop for GestureTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn track<S: LandmarkSource>(
    mut source: S,
    interpreter: &GestureInterpreter,
    state: &GestureState,
    stop: &AtomicBool,
) {
    let mut warnings = WarnLimiter::new(WARN_INTERVAL);

    while !stop.load(Ordering::Acquire) {
        let poll = source.poll();

        // A frame that finished after shutdown was requested is discarded.
        if stop.load(Ordering::Acquire) {
            break;
        }

        match poll {
            Ok(SourcePoll::Frame(raw)) => {
                let frame = LandmarkFrame::try_from(raw).unwrap_or_else(|e| {
                    warnings.warn(format_args!("Ignoring malformed landmark frame: {e}"));
                    LandmarkFrame::NoHand
                });
                state.publish(&interpreter.interpret(&frame, state.mode()));
            }
            Ok(SourcePoll::Idle) => {}
            Ok(SourcePoll::Closed) => {
                log::info!("Landmark source closed");
                break;
            }
            Err(e) if !e.is_fatal() => {
                warnings.warn(&e);
                state.publish(&interpreter.interpret(&LandmarkFrame::NoHand, state.mode()));
            }
            Err(e) => {
                log::error!("Landmark source failed: {e}");
                break;
            }
        }
    }

    log::debug!("Gesture tracker stopped after {} frames", state.frames());
}

/// Logs at most one warning per interval and counts the rest
struct WarnLimiter {
    interval: Duration,
    last: Option<Instant>,
    suppressed: u32,
}

impl WarnLimiter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            suppressed: 0,
        }
    }

    fn warn(&mut self, message: impl Display) {
        let now = Instant::now();
        if self.last.is_some_and(|last| now.duration_since(last) < self.interval) {
            self.suppressed += 1;
            return;
        }

        if self.suppressed > 0 {
            log::warn!("{message} ({} similar suppressed)", self.suppressed);
        } else {
            log::warn!("{message}");
        }
        self.last = Some(now);
        self.suppressed = 0;
    }
}
