//! Periodic recompute scheduling
//!
//! `Ticker` is a plain interval gate so cadence logic stays testable
//! without threads. `spawn_global_recompute` runs the engine's global
//! pattern aggregation on a background thread until stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::engine::InsightEngine;

/// Sleep granularity of the background loop, so stop() returns promptly
const POLL_SLICE: Duration = Duration::from_millis(200);

/// Interval gate over monotonic time
///
/// `poll` returns true when at least one full interval has elapsed since
/// the last firing. The first poll always fires.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Handle to a running background recompute loop
pub struct RecomputeHandle {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RecomputeHandle {
    /// Signal the loop to stop and wait for the thread to exit
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RecomputeHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Run `recompute_global_patterns` every `interval` until stopped
pub fn spawn_global_recompute(engine: Arc<InsightEngine>, interval: Duration) -> RecomputeHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let handle = std::thread::spawn(move || {
        let mut ticker = Ticker::new(interval);
        while !stop_flag.load(Ordering::Relaxed) {
            if ticker.poll(Instant::now()) {
                engine.recompute_global_patterns();
            }
            std::thread::sleep(POLL_SLICE.min(interval));
        }
    });

    RecomputeHandle {
        stop,
        handle: Some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_fires() {
        let mut ticker = Ticker::new(Duration::from_secs(60));
        assert!(ticker.poll(Instant::now()));
    }

    #[test]
    fn test_poll_respects_interval() {
        let mut ticker = Ticker::new(Duration::from_secs(10));
        let start = Instant::now();
        assert!(ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_secs(5)));
        assert!(!ticker.poll(start + Duration::from_secs(9)));
        assert!(ticker.poll(start + Duration::from_secs(10)));
        assert!(!ticker.poll(start + Duration::from_secs(12)));
    }

    #[test]
    fn test_spawn_and_stop() {
        let engine = Arc::new(InsightEngine::default());
        let handle = spawn_global_recompute(Arc::clone(&engine), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(50));
        handle.stop();
        // the first tick fires immediately, so the cache is populated
        assert!(engine.global_pattern("global_activity").is_some());
    }
}
