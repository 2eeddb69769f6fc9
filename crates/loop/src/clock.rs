use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic source of timestamps, in seconds.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall-clock time from `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced time. Clones share the same timeline, so a test (or a
/// headless driver) can keep one handle and give another to the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<f64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// One clock sample: seconds since the previous sample and since start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub delta: f64,
    pub elapsed: f64,
}

/// Clock measuring time since start and since the last sample.
///
/// Started on construction and never reset. A source that steps backwards is
/// treated as standing still, so neither `delta` nor `elapsed` goes negative.
#[derive(Debug)]
pub struct Clock<T: TimeSource> {
    source: T,
    start: f64,
    last: f64,
}

impl<T: TimeSource> Clock<T> {
    pub fn new(source: T) -> Self {
        let start = source.now();
        Self {
            source,
            start,
            last: start,
        }
    }

    /// Take a sample. The first sample's delta is measured from construction.
    pub fn sample(&mut self) -> FrameTime {
        let now = self.source.now().max(self.last);
        let delta = now - self.last;
        self.last = now;
        FrameTime {
            delta,
            elapsed: now - self.start,
        }
    }

    /// Elapsed time as of the last sample.
    pub fn elapsed(&self) -> f64 {
        self.last - self.start
    }
}
