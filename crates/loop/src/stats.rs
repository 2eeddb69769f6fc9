/// Rolling window of recent frame deltas, in seconds.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: Vec<f64>,
    next: usize,
    len: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity.max(1)],
            next: 0,
            len: 0,
        }
    }

    pub fn record(&mut self, delta: f64) {
        let capacity = self.samples.len();
        self.samples[self.next] = delta;
        self.next = (self.next + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    fn window(&self) -> &[f64] {
        &self.samples[..self.len]
    }

    pub fn count(&self) -> usize {
        self.len
    }

    pub fn average(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.window().iter().sum::<f64>() / self.len as f64
    }

    pub fn max(&self) -> f64 {
        self.window().iter().copied().fold(0.0, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.window()
            .iter()
            .copied()
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Average frames per second over the window; zero when empty.
    pub fn fps(&self) -> f64 {
        let avg = self.average();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

/// Counters for a loop's lifetime, plus a short frame-time history.
#[derive(Debug, Clone)]
pub struct LoopStats {
    /// Ticks run (one render each).
    pub frames: u64,
    /// Fixed updates dispatched.
    pub fixed_steps: u64,
    /// Fixed updates discarded by the per-frame step limit.
    pub dropped_steps: u64,
    /// Largest number of fixed updates dispatched in one tick.
    pub max_steps_in_frame: u64,
    pub frame_times: FrameTimer,
}

impl Default for LoopStats {
    fn default() -> Self {
        Self {
            frames: 0,
            fixed_steps: 0,
            dropped_steps: 0,
            max_steps_in_frame: 0,
            frame_times: FrameTimer::new(120),
        }
    }
}

impl LoopStats {
    pub fn record(&mut self, delta: f64, steps: u64, dropped: u64) {
        self.frames += 1;
        self.fixed_steps += steps;
        self.dropped_steps += dropped;
        self.max_steps_in_frame = self.max_steps_in_frame.max(steps);
        self.frame_times.record(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(0.010);
        timer.record(0.020);
        timer.record(0.030);

        assert_eq!(timer.count(), 3);
        assert!((timer.average() - 0.020).abs() < 1e-12);
        assert_eq!(timer.max(), 0.030);
        assert_eq!(timer.min(), 0.010);
        assert!((timer.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(0.010);
        timer.record(0.020);
        timer.record(0.030);

        assert_eq!(timer.count(), 2);
        assert!((timer.average() - 0.025).abs() < 1e-12);
        assert_eq!(timer.min(), 0.020);
    }

    #[test]
    fn empty_timer_is_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), 0.0);
        assert_eq!(timer.min(), 0.0);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn loop_stats_accumulate() {
        let mut stats = LoopStats::default();
        stats.record(0.1, 6, 0);
        stats.record(0.02, 1, 0);
        stats.record(1.0, 5, 55);
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.fixed_steps, 12);
        assert_eq!(stats.dropped_steps, 55);
        assert_eq!(stats.max_steps_in_frame, 6);
        assert_eq!(stats.frame_times.count(), 3);
    }
}
