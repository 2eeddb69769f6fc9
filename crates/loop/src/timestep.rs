/// Fixed steps owed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedSteps {
    /// Fixed updates to dispatch this frame.
    pub steps: u64,
    /// Whole intervals discarded by the per-frame step limit.
    pub dropped: u64,
}

/// Fixed-timestep accumulator.
///
/// Frame deltas go in, whole fixed intervals come out. After every
/// `advance`, `0 <= accumulator < interval`.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    interval: f64,
    accumulator: f64,
    max_steps: Option<u32>,
}

impl FixedTimestep {
    /// `interval` must be positive and finite; configs are validated before
    /// reaching here.
    pub fn new(interval: f64, max_steps: Option<u32>) -> Self {
        debug_assert!(interval.is_finite() && interval > 0.0);
        Self {
            interval,
            accumulator: 0.0,
            max_steps,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn max_steps(&self) -> Option<u32> {
        self.max_steps
    }

    /// Leftover time not yet consumed by a fixed step.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add a frame delta and drain every whole interval it completes.
    ///
    /// Without a step limit this returns `floor(accumulated / interval)` steps,
    /// however large. With a limit, steps beyond it are dropped and only the
    /// sub-interval remainder is kept.
    pub fn advance(&mut self, delta: f64) -> FixedSteps {
        // f64::max discards NaN
        self.accumulator += delta.max(0.0);

        let mut owed = (self.accumulator / self.interval).floor();
        let mut remainder = self.accumulator - owed * self.interval;
        // The division can round across a step boundary either way.
        if remainder < 0.0 {
            owed -= 1.0;
            remainder += self.interval;
        } else if remainder >= self.interval {
            owed += 1.0;
            remainder -= self.interval;
        }
        // Past 2^53 intervals the remainder is below the accumulator's precision.
        if !(remainder >= 0.0 && remainder < self.interval) {
            remainder = 0.0;
        }
        self.accumulator = remainder;

        // Float to int casts saturate.
        let owed = owed.max(0.0) as u64;
        let steps = match self.max_steps {
            Some(max) => owed.min(u64::from(max)),
            None => owed,
        };

        FixedSteps {
            steps,
            dropped: owed - steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HZ60: f64 = 1.0 / 60.0;

    #[test]
    fn three_frames_of_twenty_ms() {
        let mut ts = FixedTimestep::new(HZ60, None);
        let total: u64 = (0..3).map(|_| ts.advance(0.02).steps).sum();
        assert_eq!(total, 3);
        assert!((ts.accumulator() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn single_long_frame_catches_up() {
        let mut ts = FixedTimestep::new(HZ60, None);
        let out = ts.advance(0.1);
        assert_eq!(out, FixedSteps { steps: 6, dropped: 0 });
        assert!(ts.accumulator() >= 0.0 && ts.accumulator() < HZ60);
    }

    #[test]
    fn high_refresh_rate_steps_every_few_frames() {
        let mut ts = FixedTimestep::new(HZ60, None);
        let per_frame: Vec<u64> = (0..12).map(|_| ts.advance(1.0 / 144.0).steps).collect();
        assert!(per_frame.iter().all(|&s| s <= 1));
        // 12 frames at 144 Hz is exactly 5 intervals; rounding may leave the
        // last one sitting just under the threshold
        let total: u64 = per_frame.iter().sum();
        assert!(total == 4 || total == 5);
        let consumed = total as f64 * HZ60 + ts.accumulator();
        assert!((consumed - 12.0 / 144.0).abs() < 1e-9);
    }

    #[test]
    fn step_count_matches_accumulated_time() {
        let deltas = [0.013, 0.021, 0.0, 0.2, 0.0071, 0.033, 0.016, 0.5, 0.0049, 0.0102];
        let mut ts = FixedTimestep::new(HZ60, None);
        let mut steps = 0u64;
        let mut total = 0.0;
        for d in deltas {
            steps += ts.advance(d).steps;
            total += d;
            assert!(ts.accumulator() >= 0.0 && ts.accumulator() < HZ60);
        }
        let consumed = steps as f64 * HZ60 + ts.accumulator();
        assert!((consumed - total).abs() < 1e-9);
        assert_eq!(steps, (total / HZ60).floor() as u64);
    }

    #[test]
    fn limit_drops_backlog_and_keeps_remainder() {
        let mut ts = FixedTimestep::new(0.25, Some(2));
        let out = ts.advance(1.6);
        assert_eq!(out.steps, 2);
        // 1.6 = 6 intervals + 0.1; 2 run, 4 dropped
        assert_eq!(out.dropped, 4);
        assert!((ts.accumulator() - 0.1).abs() < 1e-9);

        let out = ts.advance(0.2);
        assert_eq!(out, FixedSteps { steps: 1, dropped: 0 });
    }

    #[test]
    fn unlimited_catch_up_after_stall() {
        let mut ts = FixedTimestep::new(0.5, None);
        let out = ts.advance(600.0);
        assert_eq!(out.steps, 1200);
        assert_eq!(out.dropped, 0);
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        let mut ts = FixedTimestep::new(HZ60, None);
        assert_eq!(ts.advance(-1.0).steps, 0);
        assert_eq!(ts.advance(f64::NAN).steps, 0);
        assert_eq!(ts.accumulator(), 0.0);
    }

    #[test]
    fn tiny_interval_counts_past_u32() {
        let mut ts = FixedTimestep::new(1e-9, None);
        let out = ts.advance(5.0);
        assert!(out.steps > u64::from(u32::MAX));
        assert!((out.steps as f64 - 5e9).abs() <= 1.0);
        assert_eq!(out.dropped, 0);
        assert!(ts.accumulator() >= 0.0 && ts.accumulator() < 1e-9);
    }

    #[test]
    fn tiny_interval_with_limit_reports_drops() {
        let mut ts = FixedTimestep::new(1e-9, Some(10));
        let out = ts.advance(5.0);
        assert_eq!(out.steps, 10);
        assert!(out.dropped > u64::from(u32::MAX));
    }

    #[test]
    fn enormous_delta_terminates() {
        let mut ts = FixedTimestep::new(HZ60, None);
        let out = ts.advance(1e16);
        assert!(out.steps >= 599_999_999_999_999_000);
        assert!(ts.accumulator() >= 0.0 && ts.accumulator() < HZ60);

        let out = ts.advance(0.02);
        assert_eq!(out.steps, 1);
    }
}
