//! Loop controller: clock, fixed-timestep accumulator, frame ticker and the
//! `Sketch` lifecycle that ties them to a surface, camera and scene.
//!
//! # Invariants
//! - At most one ticker subscription per sketch.
//! - While stopped, no callback runs and nothing renders.
//! - After each tick, `0 <= accumulator < fixed_update_interval`.
//! - Every fixed update in a tick receives that tick's `(delta, elapsed)`.
//! - Exactly one render per tick, after all updates.

mod clock;
mod sketch;
mod stats;
mod ticker;
mod timestep;

pub use clock::{Clock, FrameTime, ManualTime, MonotonicTime, TimeSource};
pub use sketch::{Callbacks, LoopState, Sketch, TickReport, UpdateFn};
pub use stats::{FrameTimer, LoopStats};
pub use ticker::{Subscription, Ticker};
pub use timestep::{FixedSteps, FixedTimestep};

pub fn crate_info() -> &'static str {
    "sketch-loop v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("loop"));
    }
}
