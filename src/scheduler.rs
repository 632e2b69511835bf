//! Frame drivers. Both invoke the same per-frame step function; one loops
//! until the step stops, the other advances one frame per external tick.

use crate::frame::FrameOutcome;

/// Run the step in a blocking loop until it reports `Stopped`. Returns the
/// number of frames rendered.
pub fn run_blocking(mut step: impl FnMut() -> FrameOutcome) -> u64 {
    let mut frames = 0;
    while step() == FrameOutcome::Rendered {
        frames += 1;
    }
    frames
}

/// Tick-driven frame driver for hosts with their own event loop. Once the
/// step reports `Stopped` the scheduler latches and ignores further ticks.
#[derive(Debug, Default)]
pub struct TickScheduler {
    stopped: bool,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, step: impl FnOnce() -> FrameOutcome) -> FrameOutcome {
        if self.stopped {
            return FrameOutcome::Stopped;
        }
        let outcome = step();
        if outcome == FrameOutcome::Stopped {
            self.stopped = true;
        }
        outcome
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
