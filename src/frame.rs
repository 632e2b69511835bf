//! Per-frame state machine: acquire a presentable frame, encode, present,
//! and account for every acquisition with a matching release.

/// Result of one frame step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame was encoded and presented; the loop may continue.
    Rendered,
    /// No presentable frame was available. Ends the loop, not retried.
    Stopped,
}

/// Source of presentable frames. The surface in production; mockable in
/// tests.
pub trait FrameSource {
    type Frame;

    /// Acquire the current presentable frame, or `None` when acquisition
    /// fails.
    fn acquire(&mut self) -> Option<Self::Frame>;

    /// Present an acquired frame, consuming it.
    fn present(&mut self, frame: Self::Frame);
}

/// Counts frame acquisitions and releases. Transient frame resources must
/// never outlive the frame that acquired them, so the two counts are equal
/// whenever no frame is in flight.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameLedger {
    acquired: u64,
    released: u64,
}

impl FrameLedger {
    pub fn record_acquired(&mut self) {
        self.acquired += 1;
    }

    pub fn record_released(&mut self) {
        self.released += 1;
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn released(&self) -> u64 {
        self.released
    }

    pub fn balanced(&self) -> bool {
        self.acquired == self.released
    }
}

/// Drive one frame: acquire, encode, present, release. `encode` runs with
/// the frame borrowed and must submit its command buffer before returning;
/// presentation follows immediately after. All transients created inside
/// `encode` are dropped before this function returns.
pub fn drive_frame<S: FrameSource>(
    source: &mut S,
    ledger: &mut FrameLedger,
    encode: impl FnOnce(&mut S::Frame),
) -> FrameOutcome {
    let Some(mut frame) = source.acquire() else {
        return FrameOutcome::Stopped;
    };
    ledger.record_acquired();
    encode(&mut frame);
    source.present(frame);
    ledger.record_released();
    FrameOutcome::Rendered
}
