//! Per-frame callback scheduling.
//!
//! The host owns the frame source (an animation-frame callback, a timer, a
//! tokio interval). Components request a frame, get a handle back, and are
//! handed that handle again when the frame fires. A [`FrameSlot`] holds the
//! single outstanding request of one component.

use std::collections::BTreeSet;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Source of cancelable per-frame callbacks.
pub trait FrameScheduler {
    /// Request a callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-process frame queue, drained by the host once per frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every frame that is due now, oldest first.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}

/// At most one pending frame, always cancelable.
#[derive(Debug, Default)]
pub struct FrameSlot {
    pending: Option<FrameHandle>,
}

impl FrameSlot {
    /// Replace any outstanding request with a fresh one.
    pub fn schedule<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.cancel(scheduler);
        self.pending = Some(scheduler.request_frame());
    }

    pub fn cancel<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Consume `handle` if it is the outstanding request.
    ///
    /// Returns false for stale handles, which must not run.
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
