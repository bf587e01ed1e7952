//! CPU/GPU synchronization for streaming regions.
//!
//! Every flushed region carries a fence. Before the CPU writes into that region
//! again, the fence must be waited on and released. `Signaled` only records that
//! a non-blocking query already saw completion; the slot still goes through
//! `wait` so the release path is the same in both cases.

use super::StreamBackend;

/// Per-region fence slot.
#[derive(Debug)]
pub enum FenceState<F> {
    /// No outstanding GPU work references the region.
    Absent,
    /// Work was issued; completion not yet observed.
    Pending(F),
    /// Completion observed by `retire_completed`; fence not yet released.
    Signaled(F),
}

impl<F> Default for FenceState<F> {
    fn default() -> Self {
        FenceState::Absent
    }
}

impl<F> FenceState<F> {
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, FenceState::Absent)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, FenceState::Pending(_))
    }

    /// Records a new fence for the region.
    ///
    /// The slot must have been released by `wait` first.
    pub fn place(&mut self, fence: F) {
        debug_assert!(
            self.is_absent(),
            "fence placed over an unreleased fence; region was written without waiting"
        );
        *self = FenceState::Pending(fence);
    }

    /// Non-blocking: promotes `Pending` to `Signaled` if the GPU is done.
    pub fn retire_completed<B>(&mut self, backend: &mut B)
    where
        B: StreamBackend<Fence = F> + ?Sized,
    {
        if let FenceState::Pending(fence) = self {
            if backend.is_signaled(fence) {
                if let FenceState::Pending(fence) = std::mem::take(self) {
                    *self = FenceState::Signaled(fence);
                }
            }
        }
    }

    /// Makes the region safe to write. Blocks on a pending fence, then releases it.
    ///
    /// Returns `true` if a blocking wait was issued.
    pub fn wait<B>(&mut self, backend: &mut B) -> bool
    where
        B: StreamBackend<Fence = F> + ?Sized,
    {
        match std::mem::take(self) {
            FenceState::Absent => false,
            FenceState::Signaled(fence) => {
                drop(fence);
                false
            }
            FenceState::Pending(fence) => {
                backend.wait(&fence);
                drop(fence);
                true
            }
        }
    }
}
