//! Job guards
//!
//! One exclusivity gate per capture kind. Acquisition is a single atomic
//! test-and-set and never waits: a held guard turns the caller away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::types::CaptureKind;

/// Exclusivity gate for a single capture kind.
#[derive(Debug)]
pub struct JobGuard {
    kind: CaptureKind,
    locked: AtomicBool,
}

impl JobGuard {
    pub fn new(kind: CaptureKind) -> Self {
        Self {
            kind,
            locked: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> CaptureKind {
        self.kind
    }

    pub fn is_held(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Take the guard if it is free. Returns `None` immediately when held.
    pub fn try_acquire(self: &Arc<Self>) -> Option<JobPermit> {
        self.locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        debug!(kind = %self.kind, "Job guard acquired");
        Some(JobPermit {
            guard: Arc::clone(self),
            acquired_at: Instant::now(),
        })
    }

    fn release(&self) {
        self.locked.store(false, Ordering::Release);
        debug!(kind = %self.kind, "Job guard released");
    }
}

/// Proof of holding a [`JobGuard`]. The guard is released when the permit
/// drops, so every exit path (including task cancellation) frees it once.
#[derive(Debug)]
pub struct JobPermit {
    guard: Arc<JobGuard>,
    acquired_at: Instant,
}

impl JobPermit {
    pub fn kind(&self) -> CaptureKind {
        self.guard.kind
    }

    pub fn held_for(&self) -> std::time::Duration {
        self.acquired_at.elapsed()
    }

    /// Release explicitly. Equivalent to dropping the permit.
    pub fn release(self) {}
}

impl Drop for JobPermit {
    fn drop(&mut self) {
        self.guard.release();
    }
}

/// The process-wide pair of guards, one per [`CaptureKind`].
#[derive(Debug, Clone)]
pub struct JobGuards {
    snapshot: Arc<JobGuard>,
    clip: Arc<JobGuard>,
}

impl JobGuards {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(JobGuard::new(CaptureKind::Snapshot)),
            clip: Arc::new(JobGuard::new(CaptureKind::Clip)),
        }
    }

    pub fn get(&self, kind: CaptureKind) -> &Arc<JobGuard> {
        match kind {
            CaptureKind::Snapshot => &self.snapshot,
            CaptureKind::Clip => &self.clip,
        }
    }

    pub fn try_acquire(&self, kind: CaptureKind) -> Option<JobPermit> {
        self.get(kind).try_acquire()
    }

    pub fn is_held(&self, kind: CaptureKind) -> bool {
        self.get(kind).is_held()
    }
}

impl Default for JobGuards {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_fast() {
        let guards = JobGuards::new();
        let permit = guards.try_acquire(CaptureKind::Clip).unwrap();
        assert!(guards.is_held(CaptureKind::Clip));
        assert!(guards.try_acquire(CaptureKind::Clip).is_none());
        drop(permit);
        assert!(!guards.is_held(CaptureKind::Clip));
        assert!(guards.try_acquire(CaptureKind::Clip).is_some());
    }

    #[test]
    fn kinds_are_independent() {
        let guards = JobGuards::new();
        let _clip = guards.try_acquire(CaptureKind::Clip).unwrap();
        let snap = guards.try_acquire(CaptureKind::Snapshot);
        assert!(snap.is_some());
        assert_eq!(snap.unwrap().kind(), CaptureKind::Snapshot);
    }

    #[test]
    fn explicit_release_frees_guard() {
        let guards = JobGuards::new();
        guards.try_acquire(CaptureKind::Snapshot).unwrap().release();
        assert!(!guards.is_held(CaptureKind::Snapshot));
    }

    #[test]
    fn failed_acquire_has_no_side_effect() {
        let guards = JobGuards::new();
        let permit = guards.try_acquire(CaptureKind::Snapshot).unwrap();
        for _ in 0..10 {
            assert!(guards.try_acquire(CaptureKind::Snapshot).is_none());
        }
        drop(permit);
        assert!(!guards.is_held(CaptureKind::Snapshot));
    }

    #[test]
    fn exactly_one_winner_across_threads() {
        let guards = JobGuards::new();
        let barrier = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guards = guards.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    guards.try_acquire(CaptureKind::Clip).map(std::mem::forget).is_some()
                })
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
