//! Step-indexed replay cursor over externally simulated snapshots
//!
//! The controller owns the step index only. Every index change produces a
//! `ReplayRequest` the caller sends to the simulator; results come back
//! through `accept`, which drops anything issued for a different
//! `(source, step)` than the one currently shown.

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, LastKnownGood};

/// Tag for one re-simulation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRequest {
    /// Monotonic id, for logging and latest-wins bookkeeping
    pub id: u64,
    /// Input the simulation runs on (board text or command string)
    pub source: String,
    /// Step the snapshot is wanted for
    pub step: u32,
}

/// Outcome of handing a result to `accept`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepted {
    Applied,
    /// Issued for an index or source no longer shown, or older than the
    /// result on screen
    Stale,
}

#[derive(Debug)]
pub struct ReplayController<S> {
    source: String,
    step: u32,
    next_id: u64,
    /// Id of the result currently displayed, 0 if none
    shown_id: u64,
    snapshot: LastKnownGood<S>,
}

impl<S> ReplayController<S> {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            step: 0,
            next_id: 0,
            shown_id: 0,
            snapshot: LastKnownGood::new(),
        }
    }

    pub fn current_index(&self) -> u32 {
        self.step
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn issue(&mut self) -> ReplayRequest {
        self.next_id += 1;
        ReplayRequest {
            id: self.next_id,
            source: self.source.clone(),
            step: self.step,
        }
    }

    /// Move the cursor by `delta`, clamping at 0. Returns the request to send
    /// when the index actually changed.
    pub fn step(&mut self, delta: i64) -> Option<ReplayRequest> {
        let target = (self.step as i64).saturating_add(delta).clamp(0, u32::MAX as i64) as u32;
        if target == self.step {
            return None;
        }
        self.step = target;
        log::debug!("Replay step -> {}", self.step);
        Some(self.issue())
    }

    /// Switch to a new input. Resets the cursor and forgets the old snapshot.
    pub fn set_source(&mut self, source: impl Into<String>) -> ReplayRequest {
        self.source = source.into();
        self.step = 0;
        self.snapshot.clear();
        self.issue()
    }

    /// Re-issue the request for the current parameters
    pub fn retry(&mut self) -> ReplayRequest {
        self.issue()
    }

    /// Whether a request still matches what is on screen and is not older
    /// than the result already shown for it
    pub fn is_current(&self, request: &ReplayRequest) -> bool {
        request.step == self.step && request.source == self.source && request.id > self.shown_id
    }

    /// Apply a simulator result. Stale results are discarded.
    pub fn accept(&mut self, request: &ReplayRequest, result: Result<S, ApiError>) -> Accepted {
        if !self.is_current(request) {
            log::debug!(
                "Dropping stale replay result #{} (step {}, now {})",
                request.id,
                request.step,
                self.step
            );
            return Accepted::Stale;
        }
        self.shown_id = request.id;
        self.snapshot.apply(result);
        Accepted::Applied
    }

    /// Last snapshot that arrived for the current cursor
    pub fn snapshot(&self) -> Option<&S> {
        self.snapshot.value()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.snapshot.error()
    }

    /// The cursor ran past a timeline of `len` samples
    pub fn needs_more(&self, len: usize) -> bool {
        self.step as usize >= len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clamps_at_zero() {
        let mut replay: ReplayController<String> = ReplayController::new("236659");
        replay.step(3);
        assert_eq!(replay.current_index(), 3);
        let req = replay.step(-10).unwrap();
        assert_eq!(replay.current_index(), 0);
        assert_eq!(req.step, 0);
    }

    #[test]
    fn test_no_request_when_index_unchanged() {
        let mut replay: ReplayController<String> = ReplayController::new("x");
        assert!(replay.step(-1).is_none());
        assert!(replay.step(0).is_none());
        assert_eq!(replay.current_index(), 0);
    }

    #[test]
    fn test_requests_are_tagged() {
        let mut replay: ReplayController<String> = ReplayController::new("board");
        let a = replay.step(1).unwrap();
        let b = replay.step(1).unwrap();
        assert_eq!(a.step, 1);
        assert_eq!(b.step, 2);
        assert!(b.id > a.id);
        assert_eq!(b.source, "board");
    }

    #[test]
    fn test_stale_result_dropped() {
        let mut replay = ReplayController::new("board");
        let old = replay.step(1).unwrap();
        let new = replay.step(1).unwrap();

        assert_eq!(replay.accept(&new, Ok("two".to_string())), Accepted::Applied);
        // Older request lands late
        assert_eq!(replay.accept(&old, Ok("one".to_string())), Accepted::Stale);
        assert_eq!(replay.snapshot().map(String::as_str), Some("two"));
    }

    #[test]
    fn test_error_keeps_snapshot_and_retry_reissues() {
        let mut replay = ReplayController::new("board");
        let req = replay.step(2).unwrap();
        replay.accept(&req, Ok(5u32));

        let retry = replay.retry();
        assert_eq!(retry.step, req.step);
        assert_eq!(retry.source, req.source);
        replay.accept(&retry, Err(ApiError::Transport("timeout".into())));
        assert_eq!(replay.snapshot(), Some(&5));
        assert!(replay.error().is_some());
    }

    #[test]
    fn test_superseded_failure_does_not_clobber_retry() {
        let mut replay = ReplayController::new("board");
        let first = replay.step(1).unwrap();
        let retry = replay.retry();

        assert_eq!(replay.accept(&retry, Ok(7u32)), Accepted::Applied);
        // The original request times out after its retry already answered
        assert_eq!(
            replay.accept(&first, Err(ApiError::Transport("timeout".into()))),
            Accepted::Stale
        );
        assert_eq!(replay.snapshot(), Some(&7));
        assert!(replay.error().is_none());
    }

    #[test]
    fn test_late_original_still_fills_empty_display() {
        let mut replay = ReplayController::new("board");
        let first = replay.step(1).unwrap();
        let _retry = replay.retry();
        // Same parameters, nothing shown yet
        assert_eq!(replay.accept(&first, Ok(3u32)), Accepted::Applied);
        assert_eq!(replay.snapshot(), Some(&3));
    }

    #[test]
    fn test_set_source_resets() {
        let mut replay = ReplayController::new("a");
        let req = replay.step(4).unwrap();
        replay.accept(&req, Ok(1u8));
        let fresh = replay.set_source("b");
        assert_eq!(fresh.step, 0);
        assert_eq!(replay.current_index(), 0);
        assert!(replay.snapshot().is_none());
        assert!(!replay.is_current(&req));
    }

    #[test]
    fn test_needs_more() {
        let mut replay: ReplayController<()> = ReplayController::new("a");
        replay.step(5);
        assert!(!replay.needs_more(10));
        assert!(replay.needs_more(5));
    }
}
