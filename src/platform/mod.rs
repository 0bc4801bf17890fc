//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web)
//! - Pointer input mapping to normalized coordinates
//! - Listener teardown when a visualizer is detached

use std::cell::Cell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Per-frame callback that stops for good once its token is cancelled
pub struct FrameLoop<F: FnMut()> {
    token: CancelToken,
    frame: F,
    frames: u64,
}

impl<F: FnMut()> FrameLoop<F> {
    pub fn new(token: CancelToken, frame: F) -> Self {
        Self {
            token,
            frame,
            frames: 0,
        }
    }

    /// Run one frame if still live. Returns whether another frame should be
    /// scheduled.
    pub fn tick(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        (self.frame)();
        self.frames += 1;
        !self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_frame_loop_stops_after_cancel() {
        let token = CancelToken::new();
        let drawn = Rc::new(Cell::new(0));
        let counter = drawn.clone();
        let mut frames = FrameLoop::new(token.clone(), move || counter.set(counter.get() + 1));

        assert!(frames.tick());
        assert!(frames.tick());
        token.cancel();
        assert!(!frames.tick());
        assert!(!frames.tick());
        assert_eq!(drawn.get(), 2);
        assert_eq!(frames.frames(), 2);
    }

    #[test]
    fn test_cancel_inside_frame_stops_rescheduling() {
        let token = CancelToken::new();
        let inner = token.clone();
        let mut frames = FrameLoop::new(token, move || inner.cancel());
        assert!(!frames.tick());
        assert_eq!(frames.frames(), 1);
        assert!(frames.token().is_cancelled());
    }
}
