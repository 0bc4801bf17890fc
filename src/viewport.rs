//! Pan/zoom transform between logical space and the drawing surface
//!
//! Logical space has +y up. The drawing surface is normalized to `[0, 1]`
//! on both axes with +y down; anything outside that range is off-screen.
//!
//! ```text
//!   logical             drawing
//!      +y              (0,0)----- +x
//!       |                |
//!  -x --+-- +x           |
//!       |                +y
//!      -y
//! ```
//!
//! State changes go through `reduce` so the render loop only ever reads.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{
    MIN_FIT_SIZE, MIN_SPACE_SIZE, VIEWPORT_MARGIN, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};

/// Wheel zoom factors (window size multipliers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomFactors {
    /// Applied on wheel up, < 1 zooms in
    pub zoom_in: f64,
    /// Applied on wheel down, > 1 zooms out
    pub zoom_out: f64,
}

impl Default for ZoomFactors {
    fn default() -> Self {
        Self {
            zoom_in: ZOOM_IN_FACTOR,
            zoom_out: ZOOM_OUT_FACTOR,
        }
    }
}

/// Pointer input in normalized drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(DVec2),
    Move(DVec2),
    Up(DVec2),
    /// Pointer left the surface; an open drag is abandoned
    Leave,
    /// Negative `delta_y` is wheel up
    Wheel { delta_y: f64, at: DVec2 },
}

/// Rounded logical coordinate under the cursor and where to draw its crosshair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    pub logical: (i64, i64),
    pub anchor: DVec2,
}

/// Square logical window mapped onto the drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    space_size: f64,
    /// Logical coordinate of the drawing surface's top-left corner
    top_left: DVec2,
    cursor: Option<DVec2>,
    drag_start: Option<DVec2>,
    zoom: ZoomFactors,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            space_size: MIN_FIT_SIZE,
            top_left: DVec2::new(-1.0, 1.0),
            cursor: None,
            drag_start: None,
            zoom: ZoomFactors::default(),
        }
    }
}

impl Viewport {
    /// Fit a window around the points of interest. The origin box
    /// `[-1, 1]^2` is always included, then 5% margin is added.
    pub fn fit(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut min = DVec2::splat(-1.0);
        let mut max = DVec2::splat(1.0);
        for p in points {
            if !p.is_finite() {
                log::warn!("Skipping non-finite point {:?} while fitting viewport", p);
                continue;
            }
            min = min.min(p);
            max = max.max(p);
        }

        let extent = max - min;
        let size = extent.x.max(extent.y);
        let pad = size * VIEWPORT_MARGIN / 2.0;
        Self {
            space_size: (size * (1.0 + VIEWPORT_MARGIN)).max(MIN_FIT_SIZE),
            top_left: DVec2::new(min.x - pad, max.y + pad),
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: ZoomFactors) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn space_size(&self) -> f64 {
        self.space_size
    }

    pub fn top_left(&self) -> DVec2 {
        self.top_left
    }

    pub fn cursor(&self) -> Option<DVec2> {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Live drag offset, zero unless a drag is in progress
    pub fn drag_offset(&self) -> DVec2 {
        match (self.drag_start, self.cursor) {
            (Some(start), Some(cursor)) => cursor - start,
            _ => DVec2::ZERO,
        }
    }

    fn committed_to_drawing(&self, p: DVec2) -> DVec2 {
        DVec2::new(
            (p.x - self.top_left.x) / self.space_size,
            (self.top_left.y - p.y) / self.space_size,
        )
    }

    fn committed_to_logical(&self, n: DVec2) -> DVec2 {
        DVec2::new(
            self.top_left.x + n.x * self.space_size,
            self.top_left.y - n.y * self.space_size,
        )
    }

    /// Logical point to normalized drawing coordinates, following a live drag
    pub fn to_drawing(&self, p: DVec2) -> DVec2 {
        self.committed_to_drawing(p) + self.drag_offset()
    }

    /// Exact inverse of `to_drawing`
    pub fn to_logical(&self, n: DVec2) -> DVec2 {
        self.committed_to_logical(n - self.drag_offset())
    }

    /// Rescale the window by `factor`, keeping the logical point under `at` fixed
    pub fn zoom_at(&mut self, factor: f64, at: DVec2) {
        let anchor = self.to_logical(at);
        let q = at - self.drag_offset();
        self.space_size = (self.space_size * factor).max(MIN_SPACE_SIZE);
        self.top_left = DVec2::new(
            anchor.x - q.x * self.space_size,
            anchor.y + q.y * self.space_size,
        );
    }

    fn commit_drag(&mut self) {
        let offset = self.drag_offset();
        self.top_left.x -= offset.x * self.space_size;
        self.top_left.y += offset.y * self.space_size;
    }

    /// Apply one pointer event in place
    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(p) => {
                self.drag_start = Some(p);
                self.cursor = Some(p);
            }
            PointerEvent::Move(p) => self.cursor = Some(p),
            PointerEvent::Up(p) => {
                self.cursor = Some(p);
                self.commit_drag();
                self.drag_start = None;
            }
            PointerEvent::Leave => {
                self.cursor = None;
                self.drag_start = None;
            }
            PointerEvent::Wheel { delta_y, at } => {
                if delta_y < 0.0 {
                    self.zoom_at(self.zoom.zoom_in, at);
                } else if delta_y > 0.0 {
                    self.zoom_at(self.zoom.zoom_out, at);
                }
            }
        }
    }

    /// Pure form of `apply`
    pub fn reduce(mut self, event: PointerEvent) -> Self {
        self.apply(event);
        self
    }

    /// Coordinate readout for the cursor, pinned to the drag start while dragging
    pub fn cursor_readout(&self) -> Option<CursorReadout> {
        let cursor = self.cursor?;
        let probe = self.drag_start.unwrap_or(cursor);
        let logical = self.committed_to_logical(probe).round();
        Some(CursorReadout {
            logical: (logical.x as i64, logical.y as i64),
            anchor: self.to_drawing(logical),
        })
    }
}
