//! Viewer settings and preferences
//!
//! Persisted in LocalStorage on the web; the native binary can read them from
//! a JSON file.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::renderer::RenderStyle;
use crate::viewport::ZoomFactors;

/// Viewer settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the evaluation API
    pub api_base_url: String,

    // === Surface ===
    /// Drawing surface edge in pixels (square)
    pub canvas_size: u32,

    // === Navigation ===
    /// Window multiplier on wheel up
    pub zoom_in_factor: f64,
    /// Window multiplier on wheel down
    pub zoom_out_factor: f64,

    // === Markers (pixels) ===
    pub checkpoint_radius: f32,
    pub waypoint_radius: f32,
    pub head_radius: f32,
    pub path_width: f32,

    // === Overlays ===
    /// Show the logical coordinate under the cursor
    pub show_cursor_readout: bool,
    /// Draw inferred warp links over the board
    pub show_links: bool,
    /// Draw the projected path past the executed commands
    pub show_future_path: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://icfp-api.badalloc.com/".to_string(),

            canvas_size: CANVAS_SIZE,

            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,

            checkpoint_radius: CHECKPOINT_RADIUS,
            waypoint_radius: WAYPOINT_RADIUS,
            head_radius: HEAD_RADIUS,
            path_width: PATH_WIDTH,

            show_cursor_readout: true,
            show_links: true,
            show_future_path: true,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Zoom factors, with nonsense values (non-positive, or on the wrong
    /// side of 1) replaced by defaults
    pub fn zoom_factors(&self) -> ZoomFactors {
        let defaults = ZoomFactors::default();
        ZoomFactors {
            zoom_in: if self.zoom_in_factor > 0.0 && self.zoom_in_factor < 1.0 {
                self.zoom_in_factor
            } else {
                defaults.zoom_in
            },
            zoom_out: if self.zoom_out_factor > 1.0 {
                self.zoom_out_factor
            } else {
                defaults.zoom_out
            },
        }
    }

    /// Marker sizes converted to normalized drawing units
    pub fn render_style(&self) -> RenderStyle {
        let edge = self.canvas_size.max(1) as f32;
        RenderStyle {
            checkpoint_radius: self.checkpoint_radius / edge,
            waypoint_radius: self.waypoint_radius / edge,
            head_radius: self.head_radius / edge,
            path_width: self.path_width / edge,
            crosshair_half: CROSSHAIR_HALF / edge,
            show_cursor_readout: self.show_cursor_readout,
            show_future_path: self.show_future_path,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "puzzle_viz_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"canvas_size": 800, "show_links": false}"#).unwrap();
        assert_eq!(settings.canvas_size, 800);
        assert!(!settings.show_links);
        assert_eq!(settings.zoom_in_factor, ZOOM_IN_FACTOR);
    }

    #[test]
    fn test_bad_zoom_factors_fall_back() {
        let settings = Settings {
            zoom_in_factor: 1.5,
            zoom_out_factor: 0.0,
            ..Settings::default()
        };
        assert_eq!(settings.zoom_factors(), ZoomFactors::default());
    }

    #[test]
    fn test_render_style_is_normalized() {
        let settings = Settings {
            canvas_size: 1000,
            head_radius: 30.0,
            ..Settings::default()
        };
        let style = settings.render_style();
        assert!((style.head_radius - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
