//! Game settings and preferences
//!
//! Persisted in LocalStorage. Missing fields fall back to defaults so older
//! saves keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_INTERVAL_MS;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Milliseconds between ticks
    pub tick_interval_ms: u32,

    // === Services ===
    /// Base URL of the score service
    pub api_base_url: String,

    // === Input ===
    /// Minimum drag distance (CSS px) before a touch counts as a swipe
    pub swipe_threshold_px: f64,
    /// Pause when the window loses focus
    pub auto_pause_on_blur: bool,

    // === Visuals ===
    /// Draw grid lines
    pub show_grid: bool,
    /// Tint the page with the current track's artwork colour
    pub adaptive_background: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            api_base_url: "http://localhost:8000".to_string(),
            swipe_threshold_px: 10.0,
            auto_pause_on_blur: true,
            show_grid: true,
            adaptive_background: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "snakeify_settings";

    /// Tick interval clamped to something a browser timer can honour
    pub fn effective_tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms.clamp(30, 2000)
    }

    /// Flip grid lines and persist. Returns the new value.
    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.save();
        log::info!("Grid lines {}", if self.show_grid { "on" } else { "off" });
        self.show_grid
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval_ms, 150);
        assert!(settings.show_grid);
        assert_eq!(settings.swipe_threshold_px, 10.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"tick_interval_ms": 100, "show_grid": false}"#).unwrap();
        assert_eq!(settings.tick_interval_ms, 100);
        assert!(!settings.show_grid);
        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert!(settings.auto_pause_on_blur);
    }

    #[test]
    fn test_toggle_grid_survives_reload() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_grid());
        assert!(!settings.show_grid);

        let json = serde_json::to_string(&settings).unwrap();
        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert!(!restored.show_grid);

        settings.toggle_grid();
        assert!(settings.show_grid);
    }

    #[test]
    fn test_interval_clamped() {
        let mut settings = Settings::default();
        settings.tick_interval_ms = 1;
        assert_eq!(settings.effective_tick_interval_ms(), 30);
        settings.tick_interval_ms = 150;
        assert_eq!(settings.effective_tick_interval_ms(), 150);
    }
}
