//! WASM bridge module for JavaScript interop
//!
//! The page calls `frame(timestamp)` from `requestAnimationFrame`, forwards
//! `keydown`/`keyup` codes, and paints `display_list_json()` on its canvas.

use std::time::Duration;

use crate::input::{InputEvent, InputSender, Key};
use crate::render::DisplayList;
use crate::schedule::{ManualScheduler, Runner};
use crate::{Config, Event, Game};
use wasm_bindgen::prelude::*;

fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    log::warn!("{message}");
}

/// WASM-compatible wrapper around a running match
#[wasm_bindgen]
pub struct WasmGame {
    runner: Runner<ManualScheduler>,
    display: DisplayList,
    sender: InputSender,
    last_events: Vec<Event>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new match from JSON configuration; empty means defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: String) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            match serde_json::from_str(&config_json) {
                Ok(config) => config,
                Err(e) => {
                    console_warn(&format!("Failed to parse config JSON, using defaults: {e}"));
                    Config::default()
                }
            }
        };

        let game = Game::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let runner = Runner::new(game, ManualScheduler::new());
        let sender = runner.input_sender();

        Ok(WasmGame {
            runner,
            display: DisplayList::new(),
            sender,
            last_events: Vec::new(),
        })
    }

    /// Request the first frame
    pub fn start(&mut self) {
        self.runner.start();
    }

    /// Forward a `keydown` code. Returns false for keys the game ignores.
    pub fn key_down(&self, code: &str) -> bool {
        Key::from_code(code).is_some_and(|key| self.sender.send(InputEvent::KeyDown(key)))
    }

    /// Forward a `keyup` code. Returns false for keys the game ignores.
    pub fn key_up(&self, code: &str) -> bool {
        Key::from_code(code).is_some_and(|key| self.sender.send(InputEvent::KeyUp(key)))
    }

    /// Deliver an animation frame. Returns true while another frame is wanted.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if let Some(handle) = self.runner.scheduler_mut().take_due() {
            let millis = if timestamp_ms.is_finite() && timestamp_ms > 0.0 {
                timestamp_ms
            } else {
                0.0
            };
            let now = Duration::from_secs_f64(millis / 1000.0);
            self.last_events = self.runner.on_frame(handle, now, &mut self.display);
        }

        self.runner.is_scheduled()
    }

    /// Cancel the pending frame and stop every entity
    pub fn clear_animation(&mut self) {
        self.runner.clear_animation();
    }

    /// Draw calls of the last tick as JSON
    pub fn display_list_json(&self) -> String {
        serde_json::to_string(self.display.commands()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Events of the last delivered frame as JSON
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.last_events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the current match view as JSON string
    pub fn view_json(&self) -> String {
        match serde_json::to_string(&self.runner.game().view()) {
            Ok(json) => json,
            Err(e) => {
                console_warn(&format!("Failed to serialize view: {e}"));
                "{}".to_string()
            }
        }
    }

    pub fn score_one(&self) -> u32 {
        self.runner.game().score.player_one
    }

    pub fn score_two(&self) -> u32 {
        self.runner.game().score.player_two
    }

    pub fn is_running(&self) -> bool {
        self.runner.game().running
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> String {
        self.runner.game().status_string().to_string()
    }
}

/// Create a default config as JSON string (utility for JavaScript)
#[wasm_bindgen]
pub fn default_config_json() -> String {
    serde_json::to_string_pretty(&Config::default()).unwrap_or_else(|_| "{}".to_string())
}

/// Initialize WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_game_creation() {
        let game = WasmGame::new(String::new()).unwrap();
        assert!(!game.is_running());
        assert_eq!(game.status_string(), "Waiting for serve");
    }

    #[test]
    fn test_partial_config_json() {
        let game = WasmGame::new(r#"{"tick_hz": 50, "two_players": false}"#.to_string()).unwrap();
        let view: serde_json::Value = serde_json::from_str(&game.view_json()).unwrap();

        assert!(view.get("tick").is_some());
        assert!(view["paddle_two"].is_null());
    }

    #[test]
    fn test_frames_and_keys() {
        let mut game = WasmGame::new(String::new()).unwrap();
        game.start();

        assert!(game.key_down("ArrowUp"));
        assert!(!game.key_down("Space"));

        assert!(game.frame(0.0));
        assert!(game.frame(16.7));

        assert!(game.is_running());
        assert!(game.events_json().contains("Served"));
        let list: serde_json::Value = serde_json::from_str(&game.display_list_json()).unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(4));
        assert_eq!(list[0]["kind"], "clear");

        game.clear_animation();
        assert!(!game.frame(33.4));
    }

    #[test]
    fn test_default_config_json() {
        let json = default_config_json();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, Config::default());
    }
}
