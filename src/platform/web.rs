//! `wasm-bindgen` surface used by the page script

use wasm_bindgen::prelude::*;

use super::FrameClock;
use crate::progress::Profile;
use crate::settings::{Cosmetic, Settings};
use crate::sim::{ClickOutcome, Mode, RoundEngine};

#[wasm_bindgen]
pub struct WebGame {
    engine: RoundEngine<Profile>,
    settings: Settings,
    frames: FrameClock,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        console_error_panic_hook::set_once();
        // A second WebGame on the same page would re-init the logger
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Stunt Show starting...");

        let seed = js_sys::Date::now() as u64;
        let profile = Profile::load();
        WebGame {
            settings: Settings::load(&profile),
            engine: RoundEngine::new(profile, seed),
            frames: FrameClock::new(),
        }
    }

    /// Start a round; unknown keys throw an Error on the JS side
    pub fn start(&mut self, mode: &str, difficulty: &str) -> Result<(), JsError> {
        self.engine.start_keys(mode, difficulty)?;
        self.settings.mode = mode.parse()?;
        self.settings.difficulty = difficulty.parse()?;
        self.settings.save();
        self.frames.reset();
        Ok(())
    }

    /// Start with the last saved selection
    pub fn restart(&mut self) {
        self.engine.start_from_settings(&self.settings);
        self.frames.reset();
    }

    /// Throws for unknown skins and skins the profile hasn't bought
    pub fn select_skin(&mut self, id: &str) -> Result<(), JsError> {
        self.settings.select_skin(id, self.engine.sink())?;
        self.settings.save();
        Ok(())
    }

    /// Buy a grid skin; throws when the balance is short
    pub fn buy_skin(&mut self, id: &str) -> Result<(), JsError> {
        self.buy(Cosmetic::Skin, id)
    }

    pub fn buy_effect(&mut self, id: &str) -> Result<(), JsError> {
        self.buy(Cosmetic::Effect, id)
    }

    pub fn skin(&self) -> String {
        self.settings.skin.clone()
    }

    /// Returns "ignored", "advanced", "completed" or "penalized"
    pub fn click(&mut self, index: usize) -> String {
        let played = self.engine.sink().rounds_played;
        let outcome = self.engine.click(index);
        self.save_if_finished(played);
        match outcome {
            ClickOutcome::Ignored => "ignored",
            ClickOutcome::Advanced { .. } => "advanced",
            ClickOutcome::Completed => "completed",
            ClickOutcome::Penalized => "penalized",
        }
        .to_string()
    }

    /// Call once per animation frame with `performance.now()`
    pub fn update(&mut self, now_ms: f64) {
        let delta = self.frames.delta_ms(now_ms);
        let played = self.engine.sink().rounds_played;
        self.engine.advance(delta);
        self.save_if_finished(played);
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn resume(&mut self) {
        self.engine.resume();
        self.frames.reset();
    }

    /// Leave the round screen
    pub fn abandon(&mut self) {
        self.engine.abandon();
    }

    /// Current round as JSON, or "null" when idle
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.engine.snapshot()).unwrap_or_else(|_| "null".to_string())
    }

    pub fn coins(&self) -> f64 {
        self.engine.sink().coins as f64
    }

    pub fn profile_json(&self) -> String {
        serde_json::to_string(self.engine.sink()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Ranking tabs as `{"times": [...], "coins": [...]}`, all modes when
    /// `mode` is omitted
    pub fn ranking_json(&self, mode: Option<String>) -> Result<String, JsError> {
        let mode = mode.map(|m| m.parse::<Mode>()).transpose()?;
        let ranking = self.engine.sink().leaderboard.ranking(mode);
        Ok(serde_json::to_string(&ranking)?)
    }

    /// Wipe coins, bests, leaderboard and purchases
    pub fn reset_profile(&mut self) {
        self.engine.abandon();
        self.engine.sink_mut().reset();
        self.settings = std::mem::take(&mut self.settings).owned_by(self.engine.sink());
        self.settings.save();
    }

    fn buy(&mut self, kind: Cosmetic, id: &str) -> Result<(), JsError> {
        self.engine.sink_mut().unlock(kind, id)?;
        self.engine.sink().save();
        Ok(())
    }

    fn save_if_finished(&self, played_before: u32) {
        if self.engine.sink().rounds_played != played_before {
            self.engine.sink().save();
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
