// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod config;
pub mod engine;
mod game;
pub mod hud;
pub mod session;
pub mod sprite;
pub mod timer;
pub mod win_screen;
pub mod world;

use config::GameConfig;
use engine::GameLoop;
use game::HotdogHunt;

const CONFIG_PATH: &str = "config.json";

// ==================== Main Functions ====================
/// Main entry for the Webassembly module
/// - better panic messages
/// - fetch config.json (defaults when missing or invalid)
/// - start the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        let fetched = browser::fetch_json::<GameConfig>(CONFIG_PATH)
            .await
            .and_then(|config| config.validate().map(|_| config));
        let config = match fetched {
            Ok(config) => config,
            Err(err) => {
                log!("No usable {} ({:#}), using defaults", CONFIG_PATH, err);
                GameConfig::default()
            }
        };
        run(config).await;
    });

    Ok(())
}

/// Same as `main_js` but with a config object handed in from JavaScript.
/// Missing fields fall back to their defaults, invalid values are an error.
#[wasm_bindgen]
pub fn start_with_config(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config: GameConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|err| JsValue::from_str(&format!("Invalid game config : {}", err)))?;
    config
        .validate()
        .map_err(|err| JsValue::from_str(&format!("Invalid game config : {:#}", err)))?;
    browser::spawn_local(run(config));

    Ok(())
}

async fn run(config: GameConfig) {
    if let Err(err) = GameLoop::start(HotdogHunt::new(config)).await {
        error!("Could not start game: {:#?}", err);
    }
}
