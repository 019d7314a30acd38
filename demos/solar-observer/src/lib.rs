use wasm_bindgen::prelude::*;
use orrery_engine::*;

mod catalog;
mod chat;
mod config;
mod error;
mod game;
mod overview;
mod picking;
mod registry;
mod session;
mod simulator;
mod solar;
mod view;
use game::SolarObserver;

orrery_web::export_game!(SolarObserver, "solar-observer");

/// Canned answer for the chat panel.
#[wasm_bindgen]
pub fn chat_respond(text: &str) -> String {
    chat::respond(text)
}

/// Body names, colors and details as a JSON array, in catalog index order.
/// Selection events carry indices into this array.
#[wasm_bindgen]
pub fn body_catalog() -> String {
    match catalog::Catalog::load().and_then(|c| c.to_ui_json().map_err(Into::into)) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("body catalog unavailable: {}", e);
            "[]".to_string()
        }
    }
}
