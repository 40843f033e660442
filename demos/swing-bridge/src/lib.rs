use wasm_bindgen::prelude::*;
use swing_engine::*;

mod block;
mod bridge;
mod game;
mod wall;
use game::SwingBridge;

swing_web::export_game!(SwingBridge, "swing-bridge");
