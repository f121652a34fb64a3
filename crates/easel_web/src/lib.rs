//! Browser host boundary for the easel embedding core.
//!
//! # Responsibility
//! - Adapt DOM and page-script collaborators to the core's contracts.
//! - Expose the embed surface to the host page via wasm-bindgen.
//!
//! # Invariants
//! - Exported functions must not panic across the wasm boundary.
//! - Fallible exports return error strings; import callbacks receive
//!   `null` on failure.

mod api;
mod dom;
mod js_decoder;
mod js_engine;

pub use api::EaselEmbed;
pub use dom::DomStatusSink;
pub use js_decoder::{JsDecoderLoader, JsPsdDecoder};
pub use js_engine::{JsAppBuilder, JsCanvasApp};

use wasm_bindgen::prelude::wasm_bindgen;

/// Module entry point: panic hook and console logging.
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A host bundle may have installed a logger already; re-init is not an error.
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!(
        "event=web_init module=web status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );
}
