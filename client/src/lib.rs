//! # client
//!
//! Leptos + WASM front end for the sketch-to-keychain wizard.
//!
//! The wizard model, envelope parsing, and backend configuration live in the
//! `wizard` crate; the annotation editor lives in `canvas`. This crate owns the
//! pages, components, the `gloo-net` backend implementation, and the browser
//! glue (object URLs, image loading, downloads).
//!
//! Browser-only code is gated behind the `csr` feature so the pure helpers in
//! each module build and test natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install the panic hook and logger, then mount [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger unavailable: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
