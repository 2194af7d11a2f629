#![doc(test(attr(deny(warnings))))]

//! Simple Budget tracks expenses and savings contributions, compares monthly
//! spend against per-category goals, and splits the savings pool across goals.

pub mod app;
pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Simple Budget tracing initialized.");
    });
}
