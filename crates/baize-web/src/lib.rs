//! wasm-bindgen exports for the billiards core.
//!
//! The host calls `sim_init` once, then `sim_tick` every animation frame and
//! reads balls and outcomes straight out of linear memory through the
//! pointer accessors.

pub mod runner;

pub use runner::{RackKind, SimRunner};

use std::cell::RefCell;

use baize_engine::{CueStrike, SimConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn not_initialised() -> JsError {
    JsError::new("simulation not initialised, call sim_init first")
}

/// Build the table. `config_json` may be empty for defaults; `rack` is one
/// of `triangle`, `diamond`, `three_cushion`.
#[wasm_bindgen]
pub fn sim_init(config_json: &str, rack: &str) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        SimConfig::default()
    } else {
        SimConfig::from_json(config_json)?
    };
    let kind = RackKind::parse(rack).ok_or_else(|| JsError::new(&format!("unknown rack '{}'", rack)))?;
    let runner = SimRunner::new(config, kind)?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("baize: initialized with {:?} rack", kind);
    Ok(())
}

/// Advance by `dt` seconds of host time. Returns the ticks run.
#[wasm_bindgen]
pub fn sim_tick(dt: f64) -> Result<u32, JsError> {
    with_runner(|r| r.tick(dt))
        .ok_or_else(not_initialised)?
        .map_err(JsError::from)
}

#[wasm_bindgen]
pub fn sim_hit(angle: f64, power: f64, side: f64, vertical: f64) -> Result<(), JsError> {
    let strike = CueStrike::new(angle, power).with_spin(side, vertical).rounded();
    with_runner(|r| r.hit(strike))
        .ok_or_else(not_initialised)?
        .map_err(JsError::from)
}

#[wasm_bindgen]
pub fn sim_all_stationary() -> bool {
    with_runner(|r| r.all_stationary()).unwrap_or(true)
}

#[wasm_bindgen]
pub fn sim_is_halted() -> bool {
    with_runner(|r| r.is_halted()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_serialise() -> Result<String, JsError> {
    with_runner(|r| r.serialise())
        .ok_or_else(not_initialised)?
        .map_err(JsError::from)
}

#[wasm_bindgen]
pub fn sim_restore(json: &str) -> Result<(), JsError> {
    with_runner(|r| r.restore(json))
        .ok_or_else(not_initialised)?
        .map_err(JsError::from)
}

#[wasm_bindgen]
pub fn sim_reset() -> Result<(), JsError> {
    with_runner(|r| r.reset())
        .ok_or_else(not_initialised)?
        .map_err(JsError::from)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_header_ptr() -> *const f32 {
    with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_balls_ptr() -> *const f32 {
    with_runner(|r| r.balls_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_outcomes_ptr() -> *const f32 {
    with_runner(|r| r.outcomes_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_outcome_count() -> u32 {
    with_runner(|r| r.outcome_count()).unwrap_or(0)
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_balls() -> u32 {
    with_runner(|r| r.max_balls()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_outcomes() -> u32 {
    with_runner(|r| r.max_outcomes()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}
