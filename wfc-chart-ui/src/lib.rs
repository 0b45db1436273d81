//! Shared Dioxus components and browser bridge for the forecast chart apps.
//!
//! This crate provides:
//! - `state`: Reactive AppState with Dioxus Signals
//! - `actions`: user commands that run controller cycles on the Dioxus executor
//! - `js_bridge`: downloads and DOM capture via `js_sys` / `web_sys`
//! - `components`: Reusable RSX components (forms, steppers, panels, export)

pub mod actions;
pub mod components;
pub mod js_bridge;
pub mod state;
