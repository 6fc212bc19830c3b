//! Desktop UI: page state, the controller that drives it, and the egui renderer.

pub mod controller;
pub mod state;
pub mod ui;
