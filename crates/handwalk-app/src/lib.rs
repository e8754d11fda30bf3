//! Handwalk host application.
//!
//! Wires camera setup, the capture loop, and the scene game loop into one
//! session, and provides a simulated backend for headless runs.

pub mod capture;
pub mod demo;
pub mod game_loop;
pub mod session;
pub mod setup;
pub mod state;

pub use handwalk_core as core;
