//! Gait recognition for handwalk.
//!
//! Turns fingertip keypoints into debounced step events and folds
//! those events through the two-phase gait oscillator.

pub mod detector;
pub mod fsm;

pub use handwalk_core as core;
