//! Core types and definitions for the handwalk scene.
//!
//! This crate defines the vocabulary shared across all other crates:
//! keypoint frames, step events, progress state, the spawn catalog,
//! commands, snapshots, events, and tuning constants.
//! It has no dependency on any runtime, renderer, or capture backend.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
