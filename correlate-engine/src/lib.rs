//! # correlate-engine
//!
//! The rule matching and graph-building engine. Given one just-indexed
//! event it discovers candidate rules, validates that the event really
//! satisfies them, fans out a windowed neighbor search across every
//! index those rules name, and folds the hits into a per-index
//! adjacency list — classifying the event as correlated or orphan.

pub mod engine;
pub mod queries;
pub mod settings;

pub use engine::CorrelationEngine;
pub use settings::{DynamicSettings, SettingsSnapshot};
