//! # correlate-store
//!
//! Persistence layer for correlations. Three concerns:
//!
//! - [`HistoryStoreManager`] — lifecycle of the hidden history index and
//!   its two bootstrap root records.
//! - [`RuleStore`] — validated writes of correlation rule documents.
//! - [`HistoryStore`] — append-only edge records per correlated pair,
//!   and the correlated-events read path.

pub mod history;
pub mod lifecycle;
pub mod rules;

pub use history::HistoryStore;
pub use lifecycle::HistoryStoreManager;
pub use rules::{RuleStore, WriteMode};
