//! Seams to the external search/storage collaborators.

mod search;
mod store;

pub use search::ISearchService;
pub use store::{DocWriteOutcome, IDocumentStore, IndexSettings};
