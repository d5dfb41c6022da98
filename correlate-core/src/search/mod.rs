//! Abstract search capability consumed by the engine.
//!
//! The engine never talks to a concrete backend; it builds `QueryExpr`
//! trees and hands `SearchRequest`s to an `ISearchService`
//! implementation (see `traits::search`).

mod query;
mod request;

pub use query::{BoolQuery, QueryExpr};
pub use request::{SearchHit, SearchRequest, SearchResponse};
