//! # hotelgraph-search
//!
//! Market research adapters for the hotelgraph campaign engine.
//!
//! The research node enriches its prompts with a small ranked list of web
//! search snippets about the hotel and its market. The search service is an
//! external collaborator: a free-text query goes in, result snippets come
//! out.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hotelgraph_search::{SearchAdapter, TavilySearch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let search = TavilySearch::new("tvly-...");
//!     let hits = search
//!         .search("Ocean View Resort hotel reviews luxury market analysis")
//!         .await?;
//!     for hit in hits {
//!         println!("{}: {}", hit.title, hit.snippet);
//!     }
//!     Ok(())
//! }
//! ```

mod canned;
mod error;
mod tavily;
mod traits;

pub use canned::CannedSearch;
pub use error::SearchError;
pub use tavily::TavilySearch;
pub use traits::{SearchAdapter, SearchHit};
