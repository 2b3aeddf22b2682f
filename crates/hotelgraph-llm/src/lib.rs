//! # hotelgraph-llm
//!
//! Completion service adapters for the hotelgraph campaign engine.
//!
//! The campaign workflow treats the completion service as an external
//! collaborator: a list of role-tagged messages goes in, generated text
//! comes out. Everything behind that boundary (transport, auth, retries the
//! provider performs on its own) is opaque to the engine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hotelgraph_llm::{CompletionAdapter, Message, OpenAiCompletions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = OpenAiCompletions::new("sk-...", "gpt-4o");
//!
//!     let messages = vec![
//!         Message::system("You are a hotel marketing expert."),
//!         Message::user("Suggest three campaign angles for a beach resort."),
//!     ];
//!
//!     let completion = adapter.complete(&messages).await?;
//!     println!("{}", completion.content);
//!
//!     Ok(())
//! }
//! ```

mod canned;
mod error;
mod openai;
mod traits;

pub use canned::CannedCompletions;
pub use error::CompletionError;
pub use openai::OpenAiCompletions;
pub use traits::{Completion, CompletionAdapter, FinishReason, Message, Role, TokenUsage};
