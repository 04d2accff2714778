pub mod assistant;
pub mod compose;
pub mod error;
pub mod messages;
pub mod prompts;
pub mod retriever;

pub use assistant::{Assistant, Command, Inbound};
pub use compose::Composer;
pub use error::AnswerError;
pub use retriever::{RetrievedChunk, Retriever};
