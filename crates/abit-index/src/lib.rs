pub mod chunk_store;
pub mod error;
pub mod flat;
pub mod knowledge;

pub use error::IndexError;
pub use flat::{FlatIndex, Neighbor};
pub use knowledge::KnowledgeBase;
