pub mod context;
pub mod embedder;
pub mod llm;

pub use context::ServiceContext;
pub use embedder::select_embedder;
pub use llm::{connect_llm, OpenAIProvider};
