pub mod build;
pub mod corpus;

pub use build::{build_knowledge_base, embed_chunks, run_build, BuildReport};
pub use corpus::load_corpus;
