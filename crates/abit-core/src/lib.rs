pub mod chunking;
pub mod dialog;
pub mod models;
pub mod recommend;
pub mod traits;

pub use chunking::FieldChunker;
pub use dialog::{DialogState, DialogStep, DialogAnswers};
pub use models::{Chunk, FieldValue, ListItem, ProgramRecord};
pub use recommend::{classify, Program, Recommendation};
pub use traits::{ChatOptions, Embedder, LlmError, Message, ModelProvider};
