pub mod atomic;
pub mod counter;
pub mod error;
pub mod fanout;
pub mod interner;
pub mod manifest;
pub mod merge;
pub mod pipeline;
pub mod record;
pub mod shard;
pub mod tokenizer;

pub use error::*;
pub use interner::{Interner, OrthId};
pub use counter::Counter;
pub use tokenizer::{Language, Tokenizer};
