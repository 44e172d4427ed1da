//! Source text segmentation.

mod chunker;

pub use chunker::{Chunk, split, split_sentences};
