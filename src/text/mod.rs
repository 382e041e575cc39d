//! Text primitives: sentence segmentation and word tokenization.

pub mod segment;
pub mod tokenize;

pub use segment::split_sentences;
pub use tokenize::{tokenize, Token};
