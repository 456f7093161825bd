//! Text analysis: raw field text to an ordered `(term, position)` stream.

mod tokenizer;

pub use tokenizer::{Token, Tokenizer, CLASSIC_STOP_WORDS};
