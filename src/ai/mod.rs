pub mod analyst;
mod summarizer;

pub use summarizer::{Summarize, Summarizer};
