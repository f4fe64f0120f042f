pub mod core;
pub mod matching;
