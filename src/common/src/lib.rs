pub mod constants;
pub mod matching;
pub mod types;
