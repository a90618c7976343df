pub mod engine;
mod parse;
pub mod prompt;

pub use engine::GeminiGenerator;
