pub mod gemini;
pub mod wish;
