pub mod gemini_client;
pub mod heuristic_analyzer;
pub mod traits;
