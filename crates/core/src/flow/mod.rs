pub mod engine;
pub mod prompts;
pub mod states;
