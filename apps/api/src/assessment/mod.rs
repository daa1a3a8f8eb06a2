// Assessment core: prompt construction, AI gateway, response
// parsing/validation, progress tracking, and the service layer tying
// them to the stores. All LLM calls go through llm_client.

pub mod gateway;
pub mod handlers;
pub mod parser;
pub mod progress;
pub mod prompts;
pub mod service;
