// Answer generation: prompt composition and the model-backed generator.
// All LLM calls go through llm_client, no direct API calls here.

pub mod composer;
pub mod generator;
pub mod prompts;
