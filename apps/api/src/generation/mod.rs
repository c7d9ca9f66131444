// Ad generation: job form -> channel ads, sourcing kit and interview guide.
// All LLM calls go through the StructuredGenerator seam in llm_client.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
