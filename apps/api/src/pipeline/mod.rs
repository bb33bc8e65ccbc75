// Proposal pipeline: schema synthesis → guided extraction → fit evaluation.
// All model calls go through llm_client::TextGenerator; every stage degrades to a
// static fallback instead of returning an error.

pub mod evaluator;
pub mod extractor;
pub mod orchestrator;
pub mod prompts;
pub mod schema;
pub mod synthesizer;
pub mod values;

pub use orchestrator::analyze_proposal;
pub use schema::FieldSchema;
pub use synthesizer::synthesize_schema;
