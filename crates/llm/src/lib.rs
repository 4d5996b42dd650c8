//! Model service clients
//!
//! - [`openai`]: HTTP client for OpenAI-compatible chat and moderation APIs
//! - [`structured`]: typed decoding of JSON objects embedded in replies
//! - [`mock`]: scripted doubles for tests

pub mod mock;
pub mod openai;
pub mod structured;

pub use mock::{MockLanguageModel, MockModeration};
pub use openai::OpenAiClient;
pub use structured::{decode_json_object, json_object_span, ExtractionFailure};
