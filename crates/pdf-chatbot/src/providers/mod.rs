//! Provider abstractions for the remote services the chatbot depends on
//!
//! Trait objects keep the HTTP handlers independent of the concrete
//! backends, so tests can swap in local stand-ins.

pub mod firebase;
pub mod identity;
pub mod llm;
pub mod openai;

pub use firebase::FirebaseAuth;
pub use identity::IdentityProvider;
pub use llm::LlmProvider;
pub use openai::OpenAiClient;
