//! The EcoWatt energy assistant.
//!
//! Answers one question per call:
//!
//! 1. load the user's energy snapshot from the store
//! 2. aggregate it into a rule bundle and a prompt context
//! 3. try the generative service once, if a credential is configured
//! 4. otherwise, or on failure, answer from the keyword rule engine
//!
//! Only invalid input, an unknown user and store failures are errors;
//! everything that goes wrong on the generative path is absorbed here.

pub mod arbiter;
pub mod context;
pub mod prompt;
pub mod rules;

pub use arbiter::EnergyAssistant;
pub use context::{AggregatedContext, aggregate, format_number, render_context};
pub use prompt::PromptBuilder;
pub use rules::{Rule, RuleEngine};
