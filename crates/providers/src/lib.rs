//! Generative text providers for EcoWatt.
//!
//! Providers implement the `ecowatt_core::Provider` trait. The
//! [`GenerativeClient`] wraps one provider and turns every call into a
//! [`GenerativeCallOutcome`](ecowatt_core::GenerativeCallOutcome).

pub mod generative;
pub mod huggingface;

pub use generative::{GenerativeClient, clean_reply};
pub use huggingface::HuggingFaceProvider;
