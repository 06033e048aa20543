//! # EcoWatt Core
//!
//! Domain types, collaborator traits, and error definitions for the EcoWatt
//! energy assistant. This crate has **no framework dependencies**: it defines
//! the model every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here and implementations live in
//! their own crates:
//! - [`EnergyStore`]: persistence of users and appliances (`ecowatt-storage`)
//! - [`Provider`]: the external text-generation service (`ecowatt-providers`)
//!
//! The assistant receives both by injection, which keeps it testable with
//! in-memory stores and mock providers.

pub mod assistant;
pub mod energy;
pub mod error;
pub mod provider;
pub mod record;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use assistant::{AssistantRequest, AssistantResponse, GenerativeCallOutcome, Provenance};
pub use energy::{ApplianceSummaryEntry, EnergySnapshot, UserEnergyProfile};
pub use error::{AssistantError, Error, ProviderError, Result, StoreError};
pub use provider::{Credential, GenerationParams, GenerationRequest, Provider};
pub use record::{Appliance, NewAppliance, NewUser, User};
pub use store::EnergyStore;
