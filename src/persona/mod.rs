//! Persona engine: plan exclusions and persona mismatch warnings

mod engine;
pub mod rules;
mod types;

pub use engine::PersonaEngine;
pub use types::{NeedFlag, Needs, PersonaType, PlanRisk, RiskLevel, UserProfile};
