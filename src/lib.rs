//! Plan Compare - medical aid plan comparison engine
//!
//! This library provides:
//! - Monthly premiums for fixed and income-banded contribution tables
//! - Medical savings allocations, annual thresholds and self-payment gaps
//! - Persona-driven plan exclusion and mismatch warnings
//! - Plan catalog loading (CSV / JSON exports) and side-by-side assessment

pub mod contribution;
pub mod pricing;
pub mod persona;
pub mod catalog;
pub mod compare;
pub mod notice;

// Re-export commonly used types
pub use contribution::{ContributionRecord, PricingModel, PricingMatrix};
pub use pricing::{PricingEngine, FinancialProfile, MemberCounts};
pub use persona::{PersonaEngine, PersonaType, UserProfile, PlanRisk, RiskLevel};
pub use catalog::{PlanCatalog, PlanRecord};
pub use compare::{PlanComparer, PlanAssessment, UserScenario};
pub use notice::EngineNotice;
