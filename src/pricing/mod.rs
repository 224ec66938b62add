//! Pricing engine: premiums, savings allocations and threshold gaps

mod engine;
mod profile;

pub use engine::{PricingEngine, DISCLAIMER};
pub use profile::{
    EntryPrice, FinancialProfile, IncentiveProfile, MemberCounts, PricingOutcome, SavingsProfile,
    ThresholdCalculation, ThresholdProfile,
};
