//! Contribution records and boundary decoding of their pricing structures

mod data;
mod decode;

pub use data::{
    BandSelection, ClassRates, ContributionRecord, IncomeBand, MsaKind, MsaStructure,
    PricingMatrix, PricingModel, ThresholdStructure,
};
