//! Recoverable conditions raised while computing a profile or risk list
//!
//! None of these interrupt a calculation. They are collected alongside the
//! result so a caller can tell a degraded figure (e.g. an all-zero profile)
//! from a genuine one and show a "data unavailable" state instead.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineNotice {
    /// A string-encoded JSON sub-field could not be decoded; treated as absent
    #[error("{field} could not be decoded and was ignored")]
    MalformedEncoding { field: String },

    /// Income fell outside every band; the first band was used instead
    #[error("income {income} matched no band, first band used")]
    MissingIncomeBand { income: f64 },

    /// No contribution record was supplied for the plan
    #[error("no contribution record, profile is zero-valued")]
    MissingContribution,

    /// Persona label not in the known set; no default needs applied
    #[error("unrecognised persona '{label}'")]
    UnrecognizedPersona { label: String },
}

impl EngineNotice {
    /// Whether the notice means some figure was zeroed rather than estimated
    pub fn zeroes_output(&self) -> bool {
        matches!(
            self,
            EngineNotice::MalformedEncoding { .. } | EngineNotice::MissingContribution
        )
    }
}
