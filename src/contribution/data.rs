//! Contribution record and its strongly-typed pricing, savings and threshold structures

use super::decode::{decode_field, lenient_amount, lenient_option};
use crate::notice::EngineNotice;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a plan's rate table is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PricingModel {
    /// One fixed rate table
    #[default]
    Standard,
    /// Rate table chosen by household income
    IncomeBanded,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Standard => "Standard",
            PricingModel::IncomeBanded => "Income_Banded",
        }
    }
}

// Anything that is not explicitly income-banded prices off a fixed table
impl From<String> for PricingModel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Income_Banded" => PricingModel::IncomeBanded,
            _ => PricingModel::Standard,
        }
    }
}

impl From<PricingModel> for String {
    fn from(model: PricingModel) -> Self {
        model.as_str().to_string()
    }
}

/// Per-member-class amounts (monthly rates, annual thresholds, allocations)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassRates {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub main: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub adult: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub child: f64,
}

impl ClassRates {
    pub fn new(main: f64, adult: f64, child: f64) -> Self {
        Self { main, adult, child }
    }

    /// Read rates from a JSON object; anything that is not an object yields zero rates
    fn from_object(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }
}

/// One income band of an income-banded rate table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeBand {
    /// Inclusive lower bound (missing = 0)
    #[serde(default, deserialize_with = "lenient_amount")]
    pub min: f64,

    /// Inclusive upper bound (missing = unbounded)
    #[serde(default, deserialize_with = "lenient_option")]
    pub max: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub main: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub adult: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub child: f64,
}

impl IncomeBand {
    /// Boundary-inclusive on both ends
    pub fn contains(&self, income: f64) -> bool {
        self.min <= income && income <= self.max.unwrap_or(f64::INFINITY)
    }

    pub fn rates(&self) -> ClassRates {
        ClassRates::new(self.main, self.adult, self.child)
    }
}

/// Which band an income-banded lookup landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSelection {
    /// Income fell inside the band at this index
    Matched(usize),
    /// No band matched; the first band stands in
    Fallback,
}

/// Decoded rate table
#[derive(Debug, Clone, PartialEq)]
pub enum PricingMatrix {
    Fixed(ClassRates),
    Banded(Vec<IncomeBand>),
}

impl PricingMatrix {
    /// Build the matrix for a model from an already-decoded JSON value
    ///
    /// Banded pricing needs a sequence of band objects; anything else leaves
    /// the plan without a usable matrix.
    pub fn from_value(model: PricingModel, value: &Value) -> Option<Self> {
        match model {
            PricingModel::Standard => Some(PricingMatrix::Fixed(ClassRates::from_object(value))),
            PricingModel::IncomeBanded => {
                if !value.is_array() {
                    log::warn!("income-banded pricing matrix is not a band list");
                    return None;
                }
                match serde_json::from_value::<Vec<IncomeBand>>(value.clone()) {
                    Ok(bands) => Some(PricingMatrix::Banded(bands)),
                    Err(err) => {
                        log::warn!("income band list could not be read: {}", err);
                        None
                    }
                }
            }
        }
    }

    /// Rates applying at a household income
    ///
    /// Banded tables pick the first band containing the income and fall back
    /// to the first band when none does. An empty band list has no rates.
    pub fn rates_for(&self, income: f64) -> Option<(ClassRates, Option<BandSelection>)> {
        match self {
            PricingMatrix::Fixed(rates) => Some((*rates, None)),
            PricingMatrix::Banded(bands) => {
                match bands.iter().position(|band| band.contains(income)) {
                    Some(idx) => Some((bands[idx].rates(), Some(BandSelection::Matched(idx)))),
                    None => bands
                        .first()
                        .map(|band| (band.rates(), Some(BandSelection::Fallback))),
                }
            }
        }
    }

    /// Principal-member rate of the first table, used as a headline price
    pub fn entry_rate(&self) -> Option<f64> {
        match self {
            PricingMatrix::Fixed(rates) => Some(rates.main),
            PricingMatrix::Banded(bands) => bands.first().map(|band| band.main),
        }
    }
}

/// Savings-account model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MsaKind {
    #[default]
    None,
    /// Flat annual amount per beneficiary
    Fixed,
    /// Share of premium; recognised but not priced
    Percentage,
}

impl From<String> for MsaKind {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Fixed" => MsaKind::Fixed,
            "Percentage" => MsaKind::Percentage,
            _ => MsaKind::None,
        }
    }
}

impl From<MsaKind> for String {
    fn from(kind: MsaKind) -> Self {
        match kind {
            MsaKind::None => "None",
            MsaKind::Fixed => "Fixed",
            MsaKind::Percentage => "Percentage",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MsaStructure {
    #[serde(rename = "type", default)]
    pub kind: MsaKind,

    #[serde(default, deserialize_with = "lenient_option")]
    pub value: Option<f64>,
}

impl MsaStructure {
    /// Annual allocation for a number of beneficiaries
    pub fn annual_allocation(&self, beneficiaries: u64) -> f64 {
        match (self.kind, self.value) {
            (MsaKind::Fixed, Some(value)) => value * beneficiaries as f64,
            // Percentage-of-premium allocations are not priced
            (MsaKind::Percentage, _) => 0.0,
            _ => 0.0,
        }
    }
}

/// Annual threshold, savings and above-threshold limits per member class
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdStructure {
    /// Shared fallback for every class
    #[serde(default, deserialize_with = "lenient_option")]
    pub annual_threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub annual_threshold_main: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub annual_threshold_adult: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub annual_threshold_child: Option<f64>,
    /// Older name for `annual_threshold_child`
    #[serde(default, deserialize_with = "lenient_option")]
    pub child_threshold: Option<f64>,

    #[serde(default, deserialize_with = "lenient_option")]
    pub msa_allocation_main: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub msa_allocation_adult: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub msa_allocation_child: Option<f64>,

    #[serde(default, deserialize_with = "lenient_option")]
    pub latb_limit_main: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub latb_limit_adult: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub latb_limit_child: Option<f64>,
}

impl ThresholdStructure {
    /// Explicit per-class savings allocations, only when the principal's is given
    pub fn msa_allocations(&self) -> Option<ClassRates> {
        self.msa_allocation_main.map(|main| {
            ClassRates::new(
                main,
                self.msa_allocation_adult.unwrap_or(0.0),
                self.msa_allocation_child.unwrap_or(0.0),
            )
        })
    }

    /// Per-class thresholds: explicit field, then shared threshold, then 0
    pub fn annual_thresholds(&self) -> ClassRates {
        let shared = self.annual_threshold;
        ClassRates::new(
            self.annual_threshold_main.or(shared).unwrap_or(0.0),
            self.annual_threshold_adult.or(shared).unwrap_or(0.0),
            self.annual_threshold_child
                .or(self.child_threshold)
                .or(shared)
                .unwrap_or(0.0),
        )
    }

    /// Above-threshold limits, only when the principal's is given
    pub fn latb_limits(&self) -> Option<ClassRates> {
        self.latb_limit_main.map(|main| {
            ClassRates::new(
                main,
                self.latb_limit_adult.unwrap_or(0.0),
                self.latb_limit_child.unwrap_or(0.0),
            )
        })
    }
}

/// A plan's contribution configuration as delivered by the data layer
///
/// The three structure fields are kept raw: each may be a JSON object/array
/// or the same JSON as text. Use the `decode_*` methods to get typed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    #[serde(default)]
    pub pricing_model: PricingModel,

    #[serde(default)]
    pub pricing_matrix: Value,

    #[serde(default)]
    pub msa_structure: Value,

    #[serde(default)]
    pub threshold_structure: Value,
}

impl ContributionRecord {
    pub fn new(
        pricing_model: PricingModel,
        pricing_matrix: Value,
        msa_structure: Value,
        threshold_structure: Value,
    ) -> Self {
        Self {
            pricing_model,
            pricing_matrix,
            msa_structure,
            threshold_structure,
        }
    }

    /// Typed rate table; `None` if missing, malformed or the wrong shape
    pub fn decode_matrix(&self, notices: &mut Vec<EngineNotice>) -> Option<PricingMatrix> {
        let value = decode_field("pricing_matrix", &self.pricing_matrix, notices)?;
        let matrix = PricingMatrix::from_value(self.pricing_model, &value);
        if matrix.is_none() {
            notices.push(EngineNotice::MalformedEncoding {
                field: "pricing_matrix".to_string(),
            });
        }
        matrix
    }

    pub fn decode_msa(&self, notices: &mut Vec<EngineNotice>) -> Option<MsaStructure> {
        let value = decode_field("msa_structure", &self.msa_structure, notices)?;
        decode_structure("msa_structure", value, notices)
    }

    pub fn decode_thresholds(&self, notices: &mut Vec<EngineNotice>) -> Option<ThresholdStructure> {
        let value = decode_field("threshold_structure", &self.threshold_structure, notices)?;
        decode_structure("threshold_structure", value, notices)
    }
}

fn decode_structure<T: serde::de::DeserializeOwned>(
    field: &str,
    value: Value,
    notices: &mut Vec<EngineNotice>,
) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            log::warn!("{} has an unexpected shape ({}), treating as absent", field, err);
            notices.push(EngineNotice::MalformedEncoding {
                field: field.to_string(),
            });
            None
        }
    }
}
