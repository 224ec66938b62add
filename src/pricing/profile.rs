//! Household shape and the financial profile derived for one plan

use crate::contribution::ClassRates;
use crate::notice::EngineNotice;
use serde::{Deserialize, Serialize};

/// Number of beneficiaries per member class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCounts {
    /// Principal members (always at least one)
    pub main: u32,
    /// Adult dependants
    #[serde(default)]
    pub adult: u32,
    /// Child dependants
    #[serde(default)]
    pub child: u32,
}

impl MemberCounts {
    /// Create counts, raising `main` to one if needed
    pub fn new(main: u32, adult: u32, child: u32) -> Self {
        Self {
            main: main.max(1),
            adult,
            child,
        }
    }

    /// Same counts with the principal-member invariant enforced
    pub fn normalized(&self) -> Self {
        Self::new(self.main, self.adult, self.child)
    }

    /// Head count across classes, widened so large households cannot overflow
    pub fn total(&self) -> u64 {
        u64::from(self.main) + u64::from(self.adult) + u64::from(self.child)
    }

    /// Sum of each class's amount times its head count
    pub fn weighted_total(&self, amounts: &ClassRates) -> f64 {
        amounts.main * self.main as f64
            + amounts.adult * self.adult as f64
            + amounts.child * self.child as f64
    }
}

impl Default for MemberCounts {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Medical savings account view of the profile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProfile {
    pub annual_allocation: f64,
    pub monthly_allocation: f64,
    pub is_pooled: bool,
}

impl SavingsProfile {
    pub fn from_annual(annual_allocation: f64) -> Self {
        Self {
            annual_allocation,
            monthly_allocation: annual_allocation / 12.0,
            is_pooled: annual_allocation > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdProfile {
    pub annual_threshold: f64,
    pub self_payment_gap: f64,
    pub limited_above_threshold: f64,
}

/// Personal health fund figures (not yet priced, always zero)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveProfile {
    pub base_fund: f64,
    pub potential_boost: f64,
    pub max_fund: f64,
}

/// Annual threshold figures for a household
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdCalculation {
    pub annual_msa: f64,
    pub annual_threshold: f64,
    /// `max(0, annual_threshold - annual_msa)`
    pub self_payment_gap: f64,
    pub limited_above_threshold: f64,
}

impl ThresholdCalculation {
    pub fn new(annual_msa: f64, annual_threshold: f64, limited_above_threshold: f64) -> Self {
        Self {
            annual_msa,
            annual_threshold,
            self_payment_gap: (annual_threshold - annual_msa).max(0.0),
            limited_above_threshold,
        }
    }
}

/// Everything the comparison view shows about one plan's cost
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub monthly_premium: f64,
    pub annual_premium: f64,
    pub savings: SavingsProfile,
    pub thresholds: ThresholdProfile,
    pub incentives: IncentiveProfile,
}

impl FinancialProfile {
    /// Profile with every figure zeroed
    pub fn zero() -> Self {
        Self::default()
    }

    /// Assemble a profile from a monthly premium and threshold figures
    pub fn from_parts(
        monthly_premium: f64,
        thresholds: &ThresholdCalculation,
        incentives: IncentiveProfile,
    ) -> Self {
        Self {
            monthly_premium,
            annual_premium: monthly_premium * 12.0,
            savings: SavingsProfile::from_annual(thresholds.annual_msa),
            thresholds: ThresholdProfile {
                annual_threshold: thresholds.annual_threshold,
                self_payment_gap: thresholds.self_payment_gap,
                limited_above_threshold: thresholds.limited_above_threshold,
            },
            incentives,
        }
    }

    /// True when nothing could be priced for the plan
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// A profile plus the recoverable conditions met while computing it
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PricingOutcome {
    pub profile: FinancialProfile,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<EngineNotice>,
}

impl PricingOutcome {
    /// Whether any figure was zeroed or substituted
    pub fn is_degraded(&self) -> bool {
        !self.notices.is_empty()
    }
}

/// Headline "price from" figure for plan listings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPrice {
    /// Principal member's monthly rate
    pub amount: f64,
    /// Rate comes from the lowest income band, so real prices may be higher
    pub banded: bool,
}
