//! Premium, savings and threshold calculations for one plan and household

use super::profile::{
    EntryPrice, FinancialProfile, IncentiveProfile, MemberCounts, PricingOutcome,
    ThresholdCalculation,
};
use crate::contribution::{BandSelection, ContributionRecord, PricingMatrix};
use crate::notice::EngineNotice;

/// Advisory text that must accompany any rendered figure
pub const DISCLAIMER: &str = "Estimates only. Premiums, savings allocations and threshold \
figures are calculated from published contribution tables for the household you entered and \
may differ from a scheme's formal quotation. Benefits are subject to scheme rules, waiting \
periods and underwriting. Confirm all figures with the medical scheme or a registered financial \
adviser before making a decision.";

/// Stateless pricing calculator
///
/// Every calculation is total: decoding problems and gaps in the rate tables
/// are absorbed into zero-valued figures (or a substitute band) and reported
/// as [`EngineNotice`]s rather than errors.
pub struct PricingEngine;

impl PricingEngine {
    /// Financial profile for a plan; `None` contribution gives the all-zero profile
    pub fn calculate_profile(
        contribution: Option<&ContributionRecord>,
        members: &MemberCounts,
        income: f64,
    ) -> FinancialProfile {
        Self::assess(contribution, members, income).profile
    }

    /// Financial profile together with the recoverable conditions met on the way
    pub fn assess(
        contribution: Option<&ContributionRecord>,
        members: &MemberCounts,
        income: f64,
    ) -> PricingOutcome {
        let Some(contribution) = contribution else {
            log::debug!("no contribution record, returning zero profile");
            return PricingOutcome {
                profile: FinancialProfile::zero(),
                notices: vec![EngineNotice::MissingContribution],
            };
        };

        let members = members.normalized();
        let mut notices = Vec::new();

        let monthly_premium = Self::premium(contribution, &members, income, &mut notices);
        let thresholds = Self::thresholds(contribution, &members, &mut notices);
        let profile = FinancialProfile::from_parts(
            monthly_premium,
            &thresholds,
            Self::calculate_incentives(),
        );

        PricingOutcome { profile, notices }
    }

    /// Monthly premium for the household
    pub fn calculate_premium(
        contribution: &ContributionRecord,
        members: &MemberCounts,
        income: f64,
    ) -> f64 {
        Self::premium(contribution, &members.normalized(), income, &mut Vec::new())
    }

    /// Annual savings, threshold, self-payment gap and above-threshold limit
    pub fn calculate_thresholds(
        contribution: &ContributionRecord,
        members: &MemberCounts,
    ) -> ThresholdCalculation {
        Self::thresholds(contribution, &members.normalized(), &mut Vec::new())
    }

    /// Personal health fund figures
    ///
    /// The contribution record carries no fund structure yet, so every figure is zero.
    pub fn calculate_incentives() -> IncentiveProfile {
        IncentiveProfile::default()
    }

    pub fn disclaimer() -> &'static str {
        DISCLAIMER
    }

    /// Principal member's rate from the first rate table, for "price from" listings
    pub fn entry_price(contribution: Option<&ContributionRecord>) -> Option<EntryPrice> {
        let contribution = contribution?;
        let matrix = contribution.decode_matrix(&mut Vec::new())?;
        let banded = matches!(matrix, PricingMatrix::Banded(_));
        matrix.entry_rate().map(|amount| EntryPrice { amount, banded })
    }

    fn premium(
        contribution: &ContributionRecord,
        members: &MemberCounts,
        income: f64,
        notices: &mut Vec<EngineNotice>,
    ) -> f64 {
        let Some(matrix) = contribution.decode_matrix(notices) else {
            return 0.0;
        };

        match matrix.rates_for(income) {
            Some((rates, selection)) => {
                if selection == Some(BandSelection::Fallback) {
                    log::debug!("income {} outside every band, pricing off the first band", income);
                    notices.push(EngineNotice::MissingIncomeBand { income });
                }
                members.weighted_total(&rates)
            }
            None => 0.0,
        }
    }

    fn thresholds(
        contribution: &ContributionRecord,
        members: &MemberCounts,
        notices: &mut Vec<EngineNotice>,
    ) -> ThresholdCalculation {
        let msa = contribution.decode_msa(notices);
        let Some(structure) = contribution.decode_thresholds(notices) else {
            return ThresholdCalculation::default();
        };

        // Explicit per-class allocations win over a flat per-head amount
        let annual_msa = match structure.msa_allocations() {
            Some(allocations) => members.weighted_total(&allocations),
            None => msa
                .map(|msa| msa.annual_allocation(members.total()))
                .unwrap_or(0.0),
        };

        let annual_threshold = members.weighted_total(&structure.annual_thresholds());
        let latb = structure
            .latb_limits()
            .map(|limits| members.weighted_total(&limits))
            .unwrap_or(0.0);

        ThresholdCalculation::new(annual_msa, annual_threshold, latb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::PricingModel;
    use approx::assert_relative_eq;
    use serde_json::{json, Value};

    fn fixed_plan() -> ContributionRecord {
        ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 2000, "adult": 1800, "child": 450}),
            Value::Null,
            Value::Null,
        )
    }

    fn banded_plan() -> ContributionRecord {
        ContributionRecord::new(
            PricingModel::IncomeBanded,
            json!([
                {"min": 0, "max": 7500, "main": 1200, "adult": 1100, "child": 300},
                {"min": 7501, "max": 999999999, "main": 2500, "adult": 2200, "child": 600}
            ]),
            Value::Null,
            Value::Null,
        )
    }

    fn saver_plan() -> ContributionRecord {
        ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 6000, "adult": 5200, "child": 1400}),
            json!({"type": "Fixed", "value": 4000}),
            json!({
                "annual_threshold_main": 3000,
                "annual_threshold_adult": 3000,
                "msa_allocation_main": 1000,
                "msa_allocation_adult": 1000
            }),
        )
    }

    #[test]
    fn test_fixed_premium() {
        let members = MemberCounts::new(1, 1, 2);
        assert_eq!(PricingEngine::calculate_premium(&fixed_plan(), &members, 0.0), 4700.0);

        let members = MemberCounts::new(1, 1, 3);
        assert_eq!(PricingEngine::calculate_premium(&fixed_plan(), &members, 0.0), 5150.0);
    }

    #[test]
    fn test_banded_premium() {
        let members = MemberCounts::new(1, 1, 1);

        let low = PricingEngine::calculate_premium(&banded_plan(), &members, 5000.0);
        assert_eq!(low, 1200.0 + 1100.0 + 300.0);

        let high = PricingEngine::calculate_premium(&banded_plan(), &members, 8000.0);
        assert_eq!(high, 2500.0 + 2200.0 + 600.0);

        let boundary = PricingEngine::calculate_premium(&banded_plan(), &members, 7501.0);
        assert_eq!(boundary, high);
    }

    #[test]
    fn test_banded_premium_falls_back_to_first_band() {
        let members = MemberCounts::default();
        let outcome = PricingEngine::assess(Some(&banded_plan()), &members, 7500.5);

        assert_eq!(outcome.profile.monthly_premium, 1200.0);
        assert_eq!(outcome.notices, vec![EngineNotice::MissingIncomeBand { income: 7500.5 }]);
    }

    #[test]
    fn test_string_encoded_matrix() {
        let record = ContributionRecord::new(
            PricingModel::IncomeBanded,
            Value::String(r#"[{"min": 0, "max": null, "main": 1500}]"#.to_string()),
            Value::Null,
            Value::Null,
        );
        let members = MemberCounts::new(2, 0, 0);
        assert_eq!(PricingEngine::calculate_premium(&record, &members, 250_000.0), 3000.0);
    }

    #[test]
    fn test_malformed_matrix_prices_at_zero() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            Value::String("{\"main\": 2000".to_string()),
            Value::Null,
            json!({"annual_threshold": 2500}),
        );
        let outcome = PricingEngine::assess(Some(&record), &MemberCounts::default(), 0.0);

        assert_eq!(outcome.profile.monthly_premium, 0.0);
        // Thresholds are unaffected by the broken matrix
        assert_eq!(outcome.profile.thresholds.annual_threshold, 2500.0);
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_premium_monotonic_in_members() {
        let base = MemberCounts::new(1, 0, 0);
        let plans = [fixed_plan(), banded_plan(), saver_plan()];

        for plan in &plans {
            for income in [0.0, 5000.0, 8000.0] {
                let before = PricingEngine::calculate_premium(plan, &base, income);
                for bumped in [
                    MemberCounts::new(2, 0, 0),
                    MemberCounts::new(1, 1, 0),
                    MemberCounts::new(1, 0, 1),
                ] {
                    assert!(PricingEngine::calculate_premium(plan, &bumped, income) >= before);
                }
            }
        }
    }

    #[test]
    fn test_thresholds_with_explicit_allocations() {
        let members = MemberCounts::new(1, 1, 0);
        let calc = PricingEngine::calculate_thresholds(&saver_plan(), &members);

        assert_eq!(calc.annual_threshold, 6000.0);
        assert_eq!(calc.annual_msa, 2000.0);
        assert_eq!(calc.self_payment_gap, 4000.0);
        assert_eq!(calc.limited_above_threshold, 0.0);
    }

    #[test]
    fn test_thresholds_with_flat_msa() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 3000}),
            Value::String(r#"{"type": "Fixed", "value": 4000}"#.to_string()),
            json!({"annual_threshold": 5000, "child_threshold": 1000}),
        );
        let members = MemberCounts::new(1, 1, 2);
        let calc = PricingEngine::calculate_thresholds(&record, &members);

        assert_eq!(calc.annual_msa, 16000.0);
        assert_eq!(calc.annual_threshold, 12000.0);
        assert_eq!(calc.self_payment_gap, 0.0);
    }

    #[test]
    fn test_thresholds_need_threshold_structure() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 3000}),
            json!({"type": "Fixed", "value": 4000}),
            Value::Null,
        );
        let calc = PricingEngine::calculate_thresholds(&record, &MemberCounts::new(1, 1, 0));
        assert_eq!(calc, ThresholdCalculation::default());
    }

    #[test]
    fn test_latb_limits() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 3000}),
            Value::Null,
            json!({
                "annual_threshold": 4000,
                "latb_limit_main": 20000,
                "latb_limit_adult": 15000,
                "latb_limit_child": 5000
            }),
        );
        let calc = PricingEngine::calculate_thresholds(&record, &MemberCounts::new(1, 1, 2));
        assert_eq!(calc.limited_above_threshold, 45000.0);
    }

    #[test]
    fn test_percentage_msa_is_not_priced() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 3000}),
            json!({"type": "Percentage", "value": 25}),
            json!({"annual_threshold": 4000}),
        );
        let profile =
            PricingEngine::calculate_profile(Some(&record), &MemberCounts::default(), 0.0);

        assert_eq!(profile.savings.annual_allocation, 0.0);
        assert!(!profile.savings.is_pooled);
        assert_eq!(profile.thresholds.self_payment_gap, 4000.0);
    }

    #[test]
    fn test_large_household_does_not_overflow() {
        let record = ContributionRecord::new(
            PricingModel::Standard,
            json!({"main": 1}),
            json!({"type": "Fixed", "value": 10}),
            json!({"annual_threshold": 100}),
        );
        let members = MemberCounts::new(u32::MAX, 1, 0);
        assert_eq!(members.total(), u64::from(u32::MAX) + 1);

        let profile = PricingEngine::calculate_profile(Some(&record), &members, 0.0);
        assert_eq!(profile.monthly_premium, u32::MAX as f64);
        let heads = (u64::from(u32::MAX) + 1) as f64;
        assert_eq!(profile.savings.annual_allocation, 10.0 * heads);
        assert_eq!(profile.thresholds.annual_threshold, 100.0 * heads);
        assert_eq!(profile.thresholds.self_payment_gap, 90.0 * heads);
    }

    #[test]
    fn test_full_profile() {
        let members = MemberCounts::new(1, 1, 0);
        let profile = PricingEngine::calculate_profile(Some(&saver_plan()), &members, 0.0);

        assert_eq!(profile.monthly_premium, 11200.0);
        assert_eq!(profile.annual_premium, profile.monthly_premium * 12.0);
        assert_eq!(profile.savings.annual_allocation, 2000.0);
        assert_relative_eq!(profile.savings.monthly_allocation, 166.666_666_666, epsilon = 1e-6);
        assert!(profile.savings.is_pooled);
        assert_eq!(profile.thresholds.annual_threshold, 6000.0);
        assert_eq!(profile.thresholds.self_payment_gap, 4000.0);
        assert_eq!(profile.incentives, IncentiveProfile::default());
    }

    #[test]
    fn test_missing_contribution_gives_zero_profile() {
        let outcome = PricingEngine::assess(None, &MemberCounts::new(2, 1, 3), 12000.0);

        assert!(outcome.profile.is_zero());
        assert!(!outcome.profile.savings.is_pooled);
        assert_eq!(outcome.notices, vec![EngineNotice::MissingContribution]);
    }

    #[test]
    fn test_gap_identity_holds() {
        let plans = [fixed_plan(), banded_plan(), saver_plan()];
        for plan in &plans {
            for members in [MemberCounts::new(1, 0, 0), MemberCounts::new(2, 1, 4)] {
                let calc = PricingEngine::calculate_thresholds(plan, &members);
                assert!(calc.self_payment_gap >= 0.0);
                assert_eq!(
                    calc.self_payment_gap,
                    (calc.annual_threshold - calc.annual_msa).max(0.0)
                );
            }
        }
    }

    #[test]
    fn test_disclaimer_is_fixed() {
        assert_eq!(PricingEngine::disclaimer(), PricingEngine::disclaimer());
        assert!(PricingEngine::disclaimer().starts_with("Estimates only."));
    }

    #[test]
    fn test_entry_price() {
        let fixed = PricingEngine::entry_price(Some(&fixed_plan())).unwrap();
        assert_eq!(fixed, EntryPrice { amount: 2000.0, banded: false });

        let banded = PricingEngine::entry_price(Some(&banded_plan())).unwrap();
        assert_eq!(banded, EntryPrice { amount: 1200.0, banded: true });

        assert_eq!(PricingEngine::entry_price(None), None);
        assert_eq!(PricingEngine::entry_price(Some(&ContributionRecord::default())), None);
    }
}
