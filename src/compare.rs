//! Side-by-side plan assessment for one household and user profile
//!
//! Runs the pricing and persona engines over every plan in a catalog and
//! merges their outputs into one record per plan, ready for display.

use crate::catalog::{PlanCatalog, PlanRecord};
use crate::notice::EngineNotice;
use crate::persona::{PersonaEngine, PersonaType, PlanRisk, RiskLevel, UserProfile};
use crate::pricing::{EntryPrice, FinancialProfile, MemberCounts, PricingEngine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Household shape and declared income being priced
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserScenario {
    #[serde(default)]
    pub members: MemberCounts,
    /// Monthly household income used for income-banded plans
    #[serde(default)]
    pub income: f64,
}

impl UserScenario {
    pub fn new(members: MemberCounts, income: f64) -> Self {
        Self {
            members: members.normalized(),
            income,
        }
    }
}

/// Everything shown on one plan card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAssessment {
    pub plan_id: String,
    pub plan_name: String,
    pub profile: FinancialProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<EntryPrice>,
    pub risks: Vec<PlanRisk>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<EngineNotice>,
}

impl PlanAssessment {
    pub fn has_high_risk(&self) -> bool {
        self.risks.iter().any(|risk| risk.level == RiskLevel::High)
    }

    /// Warning of the first HIGH risk, shown as the card banner
    pub fn headline_warning(&self) -> Option<&str> {
        self.risks
            .iter()
            .find(|risk| risk.level == RiskLevel::High)
            .map(|risk| risk.warning.as_str())
    }

    /// True when the figures are fallbacks rather than real prices
    pub fn is_degraded(&self) -> bool {
        !self.notices.is_empty()
    }
}

/// Assesses plans for a fixed scenario and user profile
///
/// # Example
/// ```ignore
/// let catalog = load_default_catalog()?;
/// let comparer = PlanComparer::for_persona(
///     PersonaType::ChronicWarrior,
///     UserScenario::new(MemberCounts::new(1, 1, 2), 18_000.0),
/// );
/// for assessment in comparer.assess_all(&catalog) {
///     println!("{}: {}", assessment.plan_name, assessment.profile.monthly_premium);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PlanComparer {
    scenario: UserScenario,
    profile: UserProfile,
}

impl PlanComparer {
    pub fn new(scenario: UserScenario, profile: UserProfile) -> Self {
        Self { scenario, profile }
    }

    /// Comparer for a persona landing page, using the persona's default needs
    pub fn for_persona(persona: PersonaType, scenario: UserScenario) -> Self {
        Self::new(scenario, PersonaEngine::profile_for(persona))
    }

    pub fn assess(&self, plan: &PlanRecord) -> PlanAssessment {
        let contribution = plan.primary_contribution();
        let outcome =
            PricingEngine::assess(contribution, &self.scenario.members, self.scenario.income);

        PlanAssessment {
            plan_id: plan.id.clone(),
            plan_name: plan.name.clone(),
            profile: outcome.profile,
            entry_price: PricingEngine::entry_price(contribution),
            risks: PersonaEngine::validate_plan(&plan.name, &self.profile),
            notices: outcome.notices,
        }
    }

    /// Assess every plan in parallel; results keep catalog order
    pub fn assess_all(&self, catalog: &PlanCatalog) -> Vec<PlanAssessment> {
        catalog
            .plans()
            .par_iter()
            .map(|plan| self.assess(plan))
            .collect()
    }

    pub fn scenario(&self) -> &UserScenario {
        &self.scenario
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
