//! Plan validation against a user's persona and declared needs

use super::rules::{self, EXCLUSION_RULES, MISMATCH_RULES, PERSONA_DEFAULTS};
use super::types::{Needs, PersonaType, PlanRisk, UserProfile};

/// Stateless risk checker
pub struct PersonaEngine;

impl PersonaEngine {
    /// Risks a plan carries for this user, exclusions first then persona mismatches
    ///
    /// Returns an empty list when the plan is a safe fit.
    pub fn validate_plan(plan_name: &str, profile: &UserProfile) -> Vec<PlanRisk> {
        let risks = rules::evaluate(&[EXCLUSION_RULES, MISMATCH_RULES], plan_name, profile);
        if !risks.is_empty() {
            log::debug!("{}: {} risk(s) for {}", plan_name, risks.len(), profile.persona);
        }
        risks
    }

    /// Needs assumed for a persona before the user answers any triage questions
    pub fn defaults_for(persona: PersonaType) -> Needs {
        PERSONA_DEFAULTS
            .iter()
            .find(|(p, _)| *p == persona)
            .map(|(_, needs)| *needs)
            .unwrap_or_default()
    }

    /// Same as [`defaults_for`](Self::defaults_for) for a free-text label;
    /// unknown personas get no defaults
    pub fn defaults_for_label(label: &str) -> Needs {
        match PersonaType::from_label(label) {
            Some(persona) => Self::defaults_for(persona),
            None => {
                log::debug!("unrecognised persona '{}', no default needs", label);
                Needs::default()
            }
        }
    }

    /// Profile for a persona landing page: the persona with its default needs
    pub fn profile_for(persona: PersonaType) -> UserProfile {
        UserProfile::new(persona, Self::defaults_for(persona))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::RiskLevel;

    fn with_needs(persona: PersonaType, needs: Needs) -> UserProfile {
        UserProfile::new(persona, needs)
    }

    fn warnings(risks: &[PlanRisk]) -> Vec<&str> {
        risks.iter().map(|r| r.warning.as_str()).collect()
    }

    #[test]
    fn test_joint_replacement_exclusion() {
        let user = with_needs(
            PersonaType::FamilyPlanner,
            Needs { orthopedic: Some(true), ..Needs::default() },
        );
        let risks = PersonaEngine::validate_plan("Essential Smart", &user);

        let high: Vec<_> = risks.iter().filter(|r| r.level == RiskLevel::High).collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].warning, "Joint Replacement Exclusion");

        for plan in ["Essential Dynamic Smart", "Active Smart"] {
            assert_eq!(
                warnings(&PersonaEngine::validate_plan(plan, &user)),
                vec!["Joint Replacement Exclusion"]
            );
        }
        assert!(PersonaEngine::validate_plan("Classic Smart", &user).is_empty());
    }

    #[test]
    fn test_no_adl_on_smart_comprehensive() {
        let user = PersonaEngine::profile_for(PersonaType::Executive);
        let risks = PersonaEngine::validate_plan("Classic Smart Comprehensive", &user);
        assert_eq!(warnings(&risks), vec!["No ADL Chronic Cover"]);
        assert!(PersonaEngine::validate_plan("Classic Comprehensive", &user).is_empty());
    }

    #[test]
    fn test_private_ward_rule_stays_silent() {
        let user = PersonaEngine::profile_for(PersonaType::FamilyPlanner);
        assert!(PersonaEngine::validate_plan("Classic Core", &user).is_empty());
    }

    #[test]
    fn test_digital_gatekeeper() {
        let budget = PersonaEngine::profile_for(PersonaType::BudgetConscious);
        let risks = PersonaEngine::validate_plan("KeyCare Start Regional", &budget);
        assert_eq!(warnings(&risks), vec!["Digital Gatekeeper Risk"]);

        // Unanswered counts as not digital-first
        let regional = PersonaEngine::profile_for(PersonaType::RegionalResident);
        assert_eq!(
            warnings(&PersonaEngine::validate_plan("KeyCare Start Regional", &regional)),
            vec!["Digital Gatekeeper Risk"]
        );

        let native = PersonaEngine::profile_for(PersonaType::DigitalNative);
        assert!(PersonaEngine::validate_plan("KeyCare Start Regional", &native).is_empty());
    }

    #[test]
    fn test_chronic_warrior_on_priority_and_core() {
        let user = PersonaEngine::profile_for(PersonaType::ChronicWarrior);

        let risks = PersonaEngine::validate_plan("Classic Priority", &user);
        assert_eq!(warnings(&risks), vec!["Limited ADL Cover"]);

        let risks = PersonaEngine::validate_plan("Coastal Core", &user);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::Medium);
        assert_eq!(risks[0].warning, "No Day-to-Day Funding");
    }

    #[test]
    fn test_digital_native_low_tech_value() {
        let user = PersonaEngine::profile_for(PersonaType::DigitalNative);

        let risks = PersonaEngine::validate_plan("Classic Saver", &user);
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].level, RiskLevel::Low);
        assert_eq!(risks[0].warning, "Low Tech-Value");

        assert!(PersonaEngine::validate_plan("Classic Smart", &user).is_empty());
        assert!(PersonaEngine::validate_plan("KeyCare Start", &user).is_empty());
    }

    #[test]
    fn test_exclusions_come_before_mismatches() {
        let user = with_needs(
            PersonaType::ChronicWarrior,
            Needs { chronic_adl: Some(true), ..Needs::default() },
        );
        let risks = PersonaEngine::validate_plan("Priority Core", &user);
        assert_eq!(warnings(&risks), vec!["Limited ADL Cover", "No Day-to-Day Funding"]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let user = PersonaEngine::profile_for(PersonaType::Executive);
        let first = PersonaEngine::validate_plan("Executive Priority", &user);
        let second = PersonaEngine::validate_plan("Executive Priority", &user);
        assert_eq!(first, second);
    }

    #[test]
    fn test_persona_defaults() {
        assert_eq!(
            PersonaEngine::defaults_for(PersonaType::ChronicWarrior),
            Needs { chronic_adl: Some(true), ..Needs::default() }
        );
        assert_eq!(
            PersonaEngine::defaults_for(PersonaType::BudgetConscious),
            Needs { digital_first: Some(false), ..Needs::default() }
        );
        assert_eq!(
            PersonaEngine::defaults_for(PersonaType::Executive),
            Needs { travel: Some(true), chronic_adl: Some(true), ..Needs::default() }
        );
        assert_eq!(
            PersonaEngine::defaults_for(PersonaType::RegionalResident),
            Needs { travel: Some(false), ..Needs::default() }
        );
    }

    #[test]
    fn test_defaults_for_label() {
        assert_eq!(
            PersonaEngine::defaults_for_label("The Family Planner"),
            Needs { maternity: Some(true), ..Needs::default() }
        );
        assert!(PersonaEngine::defaults_for_label("Night Owl").is_empty());
    }
}
