//! Static risk rule tables and the single evaluator that runs them
//!
//! Rules are plain data: a level, a list of conditions that must all hold,
//! and the fixed warning text surfaced when they do.

use super::types::{NeedFlag, Needs, PersonaType, PlanRisk, RiskLevel, UserProfile};

/// One test against the plan name or the user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The need flag is set
    Needs(NeedFlag),
    /// The need flag is unset or false
    Lacks(NeedFlag),
    /// Plan name contains at least one fragment
    NameContainsAny(&'static [&'static str]),
    /// Plan name contains none of the fragments
    NameContainsNone(&'static [&'static str]),
    /// User has this persona
    Persona(PersonaType),
}

impl Condition {
    pub fn holds(&self, plan_name: &str, profile: &UserProfile) -> bool {
        match *self {
            Condition::Needs(flag) => profile.needs.has(flag),
            Condition::Lacks(flag) => !profile.needs.has(flag),
            Condition::NameContainsAny(fragments) => {
                fragments.iter().any(|fragment| plan_name.contains(fragment))
            }
            Condition::NameContainsNone(fragments) => {
                !fragments.iter().any(|fragment| plan_name.contains(fragment))
            }
            Condition::Persona(persona) => profile.persona == persona,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskRule {
    pub level: RiskLevel,
    pub conditions: &'static [Condition],
    pub warning: &'static str,
    pub details: &'static str,
}

impl RiskRule {
    pub fn matches(&self, plan_name: &str, profile: &UserProfile) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.holds(plan_name, profile))
    }

    pub fn to_risk(&self) -> PlanRisk {
        PlanRisk {
            level: self.level,
            warning: self.warning.to_string(),
            details: self.details.to_string(),
        }
    }
}

/// Plan exclusions that clash with a declared need; all HIGH
pub static EXCLUSION_RULES: &[RiskRule] = &[
    RiskRule {
        level: RiskLevel::High,
        conditions: &[
            Condition::Needs(NeedFlag::Orthopedic),
            Condition::NameContainsAny(&[
                "Essential Smart",
                "Essential Dynamic Smart",
                "Active Smart",
            ]),
        ],
        warning: "Joint Replacement Exclusion",
        details: "This plan strictly excludes hip, knee, and shoulder replacements unless it \
            is a PMB emergency. Classic Smart is safer.",
    },
    RiskRule {
        level: RiskLevel::High,
        conditions: &[
            Condition::Needs(NeedFlag::ChronicAdl),
            Condition::NameContainsAny(&["Smart Comprehensive"]),
        ],
        warning: "No ADL Chronic Cover",
        details: "You indicated a need for complex chronic medication. 'Classic Smart \
            Comprehensive' excludes the Additional Disease List (ADL). You must choose \
            'Classic Comprehensive'.",
    },
    // Requires maternity to be both unset and set, so it never matches.
    // Kept as published until the intended condition is confirmed.
    RiskRule {
        level: RiskLevel::High,
        conditions: &[
            Condition::Lacks(NeedFlag::Maternity),
            Condition::NameContainsAny(&["Core"]),
            Condition::Needs(NeedFlag::Maternity),
        ],
        warning: "Private Ward Exclusion",
        details: "Core plans only cover General Ward costs. For maternity, this means no \
            private room unless you pay extra.",
    },
    RiskRule {
        level: RiskLevel::High,
        conditions: &[
            Condition::NameContainsAny(&["KeyCare Start Regional"]),
            Condition::Lacks(NeedFlag::DigitalFirst),
        ],
        warning: "Digital Gatekeeper Risk",
        details: "KeyCare Start requires all GP visits to start online/digitally. If you \
            prefer walking into a doctor's rooms, you will have no cover.",
    },
    RiskRule {
        level: RiskLevel::High,
        conditions: &[
            Condition::NameContainsAny(&["Priority"]),
            Condition::Needs(NeedFlag::ChronicAdl),
        ],
        warning: "Limited ADL Cover",
        details: "Priority plans have limited ADL cover. Once your chronic allowance is \
            reached, you might pay out of pocket.",
    },
];

/// Persona/plan mismatches, evaluated after the exclusions
pub static MISMATCH_RULES: &[RiskRule] = &[
    RiskRule {
        level: RiskLevel::Low,
        conditions: &[
            Condition::Persona(PersonaType::DigitalNative),
            Condition::NameContainsNone(&["Smart", "KeyCare Start"]),
        ],
        warning: "Low Tech-Value",
        details: "This plan doesn't offer the digital-first incentives (like R0 video \
            consults) that maximize value for your profile.",
    },
    RiskRule {
        level: RiskLevel::Medium,
        conditions: &[
            Condition::Persona(PersonaType::ChronicWarrior),
            Condition::NameContainsAny(&["Core"]),
        ],
        warning: "No Day-to-Day Funding",
        details: "As a Chronic Warrior, you likely need regular GP visits. Core plans have 0% \
            day-to-day cover.",
    },
];

/// Default needs assumed for each persona before any triage answers
pub static PERSONA_DEFAULTS: [(PersonaType, Needs); 6] = [
    (
        PersonaType::ChronicWarrior,
        Needs {
            chronic_adl: Some(true),
            orthopedic: None,
            maternity: None,
            travel: None,
            digital_first: None,
        },
    ),
    (
        PersonaType::FamilyPlanner,
        Needs {
            chronic_adl: None,
            orthopedic: None,
            maternity: Some(true),
            travel: None,
            digital_first: None,
        },
    ),
    (
        PersonaType::DigitalNative,
        Needs {
            chronic_adl: None,
            orthopedic: None,
            maternity: None,
            travel: None,
            digital_first: Some(true),
        },
    ),
    (
        PersonaType::BudgetConscious,
        Needs {
            chronic_adl: None,
            orthopedic: None,
            maternity: None,
            travel: None,
            digital_first: Some(false),
        },
    ),
    (
        PersonaType::RegionalResident,
        Needs {
            chronic_adl: None,
            orthopedic: None,
            maternity: None,
            travel: Some(false),
            digital_first: None,
        },
    ),
    (
        PersonaType::Executive,
        Needs {
            chronic_adl: Some(true),
            orthopedic: None,
            maternity: None,
            travel: Some(true),
            digital_first: None,
        },
    ),
];

/// Run rule tables in order, collecting a risk for every match
pub fn evaluate(tables: &[&[RiskRule]], plan_name: &str, profile: &UserProfile) -> Vec<PlanRisk> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .filter(|rule| rule.matches(plan_name, profile))
        .map(RiskRule::to_risk)
        .collect()
}
