//! Personas, declared needs and the risks reported against a plan

use crate::notice::EngineNotice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named user archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PersonaType {
    ChronicWarrior,
    DigitalNative,
    FamilyPlanner,
    BudgetConscious,
    RegionalResident,
    Executive,
}

impl PersonaType {
    pub const ALL: [PersonaType; 6] = [
        PersonaType::ChronicWarrior,
        PersonaType::DigitalNative,
        PersonaType::FamilyPlanner,
        PersonaType::BudgetConscious,
        PersonaType::RegionalResident,
        PersonaType::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaType::ChronicWarrior => "Chronic Warrior",
            PersonaType::DigitalNative => "Digital Native",
            PersonaType::FamilyPlanner => "Family Planner",
            PersonaType::BudgetConscious => "Budget Conscious",
            PersonaType::RegionalResident => "Regional Resident",
            PersonaType::Executive => "Executive",
        }
    }

    /// URL slug as used by persona pages, e.g. `the-chronic-warrior`
    pub fn slug(&self) -> String {
        format!("the-{}", self.as_str().to_lowercase().replace(' ', "-"))
    }

    /// Parse a persona from its name, display name ("The Chronic Warrior") or slug
    pub fn from_label(label: &str) -> Option<Self> {
        let words: Vec<String> = label
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        let words = match words.split_first() {
            Some((first, rest)) if first == "the" => rest,
            _ => &words[..],
        };
        let normalized = words.join(" ");

        Self::ALL
            .into_iter()
            .find(|persona| persona.as_str().to_lowercase() == normalized)
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PersonaType {
    type Error = EngineNotice;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::from_label(&label).ok_or(EngineNotice::UnrecognizedPersona { label })
    }
}

impl From<PersonaType> for String {
    fn from(persona: PersonaType) -> Self {
        persona.as_str().to_string()
    }
}

/// Declared needs from triage questions; unanswered flags count as "no"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Needs {
    /// Needs Additional Disease List chronic cover
    #[serde(rename = "chronicADL", default, skip_serializing_if = "Option::is_none")]
    pub chronic_adl: Option<bool>,
    /// Anticipates joint or back surgery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orthopedic: Option<bool>,
    /// Pregnant or planning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maternity: Option<bool>,
    /// Travels frequently
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel: Option<bool>,
    /// Happy to start care through apps and video consults
    #[serde(rename = "digitalFirst", default, skip_serializing_if = "Option::is_none")]
    pub digital_first: Option<bool>,
}

impl Needs {
    pub fn has(&self, flag: NeedFlag) -> bool {
        let value = match flag {
            NeedFlag::ChronicAdl => self.chronic_adl,
            NeedFlag::Orthopedic => self.orthopedic,
            NeedFlag::Maternity => self.maternity,
            NeedFlag::Travel => self.travel,
            NeedFlag::DigitalFirst => self.digital_first,
        };
        value.unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Answers in `overrides` replace these; unanswered ones keep the current value
    pub fn overlay(self, overrides: Needs) -> Needs {
        Needs {
            chronic_adl: overrides.chronic_adl.or(self.chronic_adl),
            orthopedic: overrides.orthopedic.or(self.orthopedic),
            maternity: overrides.maternity.or(self.maternity),
            travel: overrides.travel.or(self.travel),
            digital_first: overrides.digital_first.or(self.digital_first),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedFlag {
    ChronicAdl,
    Orthopedic,
    Maternity,
    Travel,
    DigitalFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub persona: PersonaType,
    #[serde(default)]
    pub needs: Needs,
    /// Free-form region, e.g. "Coastal" or "Inland"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl UserProfile {
    pub fn new(persona: PersonaType, needs: Needs) -> Self {
        Self {
            persona,
            needs,
            location: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// A warning raised against a plan for a user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRisk {
    pub level: RiskLevel,
    pub warning: String,
    pub details: String,
}
