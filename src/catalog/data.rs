//! Plan records as joined by the data layer

use crate::contribution::ContributionRecord;
use crate::persona::PersonaType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One plan with its contribution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub slug: String,

    /// Plan family, e.g. "Comprehensive" or "Saver"
    #[serde(rename = "type", default)]
    pub plan_type: String,

    /// Persona display names this plan is aimed at
    #[serde(default, deserialize_with = "persona_tags")]
    pub target_personas: Vec<String>,

    /// Contribution configurations; the first one prices the plan
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
}

impl PlanRecord {
    pub fn primary_contribution(&self) -> Option<&ContributionRecord> {
        self.contributions.first()
    }

    /// Whether any target persona tag names this persona
    pub fn targets(&self, persona: PersonaType) -> bool {
        self.target_personas
            .iter()
            .any(|tag| PersonaType::from_label(tag) == Some(persona))
    }
}

/// Ordered set of plans under comparison
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanCatalog {
    plans: Vec<PlanRecord>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<PlanRecord>) -> Self {
        Self { plans }
    }

    pub fn plans(&self) -> &[PlanRecord] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&PlanRecord> {
        self.plans.iter().find(|plan| plan.slug == slug)
    }

    /// Plans aimed at a persona, in catalog order
    pub fn for_persona(&self, persona: PersonaType) -> PlanCatalog {
        self.filtered(|plan| plan.targets(persona))
    }

    /// Plans whose name contains the fragment, ignoring case
    pub fn matching_name(&self, fragment: &str) -> PlanCatalog {
        let fragment = fragment.to_lowercase();
        self.filtered(|plan| plan.name.to_lowercase().contains(&fragment))
    }

    fn filtered<F: Fn(&PlanRecord) -> bool>(&self, keep: F) -> PlanCatalog {
        PlanCatalog::new(self.plans.iter().filter(|plan| keep(*plan)).cloned().collect())
    }
}

/// Lower-case hyphenated form of a plan name
pub(crate) fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Split a `;`-separated tag list
pub(crate) fn split_tags(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("unsupported plan id: {}", other))),
    }
}

// Tags arrive as a list, a `;`-separated string, or an unrelated object
fn persona_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(raw)) => split_tags(&raw),
        _ => Vec::new(),
    })
}
