//! Load plan catalogs from CSV or JSON exports
//!
//! CSV exports carry one contribution per row with the pricing, savings and
//! threshold structures as JSON text; the engines decode those on use.

use super::data::{slugify, split_tags, PlanCatalog, PlanRecord};
use crate::contribution::{ContributionRecord, PricingModel};
use csv::Reader;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Default path to the bundled sample catalog
pub const DEFAULT_CATALOG_PATH: &str = "data/plans.csv";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid plan row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

/// Raw CSV row matching the plan export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(rename = "type", default)]
    plan_type: Option<String>,
    #[serde(default)]
    target_personas: Option<String>,
    #[serde(default)]
    pricing_model: Option<String>,
    #[serde(default)]
    pricing_matrix: Option<String>,
    #[serde(default)]
    msa_structure: Option<String>,
    #[serde(default)]
    threshold_structure: Option<String>,
}

impl CsvRow {
    fn to_plan(self, line: usize) -> Result<PlanRecord, CatalogError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::InvalidRow {
                line,
                reason: "plan name is empty".to_string(),
            });
        }

        let slug = non_empty(self.slug).unwrap_or_else(|| slugify(&name));
        let id = non_empty(self.id).unwrap_or_else(|| slug.clone());

        let contribution = ContributionRecord::new(
            PricingModel::from(self.pricing_model.unwrap_or_default()),
            encoded(self.pricing_matrix),
            encoded(self.msa_structure),
            encoded(self.threshold_structure),
        );

        Ok(PlanRecord {
            id,
            name,
            slug,
            plan_type: self.plan_type.unwrap_or_default(),
            target_personas: self
                .target_personas
                .as_deref()
                .map(split_tags)
                .unwrap_or_default(),
            contributions: vec![contribution],
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// JSON text stays a string so decoding problems surface per plan, not per file
fn encoded(field: Option<String>) -> Value {
    non_empty(field).map(Value::String).unwrap_or(Value::Null)
}

/// Load a catalog, choosing the format from the file extension (`.json` or CSV)
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<PlanCatalog, CatalogError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file = File::open(path)?;
    let catalog = if is_json {
        load_catalog_from_json_reader(file)?
    } else {
        load_catalog_from_reader(file)?
    };

    log::info!("Loaded {} plans from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load a CSV catalog from any reader
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<PlanCatalog, CatalogError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut plans = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        plans.push(row.to_plan(idx + 2)?);
    }

    Ok(PlanCatalog::new(plans))
}

/// Load a JSON catalog (a list of plan records) from any reader
pub fn load_catalog_from_json_reader<R: Read>(reader: R) -> Result<PlanCatalog, CatalogError> {
    let plans: Vec<PlanRecord> = serde_json::from_reader(reader)?;
    Ok(PlanCatalog::new(plans))
}

/// Load the bundled sample catalog
pub fn load_default_catalog() -> Result<PlanCatalog, CatalogError> {
    load_catalog(DEFAULT_CATALOG_PATH)
}
