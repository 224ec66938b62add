//! Plan Compare CLI
//!
//! Prices every plan in a catalog for one household and lists the risks each
//! plan carries for the chosen persona.

use anyhow::{bail, Context, Result};
use clap::Parser;
use plan_compare::catalog::{load_catalog, loader::DEFAULT_CATALOG_PATH};
use plan_compare::persona::{Needs, PersonaEngine, PersonaType, UserProfile};
use plan_compare::{MemberCounts, PlanAssessment, PlanComparer, PricingEngine, UserScenario};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "plan_compare", version, about = "Compare medical aid plans for a household")]
struct Args {
    /// Plan catalog export (CSV, or JSON by extension)
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    /// Persona name, display name or slug (e.g. the-chronic-warrior)
    #[arg(long, default_value = "Budget Conscious")]
    persona: String,

    /// Principal members
    #[arg(long, default_value_t = 1)]
    main: u32,

    /// Adult dependants
    #[arg(long, default_value_t = 0)]
    adult: u32,

    /// Child dependants
    #[arg(long, default_value_t = 0)]
    child: u32,

    /// Monthly household income (selects income-banded rates)
    #[arg(long, default_value_t = 0.0)]
    income: f64,

    /// Declared needs as JSON, overriding persona defaults (e.g. '{"orthopedic": true}')
    #[arg(long)]
    needs: Option<String>,

    /// Only plans whose name contains this text
    #[arg(long)]
    plan: Option<String>,

    /// Only plans aimed at the persona
    #[arg(long)]
    targeted: bool,

    /// Print assessments as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let Some(persona) = PersonaType::from_label(&args.persona) else {
        let known: Vec<_> = PersonaType::ALL.iter().map(|p| p.as_str()).collect();
        bail!("Unknown persona '{}'. Known personas: {}", args.persona, known.join(", "));
    };

    let mut needs = PersonaEngine::defaults_for(persona);
    if let Some(raw) = &args.needs {
        let answers: Needs = serde_json::from_str(raw).context("Invalid --needs JSON")?;
        needs = needs.overlay(answers);
    }

    let mut catalog = load_catalog(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    if args.targeted {
        catalog = catalog.for_persona(persona);
    }
    if let Some(fragment) = &args.plan {
        catalog = catalog.matching_name(fragment);
    }

    let members = MemberCounts::new(args.main, args.adult, args.child);
    let scenario = UserScenario::new(members, args.income);
    let comparer = PlanComparer::new(scenario, UserProfile::new(persona, needs));
    let assessments = comparer.assess_all(&catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessments)?);
        return Ok(());
    }

    print_report(&comparer, &assessments);
    Ok(())
}

fn print_report(comparer: &PlanComparer, assessments: &[PlanAssessment]) {
    let scenario = comparer.scenario();
    println!("Plan Compare v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Persona: {}", comparer.profile().persona);
    println!(
        "Household: {} main, {} adult, {} child | Income: R{:.0}",
        scenario.members.main, scenario.members.adult, scenario.members.child, scenario.income
    );
    println!();

    if assessments.is_empty() {
        println!("No plans matched.");
        return;
    }

    println!(
        "{:<32} {:>10} {:>11} {:>10} {:>11} {:>10} {:>10}  {}",
        "Plan", "Monthly", "Annual", "MSA/yr", "Threshold", "SPG", "LATB", "Risk"
    );
    println!("{}", "-".repeat(120));

    for a in assessments {
        let p = &a.profile;
        let risk = a
            .headline_warning()
            .map(|w| format!("HIGH: {}", w))
            .or_else(|| a.risks.first().map(|r| format!("{:?}: {}", r.level, r.warning)))
            .unwrap_or_default();
        println!(
            "{:<32} {:>10.2} {:>11.2} {:>10.2} {:>11.2} {:>10.2} {:>10.2}  {}",
            a.plan_name,
            p.monthly_premium,
            p.annual_premium,
            p.savings.annual_allocation,
            p.thresholds.annual_threshold,
            p.thresholds.self_payment_gap,
            p.thresholds.limited_above_threshold,
            risk
        );
    }

    let flagged: Vec<_> = assessments.iter().filter(|a| !a.risks.is_empty()).collect();
    if !flagged.is_empty() {
        println!("\nRisks:");
        for a in flagged {
            for r in &a.risks {
                println!("  [{:?}] {} - {}", r.level, a.plan_name, r.warning);
                println!("         {}", r.details);
            }
        }
    }

    let degraded: Vec<_> = assessments.iter().filter(|a| a.is_degraded()).collect();
    if !degraded.is_empty() {
        println!("\nData notes:");
        for a in degraded {
            for n in &a.notices {
                let effect = if n.zeroes_output() { "zeroed" } else { "estimated" };
                println!("  {}: {} ({})", a.plan_name, n, effect);
            }
        }
    }

    println!("\n{}", PricingEngine::disclaimer());
}
