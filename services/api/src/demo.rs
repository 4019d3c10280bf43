use crate::infra::{build_risk_service, parse_month, parse_selection, parse_unit, ApiRiskService};
use chrono::{Datelike, Local};
use clap::Args;
use outbreak_risk::config::{AppConfig, ConfigError};
use outbreak_risk::error::AppError;
use outbreak_risk::risk::{
    FactorValues, InterventionSelection, Month, ProjectionMode, ProjectionReport,
    ProjectionRequest, RiskFactor, RiskLevel, RiskServiceError, ScoreEngine, WeightProfile,
};

const DEMO_PACKAGE: [&str; 3] = ["pig-quarantine", "fruit-netting", "health-camps"];

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Fruit bat population density (0-1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) bat: f64,
    /// Pig farming intensity (0-1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) pig: f64,
    /// Raw date palm sap and fruit consumption practices (0-1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) fruit: f64,
    /// Human population density (0-1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) population: f64,
    /// Healthcare infrastructure quality (0-1, higher lowers risk)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) healthcare: f64,
    /// Environmental degradation (0-1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_unit)]
    pub(crate) environment: f64,
    /// Historical base risk blended into the score (0-1)
    #[arg(long, value_parser = parse_unit)]
    pub(crate) base: Option<f64>,
    /// Weight profile name (standard or alternate). Defaults to the configured profile.
    #[arg(long)]
    pub(crate) profile: Option<String>,
    /// Print each factor's weighted contribution
    #[arg(long)]
    pub(crate) explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Region identifier, e.g. region1
    #[arg(long)]
    pub(crate) region: String,
    /// Intervention id, optionally scheduled as id@month. Repeatable.
    #[arg(long = "intervention", value_parser = parse_selection)]
    pub(crate) interventions: Vec<InterventionSelection>,
    /// Projection mode (constant or temporal). Defaults to the configured mode.
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<ProjectionMode>,
    /// Month the headline figures are read from (1-12)
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<Month>,
    /// Print the full twelve month projection
    #[arg(long)]
    pub(crate) monthly: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Limit the demo to one region identifier. Defaults to every region.
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Month the seasonal outlook is read from (defaults to the current month)
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<Month>,
}

fn parse_mode(raw: &str) -> Result<ProjectionMode, String> {
    ProjectionMode::from_name(raw)
        .ok_or_else(|| format!("unknown projection mode '{raw}' (expected constant or temporal)"))
}

fn load_service() -> Result<(AppConfig, ApiRiskService), AppError> {
    let config = AppConfig::load()?;
    let service = build_risk_service(&config.scoring)?;
    Ok((config, service))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let weights = match args.profile {
        Some(name) => {
            WeightProfile::named(&name).ok_or(ConfigError::InvalidWeightProfile(name))?
        }
        None => AppConfig::load()?.scoring.weights,
    };

    let values = FactorValues {
        bat_density: args.bat,
        pig_farming_intensity: args.pig,
        fruit_consumption_practices: args.fruit,
        human_population_density: args.population,
        healthcare_infrastructure: args.healthcare,
        environmental_degradation: args.environment,
    };
    let factors = values
        .validate()
        .map_err(RiskServiceError::from)?;

    if let Some(warning) = weights.check() {
        println!("Warning: {warning}");
    }

    let breakdown = ScoreEngine::new(weights).breakdown(&factors, args.base);
    let level = RiskLevel::from_score(breakdown.risk_score);
    println!("Risk Score: {:.3}", breakdown.risk_score);
    println!("Risk Classification: {} ({})", level.name(), level.recommendation());

    if args.explain {
        println!("Factor contributions:");
        for component in &breakdown.components {
            println!(
                "  - {:<28} value {:.2} | weight {:.2} | contributes {:.3}",
                component.factor.label(),
                component.value,
                component.weight,
                component.contribution
            );
        }
        println!("  Weighted average: {:.3}", breakdown.raw_score);
        if let Some(base) = breakdown.base_risk_score {
            println!("  Blended with base risk {:.2}", base);
        }
    }

    Ok(())
}

pub(crate) fn run_project(args: ProjectArgs) -> Result<(), AppError> {
    let (_, service) = load_service()?;
    let report = service.project(ProjectionRequest {
        region_identifier: args.region,
        parameters: None,
        interventions: args.interventions,
        mode: args.mode,
        month: args.month,
    })?;

    render_report(&report);
    if args.monthly {
        render_monthly(&report);
    }
    Ok(())
}

pub(crate) fn run_regions() -> Result<(), AppError> {
    let (_, service) = load_service()?;
    println!("Configured regions");
    for region in service.regions() {
        let level = RiskLevel::from_score(region.base_risk_score);
        println!(
            "- {:<10} {:<24} base risk {:.2} ({})",
            region.identifier,
            region.name,
            region.base_risk_score,
            level.name()
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { region, month } = args;
    let (config, service) = load_service()?;
    let month = month.unwrap_or_else(current_month);

    let identifiers: Vec<String> = match region {
        Some(identifier) => vec![identifier],
        None => service
            .regions()
            .into_iter()
            .map(|region| region.identifier)
            .collect(),
    };

    println!("Outbreak risk demo");
    println!(
        "Generated {} | projection mode {} | {} interventions available",
        Local::now().format("%Y-%m-%d %H:%M"),
        config.scoring.projection_mode.name(),
        service.interventions().len()
    );

    let package: Vec<InterventionSelection> = DEMO_PACKAGE
        .iter()
        .map(|id| InterventionSelection {
            id: id.to_string(),
            applied_at: None,
        })
        .collect();

    for identifier in identifiers {
        let report = service.project(ProjectionRequest {
            region_identifier: identifier.clone(),
            parameters: None,
            interventions: package.clone(),
            mode: None,
            month: None,
        })?;
        println!();
        render_report(&report);

        let outlook = service.project(ProjectionRequest {
            region_identifier: identifier,
            parameters: None,
            interventions: package.clone(),
            mode: Some(ProjectionMode::Temporal),
            month: Some(month),
        })?;
        let active_events: Vec<&str> = service
            .seasonal_events()
            .iter()
            .filter(|event| event.is_active_in(month))
            .map(|event| event.name.as_str())
            .collect();
        println!(
            "Seasonal outlook for month {}: {:.2} -> {:.2} with package ({})",
            month,
            outlook.current_score,
            outlook.post_intervention_risk,
            if active_events.is_empty() {
                "no seasonal events".to_string()
            } else {
                active_events.join(", ")
            }
        );
    }

    let saved = service.region_parameters("Kerala", "")?;
    println!(
        "\nSaved Kerala factors: bat density {:.2}, healthcare {:.2}",
        saved.get(RiskFactor::BatDensity),
        saved.get(RiskFactor::HealthcareInfrastructure)
    );

    Ok(())
}

fn current_month() -> Month {
    u8::try_from(Local::now().month()).unwrap_or(1)
}

fn render_report(report: &ProjectionReport) {
    println!("Outbreak Risk Assessment Report");
    println!(
        "Region: {} ({})",
        report.region.name, report.region.identifier
    );
    println!("Risk Score: {:.2}", report.current_score);
    println!(
        "Risk Classification: {} ({})",
        report.level.name(),
        report.level.recommendation()
    );

    println!("Applied Interventions:");
    if report.interventions.is_empty() {
        println!("  None");
        return;
    }
    for active in &report.interventions {
        println!(
            "  - {} (from month {})",
            active.intervention.name, active.applied_at
        );
    }
    println!("Post-Intervention Risk: {:.2}", report.post_intervention_risk);
    println!("Risk Reduction: {:.1}%", report.risk_reduction);
}

fn render_monthly(report: &ProjectionReport) {
    println!("Monthly projection ({} mode):", report.mode.name());
    for point in report.projection.months() {
        println!(
            "  {:>2}: {:.3} -> {:.3}",
            point.month, point.base_risk, point.intervention_risk
        );
    }
}
