use anyhow::Context;
use log::{info, warn};
use nursing_home_synth::algorithm::population::check_population;
use nursing_home_synth::config::{
    ENV_COEFFICIENTS, ENV_CONFIG, ExportConfig, apply_env_overrides, env_path,
};
use nursing_home_synth::utils::logging::{create_spinner, finish_progress_bar};
use nursing_home_synth::{
    CoefficientTables, PopulationGenerator, PopulationStatistics, SynthesisConfig, export_cohort,
};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env_path(ENV_CONFIG) {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            SynthesisConfig::from_json_file(&path)
                .with_context(|| format!("reading configuration {}", path.display()))?
        }
        None => SynthesisConfig::default(),
    };
    let config = apply_env_overrides(config);

    let tables = match env_path(ENV_COEFFICIENTS) {
        Some(path) => {
            info!("Loading coefficients from: {}", path.display());
            CoefficientTables::from_json_file(&path)
                .with_context(|| format!("reading coefficients {}", path.display()))?
        }
        None => CoefficientTables::default(),
    };

    info!("{config}");
    let generator =
        PopulationGenerator::new(config, tables).context("validating generator configuration")?;

    let start = Instant::now();
    let cohort = generator.generate().context("generating cohort")?;
    info!(
        "Generated {} patients and {} screenings in {:?}",
        cohort.population.len(),
        cohort.screenings.len(),
        start.elapsed()
    );

    let stats =
        PopulationStatistics::calculate(&cohort.population.patients, &cohort.screenings);
    info!("\n{}", PopulationStatistics::generate_summary(&stats));

    let violations = check_population(
        generator.config(),
        &cohort.population.patients,
        &cohort.screenings,
    );
    if violations.is_empty() {
        info!("All cohort consistency checks passed");
    } else {
        warn!("{} consistency violations found", violations.len());
        for violation in violations.iter().take(20) {
            warn!("  {violation}");
        }
    }

    let export_config = ExportConfig::default().with_env_overrides();
    let spinner = create_spinner(Some("Writing Parquet files"));
    export_cohort(
        &export_config,
        &cohort.population.patients,
        &cohort.screenings,
    )
    .with_context(|| format!("exporting to {}", export_config.output_dir.display()))?;
    finish_progress_bar(&spinner, Some("Export complete"));

    info!("Data saved to: {}", export_config.output_dir.display());
    Ok(())
}
