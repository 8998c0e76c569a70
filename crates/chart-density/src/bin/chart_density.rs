//! chart-density CLI
//!
//! Reads a JSON or CSV record file and prints density curves as JSON.

use std::path::PathBuf;

use chart_density::{
    validation, BandwidthRule, DensityConfig, DensityEstimator, MissingPolicy, RecordSet,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Estimate kernel density curves for numeric fields of a record file
#[derive(Parser, Debug)]
#[command(name = "chart-density", version, about)]
struct Cli {
    /// Input file (.json array of objects or .csv with a header row)
    input: PathBuf,

    /// Numeric field to estimate (repeatable)
    #[arg(short, long = "field", required = true)]
    fields: Vec<String>,

    /// Estimate one curve per value of this field instead of per field
    #[arg(short, long)]
    group_by: Option<String>,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid resolution
    #[arg(short, long)]
    points: Option<usize>,

    /// Fixed bandwidth instead of Silverman's rule
    #[arg(short, long, conflicts_with = "adjust")]
    bandwidth: Option<f64>,

    /// Multiplier for Silverman's bandwidth
    #[arg(short, long)]
    adjust: Option<f64>,

    /// Drop records missing any of the requested fields
    #[arg(long)]
    drop_incomplete: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn density_config(&self) -> Result<DensityConfig, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => DensityConfig::from_path(path)?,
            None => DensityConfig::default(),
        };
        Ok(self.apply_overrides(config))
    }

    /// Flags win over the config file
    fn apply_overrides(&self, mut config: DensityConfig) -> DensityConfig {
        if let Some(points) = self.points {
            config.points = points;
        }
        if let Some(value) = self.bandwidth {
            config.bandwidth = BandwidthRule::Fixed { value };
        }
        if let Some(adjust) = self.adjust {
            config.bandwidth = BandwidthRule::Silverman { adjust };
        }
        if self.drop_incomplete {
            config.missing = MissingPolicy::DropRecord;
        }
        config
    }
}

/// Curves keyed by field, or by field then group with `--group-by`
fn estimate_curves(
    cli: &Cli,
    estimator: &DensityEstimator,
    records: &RecordSet,
) -> serde_json::Result<serde_json::Value> {
    match &cli.group_by {
        Some(group_field) => {
            let mut by_field = serde_json::Map::new();
            for field in &cli.fields {
                let groups = estimator.estimate_groups(records, group_field, field);
                by_field.insert(field.clone(), serde_json::to_value(groups)?);
            }
            Ok(serde_json::Value::Object(by_field))
        }
        None => serde_json::to_value(estimator.estimate_fields(records, &cli.fields)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (stdout carries the curves)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let estimator = DensityEstimator::new(cli.density_config()?)?;

    let records = RecordSet::from_path(&cli.input)?;
    validation::validate_sample_size(records.len(), estimator.config().limits.max_samples)?;
    tracing::info!("Loaded {} records from {:?}", records.len(), cli.input);

    let available = records.field_names();
    for field in cli.fields.iter().chain(cli.group_by.iter()) {
        if !available.contains(field) {
            tracing::warn!("Field '{}' does not appear in any record", field);
        }
    }

    let curves = estimate_curves(&cli, &estimator, &records)?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&curves)?
    } else {
        serde_json::to_string(&curves)?
    };
    println!("{}", output);

    Ok(())
}
