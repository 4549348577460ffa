use clap::{Parser, Subcommand};
use std::path::PathBuf;

use drought_map_tool::audit::audit_shapes;
use drought_map_tool::config::Config;
use drought_map_tool::export::export_shapes;
use drought_map_tool::refdata::ReferenceData;
use drought_map_tool::store::{DroughtStore, RegionLevel, ShapeStore};

#[derive(Debug, Parser)]
#[clap(
  name = "drought_map_tool",
  about = "A tool for working with drought dashboard databases",
  version
)]
struct Cli {
  #[clap(subcommand)]
  command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
  #[clap(
    name = "export",
    about = "Export region boundaries from a shapes database as GeoJSON"
  )]
  Export {
    /// Region level to export (province or county)
    #[clap(long, value_parser, default_value = "province")]
    level: String,

    /// Shapes database
    #[clap(value_parser)]
    input: PathBuf,

    /// Output file; a .gz suffix enables compression
    #[clap(value_parser)]
    output: PathBuf,
  },
  #[clap(
    name = "check",
    about = "Decode every stored boundary and report rows that fail"
  )]
  Check {
    /// Shapes database
    #[clap(value_parser)]
    input: PathBuf,
  },
  #[clap(
    name = "info",
    about = "Summarize the databases referenced by a dashboard config"
  )]
  Info {
    /// Dashboard configuration file
    #[clap(value_parser)]
    config: PathBuf,
  },
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let args = Cli::parse();
  match args.command {
    Commands::Export {
      level,
      input,
      output,
    } => {
      if !input.exists() {
        anyhow::bail!("input file does not exist: {}", input.display());
      }
      let level: RegionLevel = level.parse()?;
      let store = ShapeStore::open(&input)?;
      let count = export_shapes(&store, level, &output)?;
      println!("Wrote {} {} boundaries to {}", count, level.label(), output.display());
    }
    Commands::Check { input } => {
      if !input.exists() {
        anyhow::bail!("input file does not exist: {}", input.display());
      }
      let store = ShapeStore::open(&input)?;
      let report = audit_shapes(&store)?;
      println!(
        "Checked {} boundary rows ({} provinces, {} counties).",
        report.checked(),
        report.provinces,
        report.counties
      );
      for fault in &report.faults {
        println!(
          "[{}] row {} ({}): {}",
          fault.level.label(),
          fault.id,
          fault.name,
          fault.error
        );
      }
      if !report.is_clean() {
        anyhow::bail!("{} boundary rows failed to decode", report.faults.len());
      }
      println!("All boundary rows decoded cleanly.");
    }
    Commands::Info { config } => {
      let config = Config::from_path(&config)?;
      let drought = DroughtStore::open(&config.drought_db)?;
      let shapes = ShapeStore::open(&config.shapes_db)?;
      let data = ReferenceData::load(&drought, &shapes)?;
      println!("Provinces: {}", data.province_shapes.len());
      println!("Counties: {}", data.county_shapes.len());
      match (data.years.first(), data.years.last()) {
        (Some(first), Some(last)) => {
          println!("Years: {}-{} ({} with data)", first, last, data.years.len())
        }
        _ => println!("Years: none"),
      }
    }
  }
  Ok(())
}
