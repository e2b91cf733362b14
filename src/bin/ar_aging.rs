use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use ar_aging::chrono::NaiveDate;
use ar_aging::logging::init_tracing;
use ar_aging::{AgingEngine, AgingError, IdentityStrategy, Report, Result, SafeTimeProvider, SimplifyConfig, TimeSource};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ar-aging", version, about = "Summarize an A/R aging detail report for collections")]
struct Cli {
    /// Report JSON document (default: stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Merge customers that share a canonical name
    #[arg(long = "merge-names")]
    merge_names: bool,

    /// As-of date (YYYY-MM-DD), overriding the report's own
    #[arg(long = "as-of")]
    as_of: Option<String>,

    /// JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<SimplifyConfig> {
    let mut config = match &cli.config {
        Some(path) => SimplifyConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimplifyConfig::default(),
    };
    if cli.merge_names {
        config.identity = IdentityStrategy::NameMerge;
    }
    if let Some(raw) = &cli.as_of {
        let as_of = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AgingError::InvalidDate { value: raw.clone() })?;
        config.as_of_override = Some(as_of);
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let reader: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let report = Report::from_reader(BufReader::new(reader))?;

    let time = SafeTimeProvider::new(TimeSource::System);
    let summary = AgingEngine::new(config).simplify(&report, &time);

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    writeln!(writer, "{}", summary.to_json_pretty()?)?;
    writer.flush().map_err(AgingError::from)
}
