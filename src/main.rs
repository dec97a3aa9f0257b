use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use geo_speed::feed::{PositionFeed, ReplayFeed, SimulatedFeed};
use geo_speed::{IntervalSource, OutputFormat, PipelineConfig, Position, SpeedFormatter, SpeedPipeline};

/// Start of the simulated track
const SIMULATION_START: Position = Position::new(-34.6037, -58.3816);

#[derive(Debug, Parser)]
#[command(author, version, about = "Estimate speed from a stream of GPS fixes", long_about = None)]
struct Args {
    /// Recorded fixes, one per line as `lat,lon`, `timestamp_ms,lat,lon` or a
    /// JSON object. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// JSON pipeline configuration; flags below override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Raw fixes averaged into one reported position
    #[arg(long)]
    batch_size: Option<usize>,

    /// Number of batches in the moving-average window
    #[arg(long)]
    window_size: Option<usize>,

    /// Speeds at or below this value (km/h) are reported as 0
    #[arg(long)]
    noise_floor: Option<f64>,

    /// Nominal time between fixes in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Use fix timestamps instead of the nominal interval when available
    #[arg(long, default_value_t = false)]
    measured_interval: bool,

    /// Output format: text, json or csv
    #[arg(short = 'f', long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Decimal places for reported speeds
    #[arg(long, default_value_t = 0)]
    precision: usize,

    /// Abort on the first malformed fix instead of skipping it
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Replace the input with a simulated track at this speed (km/h)
    #[arg(long)]
    simulate: Option<f64>,

    /// Fixes produced by the simulated track
    #[arg(long, default_value_t = 60)]
    samples: usize,

    /// Heading of the simulated track in degrees clockwise from north
    #[arg(long, default_value_t = 0.0)]
    bearing: f64,

    /// Enables debug log output
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level_filter = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();

    let config = build_config(&args)?;
    info!("pipeline config: {:?}", config);

    let mut pipeline = SpeedPipeline::new(config.clone())?;
    let mut feed = open_feed(&args, &config)?;
    let formatter = SpeedFormatter::new()
        .with_format(args.format)
        .with_precision(args.precision);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut fixes = 0usize;
    while let Some(fix) = feed.next_fix()? {
        fixes += 1;
        if let Some(report) = pipeline.submit_detailed(fix) {
            writeln!(out, "{}", formatter.format(&report)?)?;
        }
    }

    info!(
        "processed {} fixes into {} batches ({} left pending)",
        fixes,
        pipeline.batches_processed(),
        pipeline.pending_samples()
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<PipelineConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(window_size) = args.window_size {
        config.window_size = window_size;
    }
    if let Some(noise_floor) = args.noise_floor {
        config.noise_floor_kmh = noise_floor;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.sample_interval_ms = interval_ms;
    }
    if args.measured_interval {
        config.interval_source = IntervalSource::Measured;
    }

    config.validate()?;
    Ok(config)
}

fn open_feed(args: &Args, config: &PipelineConfig) -> Result<Box<dyn PositionFeed>, Box<dyn Error>> {
    if let Some(speed_kmh) = args.simulate {
        info!("simulating {} fixes at {} km/h, bearing {}", args.samples, speed_kmh, args.bearing);
        let feed = SimulatedFeed::new(SIMULATION_START, args.bearing, speed_kmh, args.samples)
            .with_interval(config.sample_interval_ms)
            .with_jitter(1.0);
        return Ok(Box::new(feed));
    }

    let feed: Box<dyn PositionFeed> = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            let feed = ReplayFeed::from_file(path)?;
            if args.strict {
                Box::new(feed.strict())
            } else {
                Box::new(feed)
            }
        }
        _ => {
            let feed = ReplayFeed::new(io::stdin().lock());
            if args.strict {
                Box::new(feed.strict())
            } else {
                Box::new(feed)
            }
        }
    };
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, config: &PipelineConfig) -> PathBuf {
        let path = std::env::temp_dir().join(format!("geo_speed_cli_{}_{}.json", name, std::process::id()));
        config.save_to_file(&path).unwrap();
        path
    }

    #[test]
    fn test_config_file_values_without_flags() {
        let file_config = PipelineConfig::new().with_batch_size(4).with_window_size(7);
        let path = write_config("plain", &file_config);

        let args = Args::try_parse_from(["geo-speed", "--config", path.to_str().unwrap()]).unwrap();
        let config = build_config(&args);
        let _ = fs::remove_file(&path);

        assert_eq!(config.unwrap(), file_config);
    }

    #[test]
    fn test_flags_override_config_file() {
        let file_config = PipelineConfig::new()
            .with_batch_size(4)
            .with_window_size(7)
            .with_noise_floor(2.0)
            .with_sample_interval(500);
        let path = write_config("override", &file_config);

        let args = Args::try_parse_from([
            "geo-speed",
            "--config",
            path.to_str().unwrap(),
            "--batch-size",
            "2",
            "--noise-floor",
            "6.5",
            "--measured-interval",
        ])
        .unwrap();
        let config = build_config(&args);
        let _ = fs::remove_file(&path);
        let config = config.unwrap();

        assert_eq!(config.batch_size, 2);
        assert_eq!(config.noise_floor_kmh, 6.5);
        assert_eq!(config.interval_source, IntervalSource::Measured);
        // Untouched by flags
        assert_eq!(config.window_size, 7);
        assert_eq!(config.sample_interval_ms, 500);
    }

    #[test]
    fn test_merged_config_is_validated() {
        let path = write_config("invalid", &PipelineConfig::default());

        let args = Args::try_parse_from([
            "geo-speed",
            "--config",
            path.to_str().unwrap(),
            "--window-size",
            "0",
        ])
        .unwrap();
        let result = build_config(&args);
        let _ = fs::remove_file(&path);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("window_size"), "unexpected error: {}", err);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let args = Args::try_parse_from(["geo-speed", "--interval-ms", "250"]).unwrap();
        let config = build_config(&args).unwrap();

        assert_eq!(config, PipelineConfig::default().with_sample_interval(250));
        assert_eq!(args.format, OutputFormat::Text);
    }
}
