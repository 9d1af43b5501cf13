use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use log::{warn, LevelFilter};

use batfilter::config::{FilterConfig, DEFAULT_MARGIN, DEFAULT_TOLERANCE};
use batfilter::logfile::LogSource;
use batfilter::output;
use batfilter::runner;
use batfilter::timespan::parse_timespan;

const ABOUT: &str = "Filter the battery log for the last full unplugged period.\n\
This outputs a tab-delimited record with two fields per line: a unix timestamp and a battery \
charge percentage.";

/// Default log location relative to $HOME.
const DEFAULT_LOG_RELPATH: &str = "aa/computer/logs/battery.tsv";

#[derive(Parser, Debug)]
#[command(version, about = ABOUT)]
struct Args {
    /// The battery log. Default: ~/aa/computer/logs/battery.tsv
    #[arg(value_name = "battery.tsv")]
    battery_log: Option<PathBuf>,

    /// Only examine this much history. Give an amount of time like
    /// "10 hours" or "2 days".
    #[arg(short, long, default_value = "3 days", value_parser = parse_timespan)]
    start: u64,

    /// Plot the results with scatterplot.py.
    #[arg(short, long)]
    plot: bool,

    /// Fully-charged samples to keep on each side of the unplugged period.
    #[arg(short, long, default_value_t = DEFAULT_MARGIN)]
    margin: usize,

    /// Percentage points below 100% that still count as fully charged.
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Print log messages to this file instead of stderr. Warning: will
    /// overwrite the file.
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Only log errors.
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,

    /// Log informational messages.
    #[arg(short, long, conflicts_with = "debug")]
    verbose: bool,

    /// Log debug messages.
    #[arg(short = 'D', long)]
    debug: bool,
}

fn init_logging(args: &Args) -> Result<()> {
    let level = if args.quiet {
        LevelFilter::Error
    } else if args.debug {
        LevelFilter::Debug
    } else if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::builder();
    builder.format_timestamp(None).filter_level(level);
    if let Some(path) = &args.log {
        let file = File::create(path)
            .map_err(|e| anyhow!("failed to open log file {}: {}", path.display(), e))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn default_log_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_LOG_RELPATH),
        None => PathBuf::from("battery.tsv"),
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == ErrorKind::BrokenPipe)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = FilterConfig {
        margin: args.margin,
        tolerance: args.tolerance,
        ..FilterConfig::default()
    };

    let now = Utc::now().timestamp();
    let start_time = now - args.start as i64;
    let log_path = args.battery_log.clone().unwrap_or_else(default_log_path);
    let mut source = LogSource::new(log_path, start_time);

    let result = if args.plot {
        let mut plotter = output::spawn_plotter()
            .map_err(|e| anyhow!("failed to start {}: {}", output::PLOT_PROGRAM, e))?;
        let mut plotter_in = plotter
            .stdin
            .take()
            .ok_or_else(|| anyhow!("plotter stdin unavailable"))?;
        let run_result = runner::run(&mut source, &mut plotter_in, &config);
        drop(plotter_in);
        let status = plotter.wait()?;
        if !status.success() {
            warn!("{} exited with {}", output::PLOT_PROGRAM, status);
        }
        run_result
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        runner::run(&mut source, &mut out, &config).and_then(|stats| {
            out.flush()?;
            Ok(stats)
        })
    };

    match result {
        Ok(_) => Ok(()),
        // The downstream pager or plotter closing early is not a failure.
        Err(err) if is_broken_pipe(&err) => Ok(()),
        Err(err) => Err(err),
    }
}
