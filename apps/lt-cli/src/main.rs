use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use lt_loop::{CycleClock, CycleOutcome, LoopConfig, LoopError, SimulatedPlant, assemble};
use lt_meta::{BuildInfo, MetaError, Reportable, global};
use lt_shim::TracingSink;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "lt-cli")]
#[command(about = "looptrace CLI - trace control loop internals through endpoint shims", long_about = None)]
struct Cli {
    /// Show debug output, such as build manifest lookup
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulated loop with traced feedback and output
    Run {
        /// Loop configuration YAML (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Leave the shims unbound to exercise the unbound-controller path
        #[arg(long)]
        skip_bind: bool,
        /// Pace cycles at the configured period instead of running flat out
        #[arg(long)]
        realtime: bool,
        /// Print cycle outcomes and the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print build and version information
    Version {
        /// Version string of the calling program
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        program_version: String,
        /// Build manifest to read instead of the packaged one
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Loop(#[from] LoopError),

    #[error(transparent)]
    Meta(#[from] MetaError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("writing output: {0}")]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

/// One JSON line per cycle outcome. The loop callback cannot return an
/// error, so the first failure is held until [`finish`](Self::finish) and
/// later outcomes are dropped.
struct OutcomeLines<W> {
    out: W,
    error: Option<CliError>,
}

impl<W: Write> OutcomeLines<W> {
    fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn push(&mut self, outcome: &CycleOutcome) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(outcome) {
            self.error = Some(e);
        }
    }

    fn write_line(&mut self, outcome: &CycleOutcome) -> CliResult<()> {
        serde_json::to_writer(&mut self.out, outcome)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(self) -> CliResult<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Run {
            config,
            skip_bind,
            realtime,
            json,
        } => cmd_run(config.as_deref(), skip_bind, realtime, json),
        Commands::Version {
            program_version,
            manifest,
            json,
        } => cmd_version(&program_version, manifest.as_deref(), json),
    }
}

fn cmd_run(config_path: Option<&Path>, skip_bind: bool, realtime: bool, json: bool) -> CliResult<()> {
    let config = match config_path {
        Some(path) => LoopConfig::load(path)?,
        None => LoopConfig::default(),
    };
    let plant = SimulatedPlant::from_config(&config.plant).map_err(LoopError::from)?;
    let mut control = assemble(&config, &plant, Arc::new(TracingSink))?;

    if skip_bind {
        tracing::warn!("shims left unbound; policy {:?}", config.on_unbound);
    } else {
        control.bind_shims();
    }

    let dt = config.period_s;
    let mut pacer = CycleClock::new(config.period()?);
    let origin = Instant::now();

    let mut lines = json.then(|| OutcomeLines::new(io::stdout()));
    let summary = control.run(config.cycles, |outcome: &CycleOutcome| {
        plant.advance(dt);
        if let Some(lines) = lines.as_mut() {
            lines.push(outcome);
        }
        if realtime {
            pacer.tick();
            thread::sleep(pacer.deadline(origin).saturating_duration_since(Instant::now()));
        }
    })?;

    if let Some(lines) = lines {
        lines.finish()?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "✓ {} cycles: {} applied, {} skipped",
        summary.cycles, summary.applied, summary.skipped
    );
    if let Some(last) = &summary.last {
        println!(
            "  t={:.3}s  sp={:.3}  pv={:.3}  u={:.3}",
            last.time_s, last.setpoint, last.measurement, last.command
        );
    }
    println!("  plant value: {:.4}", plant.value());
    Ok(())
}

fn cmd_version(program_version: &str, manifest: Option<&Path>, json: bool) -> CliResult<()> {
    let mut info = BuildInfo::new();
    match manifest {
        Some(path) => info.init_from(program_version, path),
        None => info.init(program_version),
    }
    let info = global::install(info)?;

    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
        return Ok(());
    }

    let mut properties: Vec<(String, String)> = Vec::new();
    info.publish(&mut properties);
    println!("{} ({})", info.name(), info.subsystem());
    for (key, value) in properties {
        println!("  {key}{value}");
    }
    Ok(())
}
