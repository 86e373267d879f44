//! Body Simulator X - Entry point
//!
//! CLI Usage:
//!   body-simulator-x salt.exp               # Run an experiment, print its outputs
//!   body-simulator-x -a -o pa,cna           # Print pa and cna after every step
//!   body-simulator-x --diagnose salt.exp    # Also print solver counters
//!   body-simulator-x sensitivity renal pa 60 1 160 rbf nod
//!   body-simulator-x moore-sweep > moore.tsv

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use body_simulator_x::{
    analysis::{moore_sweep, run_sweep, Sweep},
    config::{load_overrides, EngineConfig, Parameters},
    engine::{Module, Simulation},
    experiment::Experiment,
    export::{export_state_json_to, CsvExporter},
    instrument::{CsvRecorder, OutputTimes, PressureInstrument, RenalInstrument, VarsInstrument},
    state::{StateRegistry, Variables},
};

#[derive(Parser, Debug)]
#[command(name = "body-simulator-x", version, about = "Guyton 1992 whole-body physiology simulator")]
struct Cli {
    /// Experiment definition file
    experiment: Option<PathBuf>,

    /// Report after every step instead of at the output times
    #[arg(short = 'a', long)]
    no_filter: bool,

    /// Comma-separated variables to print, overriding the experiment's list
    #[arg(short, long, value_delimiter = ',')]
    outputs: Vec<String>,

    /// Column separator for printed variables
    #[arg(short, long, default_value = " ")]
    separator: String,

    /// Full parameter set (JSON); missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    params_json: Option<PathBuf>,

    /// Parameter overrides, one `<name> <value>` per line
    #[arg(long)]
    params: Option<PathBuf>,

    /// Initial variable overrides, one `<name> <value>` per line
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Engine settings (JSON)
    #[arg(long, default_value = "engine.json")]
    config: PathBuf,

    /// Also write a CSV time series under exports/, sampled every N minutes
    #[arg(long, value_name = "MINUTES")]
    csv: Option<f64>,

    /// Write the final state as JSON
    #[arg(long, value_name = "FILE")]
    dump_state: Option<PathBuf>,

    /// Print solver diagnostics at the end of the run
    #[arg(long)]
    diagnose: bool,

    /// Print the parsed experiment and exit
    #[arg(long)]
    write_exp: bool,

    /// Run the inactive kidney model alongside and log differences
    #[arg(long)]
    shadow_renal: bool,

    /// Trace renal outputs on every reported step
    #[arg(long)]
    renal_trace: bool,

    /// Trace arterial pressure on every reported step
    #[arg(long)]
    pressure_trace: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one module over a range of a control value
    Sensitivity {
        module: String,
        control: String,
        min: f64,
        inc: f64,
        max: f64,
        outputs: Vec<String>,
        /// Directory for the .ssv table and .gp script
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Single-nephron GFR and TGF response for PA 80-160 mmHg
    MooreSweep,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Sensitivity {
            ref module,
            ref control,
            min,
            inc,
            max,
            ref outputs,
            ref dir,
        }) => {
            let sweep = Sweep {
                module: module.parse::<Module>()?,
                control: control.clone(),
                min,
                inc,
                max,
                outputs: outputs.clone(),
            };
            let files = run_sweep(&sweep, dir)?;
            println!("{}", files.data.display());
            println!("{}", files.script.display());
            Ok(())
        }
        Some(Command::MooreSweep) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            moore_sweep::write_sweep(&mut out, &Parameters::default(), EngineConfig::default().nephron)
        }
        None => run_simulation(&cli),
    }
}

fn run_simulation(cli: &Cli) -> Result<()> {
    log::info!("Body Simulator X starting...");

    let registry = StateRegistry::new();
    let mut config = EngineConfig::load_or_default(&cli.config);
    config.shadow_renal |= cli.shadow_renal;

    let mut params = cli
        .params_json
        .as_ref()
        .map(Parameters::load_or_default)
        .unwrap_or_default();
    if let Some(path) = &cli.params {
        load_overrides(path, &registry.params, &mut params)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?;
    }
    let mut vars = Variables::default();
    if let Some(path) = &cli.vars {
        load_overrides(path, &registry.vars, &mut vars)
            .with_context(|| format!("failed to load variables from {}", path.display()))?;
    }

    let experiment = match &cli.experiment {
        Some(path) => Experiment::load(path, &registry.params)
            .with_context(|| format!("failed to load experiment {}", path.display()))?,
        None => Experiment::empty(),
    };

    if cli.write_exp {
        print!("{}", experiment);
        return Ok(());
    }

    let outputs = if cli.outputs.is_empty() {
        experiment.output_vars().to_vec()
    } else {
        cli.outputs.clone()
    };
    let output_times = if experiment.has_times() {
        Some(experiment.output_times())
    } else {
        None
    };

    let mut sim = Simulation::new(params, vars, config).with_experiment(experiment);

    let bus = sim.bus_mut();
    if !cli.no_filter {
        bus.add_filter(output_times.map(OutputTimes::new).unwrap_or_default());
    }
    bus.add_instrument(VarsInstrument::new(std::io::stdout(), &cli.separator, outputs));
    if cli.renal_trace {
        bus.add_instrument(RenalInstrument::new(std::io::stderr(), "\t"));
    }
    if cli.pressure_trace {
        bus.add_instrument(PressureInstrument::new(std::io::stderr()));
    }
    if let Some(interval) = cli.csv {
        let exporter = CsvExporter::new(interval).context("failed to create CSV export")?;
        log::info!("Recording CSV time series to {:?}", exporter.path());
        bus.add_instrument(CsvRecorder::new(exporter));
    }

    let start_time = Instant::now();
    let summary = sim.run();
    log::info!(
        "Run finished in {:.2?}: {} steps to t = {:.3} min",
        start_time.elapsed(),
        summary.accepted,
        summary.end_min
    );

    if let Some(path) = &cli.dump_state {
        export_state_json_to(&sim.snapshot(), path)?;
    }

    if cli.diagnose {
        println!();
        sim.diagnostics().print_summary();
    }

    Ok(())
}
