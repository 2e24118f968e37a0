use clap::{Parser, Subcommand};
use fitlog_core::exertion::BRZYCKI_REP_LIMIT;
use fitlog_core::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Personal workout log and exertion calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Estimate the RPE of a set from a known one-rep max
    Rpe {
        /// Weight lifted
        #[arg(long)]
        weight: f64,

        /// Reps completed
        #[arg(long)]
        reps: u32,

        /// One-rep max for the exercise
        #[arg(long)]
        one_rep_max: f64,
    },

    /// Estimate a one-rep max from a set (Brzycki)
    OneRepMax {
        /// Weight lifted
        #[arg(long)]
        weight: f64,

        /// Reps completed
        #[arg(long)]
        reps: u32,
    },

    /// Export every logged set as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    fitlog_core::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rpe {
            weight,
            reps,
            one_rep_max,
        } => cmd_rpe(weight, reps, one_rep_max),
        Commands::OneRepMax { weight, reps } => cmd_one_rep_max(weight, reps),
        Commands::Serve { bind } => {
            let config = load_config(cli.config)?;
            let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            cmd_serve(data_dir, &bind)
        }
        Commands::Export { output } => {
            let config = load_config(cli.config)?;
            let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
            cmd_export(data_dir, output)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
}

fn cmd_serve(data_dir: PathBuf, bind: &str) -> Result<()> {
    let store = Store::open(data_dir)?;
    let state = fitlog_server::AppState::new(store);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(fitlog_server::serve(state, bind))
}

fn cmd_rpe(weight: f64, reps: u32, one_rep_max: f64) -> Result<()> {
    let estimate = rpe_estimate(weight, reps, one_rep_max).ok_or_else(|| {
        Error::Other("weight and one-rep max must be positive and reps at least 1".into())
    })?;

    println!(
        "RPE {} ({:.1}% of 1RM, {}% bucket)",
        estimate.rpe, estimate.percentage, estimate.bucket
    );
    println!("  {}", describe_rpe(estimate.rpe));
    Ok(())
}

fn cmd_one_rep_max(weight: f64, reps: u32) -> Result<()> {
    let max = estimate_one_rep_max(weight, reps).ok_or_else(|| {
        Error::Other(format!(
            "weight must be positive and reps between 1 and {}",
            BRZYCKI_REP_LIMIT - 1
        ))
    })?;

    println!("Estimated 1RM: {}", max);
    Ok(())
}

fn cmd_export(data_dir: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let store = Store::open(data_dir)?;

    let count = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let count = export::export_store_csv(&store, BufWriter::new(File::create(&path)?))?;
            eprintln!("✓ Exported {} sets to {}", count, path.display());
            count
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let count = export::export_store_csv(&store, &mut handle)?;
            handle.flush()?;
            count
        }
    };

    tracing::debug!("Export finished with {} rows", count);
    Ok(())
}
