use clap::Parser;
use amspice::analysis;
use amspice::output;
use amspice::parser;
use amspice::solver::{GaussJordanSolver, NewtonParams};
use amspice::stats::Stats;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Transient circuit simulator
#[derive(Parser)]
#[command(name = "amspice", version)]
struct Cli {
    /// Netlist file to simulate
    netlist: PathBuf,

    /// Output table (defaults to `<netlist>.out`)
    output: Option<PathBuf>,

    /// Seed for the Newton-Raphson restart generator
    #[arg(long)]
    seed: Option<u64>,

    /// Print performance stats to stderr
    #[arg(long)]
    stats: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stats = if cli.stats { Some(Stats::new()) } else { None };

    let t = Instant::now();
    let netlist = parser::read_netlist(&cli.netlist).unwrap_or_else(|e| {
        eprintln!("Parse error: {}", e);
        std::process::exit(1);
    });
    if let Some(ref mut s) = stats { s.add_phase("Parse", t.elapsed()); }

    let params = NewtonParams {
        seed: cli.seed,
        ..Default::default()
    };
    let result = analysis::transient::run(
        &netlist,
        &GaussJordanSolver::new(),
        &params,
        stats.as_mut(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Transient analysis error: {}", e);
        std::process::exit(1);
    });

    let output_path = cli.output.unwrap_or_else(|| {
        let mut name = cli.netlist.clone().into_os_string();
        name.push(".out");
        PathBuf::from(name)
    });
    let written = File::create(&output_path)
        .map_err(amspice::error::AmspiceError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            output::write_tran_table(&result, &mut writer)?;
            writer.flush()?;
            Ok(())
        });
    if let Err(e) = written {
        eprintln!("Output error ({}): {}", output_path.display(), e);
        std::process::exit(1);
    }
    tracing::info!(path = %output_path.display(), "results written");

    if let Some(ref stats) = stats {
        stats.display();
    }
}
