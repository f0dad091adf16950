use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use pendulums::cli::{self, Args};
use pendulums::driver::Driver;
use pendulums::error::CliError;
use pendulums::logging;
use pendulums::trace::CsvTrace;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = cli::load_and_apply_config(args)?;

    // Validate before anything is written or run
    config.physics.validate()?;

    match config.to_toml() {
        Ok(toml_string) => {
            info!("=== Current Configuration (TOML) ===\n{}", toml_string);
            info!("=== End Configuration ===");
        }
        Err(e) => warn!("Failed to serialize configuration to TOML: {}", e),
    }

    if let Some(path) = &args.write_config {
        config.save(path)?;
        info!("Configuration written to: {}", path.display());
        return Ok(());
    }

    if args.save_user_config {
        let path = config.save_to_user_config()?;
        info!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let mut driver = Driver::from_config(&config)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    run_trace(&mut driver, args.steps, CsvTrace::new(writer))
}

fn run_trace<W: Write>(
    driver: &mut Driver,
    steps: Option<u64>,
    mut trace: CsvTrace<W>,
) -> Result<(), CliError> {
    let summary = driver.run(steps, &mut trace)?;
    trace.into_inner().flush()?;

    if let Some(blow_up) = summary.blow_up {
        warn!(step = blow_up.step, "state went non-finite during the run");
    }

    Ok(())
}

