//! `kiosk` binary: administrative access to the kiosk documents.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use kiosk::{Cli, CliError, KioskContext, KioskSettings, run};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run_with_settings(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "kiosk: {err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_with_settings(cli: &Cli) -> Result<(), CliError> {
    let settings = KioskSettings::load_for_process()?;
    init_tracing(settings.log_json);
    let context = KioskContext::from_settings(&settings, Arc::new(DefaultClock))?;
    run(cli, &context, &mut io::stdout().lock())
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
