//! ProofPass testnet account provisioner entry point.

use std::{io, process};

use clap::Parser;
use log::{debug, error, info};

use proofpass_cli::{AccountArgs, CliError, init_logger, render_report, run_account};

fn main() {
    miette::set_panic_hook();

    let args = AccountArgs::parse();
    let log_level = init_logger(&args.log_level);

    info!(log_level:?; "Starting ProofPass account provisioner");
    debug!(args:?; "Parsed arguments");

    let mut stdout = io::stdout();
    if let Err(err) = run_account(&args, &mut stdout) {
        // Aborted runs have already printed their status line.
        if let CliError::Config(config_err) = &err {
            println!("❌ Error: {config_err}");
        }
        error!("{}", render_report(&err));
        process::exit(1);
    }

    info!("Completed successfully");
}
