//! ProofPass handbook generator entry point.

use std::process;

use clap::Parser;
use log::{debug, error, info};

use proofpass_cli::{HandbookArgs, init_logger, render_report, run_handbook};

fn main() {
    miette::set_panic_hook();

    let args = HandbookArgs::parse();
    let log_level = init_logger(&args.log_level);

    info!(log_level:?; "Starting ProofPass handbook generator");
    debug!(args:?; "Parsed arguments");

    match run_handbook(&args) {
        Ok(report) => {
            println!("✅ PDF generado: {}", report.pdf_path.display());
            info!("Completed successfully");
        }
        Err(err) => {
            error!("{}", render_report(&err));
            process::exit(1);
        }
    }
}
