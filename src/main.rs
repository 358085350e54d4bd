mod args;
mod stats;

use clap::Parser;
use log::{info, warn, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    info!("args: {:?}", args);

    if let Err(e) = stats::run_from_args(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
