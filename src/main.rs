use clap::Parser;
use log::LevelFilter;

mod args;
mod survey;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut log_builder = env_logger::Builder::from_default_env();
    if args.verbose {
        log_builder.filter_level(LevelFilter::Debug);
    }
    log_builder.init();

    if let Err(e) = survey::run_survey(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
