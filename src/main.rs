mod args;
mod atlas;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    let res = atlas::options_from_args(&args).and_then(|opts| atlas::run_atlas(&opts));

    if let Err(e) = res {
        if e.is_data_load() {
            eprintln!("Could not load the share table: {}", e);
        } else if e.is_unknown_country() {
            eprintln!("No chart drawn: {}", e);
        } else {
            eprintln!("An error occurred: {}", e);
        }
        std::process::exit(1);
    }
}
