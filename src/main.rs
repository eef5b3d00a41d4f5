mod args;
mod survey;

use std::fs::File;

use clap::Parser;
use log::{error, info};

use crate::args::Args;

fn logging_builder(
    args: &Args,
    env: env_logger::Env,
) -> Result<env_logger::Builder, std::io::Error> {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env.default_filter_or(default_level));
    // The form takes over the terminal, the logs should go to a file while it is shown.
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    Ok(builder)
}

fn init_logging(args: &Args) -> Result<(), std::io::Error> {
    logging_builder(args, env_logger::Env::default())?.init();
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("Could not open the log file: {}", e);
        std::process::exit(1);
    }
    info!("args: {:?}", args);

    match survey::run_survey(&args) {
        Ok(exit) => {
            info!("Form closed: {:?}", exit);
        }
        Err(e) => {
            error!("Error occurred: {:?}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
