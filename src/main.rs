use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::process::ExitCode;

use s2_vrt::cli::{is_informational, Args, Config};
use s2_vrt::{build_mosaics, GdalBackend, Result};

fn run(config: &Config) -> Result<()> {
    info!("Input: {}", config.input.display());
    info!("Output: {}", config.output.display());
    if config.cog {
        info!("Subdatasets will be converted to cloud-optimized GeoTIFF");
    }

    let mosaics = build_mosaics(&GdalBackend, config)?;
    for mosaic in &mosaics {
        info!("Created {}", mosaic.output_path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if is_informational(&e) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };
    let config = Config::try_from(args);

    // Initialize logger
    let verbose = matches!(&config, Ok(c) if c.verbose);
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match config.and_then(|config| run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
