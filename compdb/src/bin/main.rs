// SPDX-License-Identifier: GPL-3.0-or-later

use compdb::{args, config, modes};
use std::env;
use std::process::ExitCode;

/// Driver function of the application.
fn main() -> anyhow::Result<ExitCode> {
    // Parse the command line arguments.
    let matches = args::cli().get_matches();
    let arguments = args::Arguments::try_from(matches)?;

    // Initialize the logging system. The `RUST_LOG` variable overrides the verbosity flags.
    env_logger::Builder::new()
        .filter_level(log_level(arguments.verbose))
        .parse_default_env()
        .init();
    let pkg_name = env!("CARGO_PKG_NAME");
    let pkg_version = env!("CARGO_PKG_VERSION");
    log::info!("{pkg_name} v{pkg_version}");
    log::info!("{arguments}");

    // Load the configuration.
    let current_directory = env::current_dir()?;
    let configuration = config::Loader::load(&current_directory, &arguments.config)?;
    log::info!("{configuration}");

    // Run the application.
    let application = modes::Mode::configure(arguments, configuration)?;
    let result = application.run();
    log::debug!("Exit code: {result:?}");

    Ok(result)
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
