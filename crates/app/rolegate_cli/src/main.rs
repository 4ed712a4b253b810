// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run() -> Result<i32> {
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Parse(source) => commands::parse(source),
        Commands::Normalize(source) => commands::normalize(source),
        Commands::Render { source, prefix } => commands::render(source, prefix),
        Commands::Check {
            source,
            method,
            path,
            prefix,
        } => commands::check(source, method, path, prefix),
    }
}
