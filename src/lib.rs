pub mod cli;
pub mod models;
pub mod recipe;
pub mod report;
pub mod session;
pub mod settings;
pub mod store;
pub mod timer;
pub mod timing;
pub mod tracker;
pub mod utils;

use clap::Parser;

pub fn run() -> anyhow::Result<()> {
    // Reads RUST_LOG; DESEM_DEBUG=1 lowers the default to Debug
    utils::logging::init();

    let cli = cli::Cli::parse();
    log::debug!("desem starting up...");
    cli::commands::execute(cli)
}
