use clap::Parser;
use log::*;

use salestoy::{config::Config, salestoy::SalesToyApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();
    info!("Reading CSV file: {}", config.data.display());

    let stdout = std::io::stdout();
    SalesToyApp::run(&config, &mut stdout.lock())
}
