//! npsites - Browse U.S. national sites by state
//!
//! An interactive prompt that lists national sites for a state and looks up
//! places near a chosen site. Every response is cached on disk so repeat
//! lookups never hit the network.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use npsites::cache::CacheStore;
use npsites::cli::{Cli, RuntimeConfig};
use npsites::data::{PlacesClient, SiteDirectory};
use npsites::error::Result;
use npsites::fetch::{Fetcher, HttpTransport};
use npsites::logging;
use npsites::repl::Session;

async fn run(config: RuntimeConfig) -> Result<()> {
    let store = CacheStore::load(&config.cache_file);
    info!(path = %store.path().display(), entries = store.len(), "cache ready");

    let transport = HttpTransport::new(config.timeout)?;
    let mut fetcher = Fetcher::new(store, transport).with_min_delay(config.min_delay);
    let places = config.api_key.map(PlacesClient::new);

    let stdin = io::stdin();
    let session = Session::new(
        &mut fetcher,
        SiteDirectory::new(),
        places,
        stdin.lock(),
        io::stdout(),
    );
    session.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RuntimeConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_level);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
