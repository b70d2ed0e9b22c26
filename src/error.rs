// Top-level error type for npsites.
// Wraps module errors so a session can surface any failure to main.

use thiserror::Error;

use crate::cache::CacheError;
use crate::cli::CliError;
use crate::data::{PlacesError, ScrapeError};
use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
