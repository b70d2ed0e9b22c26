//! npsites library
//!
//! Cached, rate-limited crawling of national site listings plus nearby place
//! lookups. The binary wires these modules to an interactive prompt; they are
//! exposed here for integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod repl;
pub mod states;
