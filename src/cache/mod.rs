//! Cache module for storing HTTP responses on disk
//!
//! Responses are keyed by the exact request locator and kept in one JSON
//! object file. Entries never expire; deleting the file is the only way to
//! force a re-fetch.

mod store;

pub use store::{default_path, CacheError, CacheStore};
