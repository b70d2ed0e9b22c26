//! Core data models for the national site browser
//!
//! This module contains the records shown to the user and the clients that
//! produce them from cached or live responses.

pub mod places;
pub mod sites;

pub use places::{PlacesClient, PlacesError};
pub use sites::{ScrapeError, SiteDirectory};

use std::fmt;

/// Placeholder shown when a place has no category
const NO_CATEGORY: &str = "no category";
/// Placeholder shown when a place has no street address
const NO_ADDRESS: &str = "no address";
/// Placeholder shown when a place has no city
const NO_CITY: &str = "no city";

/// A national site scraped from its park page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalSite {
    /// Designation such as "National Park"; some sites have none
    pub category: String,
    /// Name of the site, e.g. "Isle Royale"
    pub name: String,
    /// City and state, e.g. "Houghton, MI"
    pub address: String,
    /// Postal code, e.g. "49931" or "82190-0168"
    pub zipcode: String,
    /// Contact phone number
    pub phone: String,
}

impl NationalSite {
    /// One-line summary used in site listings
    pub fn info(&self) -> String {
        format!(
            "{} ({}): {} {}",
            self.name, self.category, self.address, self.zipcode
        )
    }
}

/// A point of interest near a national site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub name: String,
    pub category: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} ({}): {}, {}",
            self.name,
            self.category.as_deref().unwrap_or(NO_CATEGORY),
            self.address.as_deref().unwrap_or(NO_ADDRESS),
            self.city.as_deref().unwrap_or(NO_CITY)
        )
    }
}
