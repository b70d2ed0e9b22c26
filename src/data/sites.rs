//! National site directory scraped from nps.gov
//!
//! Pages are fetched through the cache-first `Fetcher` and parsed with
//! `scraper`. Extraction is strict: a page missing any expected element fails
//! the whole request instead of producing a partial record, since that means
//! the upstream markup has changed.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

use super::NationalSite;
use crate::fetch::{FetchError, Fetcher, Transport};

/// Base URL of the park service website
pub const NPS_BASE_URL: &str = "https://www.nps.gov";

const STATE_MENU: &str = "ul.dropdown-menu.SearchBar-keywordSearch";
const PARK_LIST: &str = "ul#list_parks";
const PARK_ITEM: &str = "li.clearfix";
const LINK: &str = "a";
const DESIGNATION: &str = "span.Hero-designation";
const TITLE: &str = "a.Hero-title";
const LOCALITY: &str = "span[itemprop=\"addressLocality\"]";
const REGION: &str = "span[itemprop=\"addressRegion\"]";
const POSTAL_CODE: &str = "span[itemprop=\"postalCode\"]";
const TELEPHONE: &str = "span[itemprop=\"telephone\"]";

/// Errors that can occur when scraping site pages
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Fetching a page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An expected element or attribute is absent from the page
    #[error("Missing expected element '{selector}' on {url}")]
    MissingElement { selector: String, url: String },

    /// The state has no entry in the site's state index
    #[error("No state page found for '{0}'")]
    UnknownState(String),

    /// A CSS selector could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Client for the state index and site pages of the park service website
#[derive(Debug, Clone)]
pub struct SiteDirectory {
    base_url: String,
}

impl Default for SiteDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteDirectory {
    /// Create a directory pointing at nps.gov
    pub fn new() -> Self {
        Self::with_base_url(NPS_BASE_URL)
    }

    /// Create a directory with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the home page carrying the state menu
    pub fn index_url(&self) -> String {
        format!("{}/index.htm", self.base_url)
    }

    /// Builds the map from lowercase state name to state page URL
    ///
    /// e.g. `{"michigan": "https://www.nps.gov/state/mi/index.htm", ...}`
    pub async fn state_index<T: Transport>(
        &self,
        fetcher: &mut Fetcher<T>,
    ) -> Result<BTreeMap<String, String>, ScrapeError> {
        let url = self.index_url();
        let html = fetcher.fetch(&url).await?;
        parse_state_index(&html, &self.base_url, &url)
    }

    /// Resolves the state page URL for an already validated state name
    pub async fn state_url<T: Transport>(
        &self,
        fetcher: &mut Fetcher<T>,
        state: &str,
    ) -> Result<String, ScrapeError> {
        let mut index = self.state_index(fetcher).await?;
        index
            .remove(state)
            .ok_or_else(|| ScrapeError::UnknownState(state.to_string()))
    }

    /// Fetches every site listed on a state page, in page order
    pub async fn sites_for_state<T: Transport>(
        &self,
        fetcher: &mut Fetcher<T>,
        state_url: &str,
    ) -> Result<Vec<NationalSite>, ScrapeError> {
        let html = fetcher.fetch(state_url).await?;
        let site_urls = parse_site_links(&html, &self.base_url, state_url)?;
        debug!(state_url, count = site_urls.len(), "found sites");

        let mut sites = Vec::with_capacity(site_urls.len());
        for site_url in &site_urls {
            sites.push(self.site(fetcher, site_url).await?);
        }
        Ok(sites)
    }

    /// Fetches and scrapes a single site page
    pub async fn site<T: Transport>(
        &self,
        fetcher: &mut Fetcher<T>,
        site_url: &str,
    ) -> Result<NationalSite, ScrapeError> {
        let html = fetcher.fetch(site_url).await?;
        parse_site(&html, site_url)
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

fn missing(selector: &str, url: &str) -> ScrapeError {
    ScrapeError::MissingElement {
        selector: selector.to_string(),
        url: url.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, css: &str, url: &str) -> Result<String, ScrapeError> {
    document
        .select(&selector(css)?)
        .next()
        .map(element_text)
        .ok_or_else(|| missing(css, url))
}

fn first_href<'a>(element: ElementRef<'a>, url: &str) -> Result<&'a str, ScrapeError> {
    element
        .select(&selector(LINK)?)
        .next()
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| missing("a[href]", url))
}

/// Parses the state dropdown menu of the home page
pub fn parse_state_index(
    html: &str,
    base_url: &str,
    url: &str,
) -> Result<BTreeMap<String, String>, ScrapeError> {
    let document = Html::parse_document(html);
    let menu = document
        .select(&selector(STATE_MENU)?)
        .next()
        .ok_or_else(|| missing(STATE_MENU, url))?;

    let mut index = BTreeMap::new();
    for item in menu.select(&selector("li")?) {
        let href = first_href(item, url)?;
        let state = element_text(item).to_lowercase();
        index.insert(state, format!("{}{}", base_url, href));
    }
    Ok(index)
}

/// Parses the park list of a state page into site page URLs
pub fn parse_site_links(html: &str, base_url: &str, url: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let list = document
        .select(&selector(PARK_LIST)?)
        .next()
        .ok_or_else(|| missing(PARK_LIST, url))?;

    let item_selector = selector(PARK_ITEM)?;
    let links = list
        .select(&item_selector)
        .map(|item| first_href(item, url).map(|href| format!("{}{}index.htm", base_url, href)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(links)
}

/// Parses a site page into a `NationalSite`
pub fn parse_site(html: &str, url: &str) -> Result<NationalSite, ScrapeError> {
    let document = Html::parse_document(html);

    let category = first_text(&document, DESIGNATION, url)?;
    let name = first_text(&document, TITLE, url)?;
    let locality = first_text(&document, LOCALITY, url)?;
    let region = first_text(&document, REGION, url)?;
    let zipcode = first_text(&document, POSTAL_CODE, url)?;
    let phone = first_text(&document, TELEPHONE, url)?;

    Ok(NationalSite {
        category,
        name,
        address: format!("{}, {}", locality, region),
        zipcode,
        phone,
    })
}
