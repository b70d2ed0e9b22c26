//! Interactive prompt for browsing sites by state
//!
//! The session asks for a state, lists its national sites with 1-based
//! ordinals, and lets the user drill into places near one of them. Input and
//! output are generic so sessions can be scripted in tests.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::data::{NationalSite, Place, PlacesClient, SiteDirectory};
use crate::error::AppError;
use crate::fetch::{Fetcher, Transport};
use crate::states::normalize_state;

const STATE_PROMPT: &str = "Enter a state name (e.g. Michigan, michigan) or \"exit\": ";
const SELECTION_PROMPT: &str = "Choose the number for detail search or \"exit\" or \"back\": ";
const STATE_BANNER: &str = "----------------";
const PLACES_BANNER: &str = "----------------------------------------";

/// Parsed answer to the state prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateInput {
    Exit,
    State(&'static str),
    Invalid,
}

/// Parsed answer to the site selection prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Exit,
    Back,
    /// Zero-based index into the listed sites
    Site(usize),
    Invalid,
}

/// Interprets a line typed at the state prompt
pub fn parse_state_input(line: &str) -> StateInput {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return StateInput::Exit;
    }
    match normalize_state(trimmed) {
        Some(state) => StateInput::State(state),
        None => StateInput::Invalid,
    }
}

/// Interprets a line typed at the selection prompt
///
/// Ordinals are accepted only within `[1, count]`.
pub fn parse_selection(line: &str, count: usize) -> Selection {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return Selection::Exit;
    }
    if trimmed.eq_ignore_ascii_case("back") {
        return Selection::Back;
    }
    match trimmed.parse::<usize>() {
        Ok(ordinal) if (1..=count).contains(&ordinal) => Selection::Site(ordinal - 1),
        _ => Selection::Invalid,
    }
}

/// An interactive browsing session over arbitrary input and output
pub struct Session<'a, T, R, W> {
    fetcher: &'a mut Fetcher<T>,
    directory: SiteDirectory,
    places: Option<PlacesClient>,
    input: R,
    output: W,
}

impl<'a, T, R, W> Session<'a, T, R, W>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    pub fn new(
        fetcher: &'a mut Fetcher<T>,
        directory: SiteDirectory,
        places: Option<PlacesClient>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            fetcher,
            directory,
            places,
            input,
            output,
        }
    }

    /// Runs until the user types `exit` or input ends
    ///
    /// Invalid input is reported and reprompted. Fetch, scrape and parse
    /// errors end the session and are returned to the caller.
    pub async fn run(mut self) -> Result<(), AppError> {
        loop {
            let Some(line) = self.prompt(STATE_PROMPT)? else {
                return Ok(());
            };

            let state = match parse_state_input(&line) {
                StateInput::Exit => return Ok(()),
                StateInput::Invalid => {
                    writeln!(self.output, "[Error] Enter proper state name")?;
                    continue;
                }
                StateInput::State(state) => state,
            };

            let state_url = self.directory.state_url(self.fetcher, state).await?;
            let sites = self.directory.sites_for_state(self.fetcher, &state_url).await?;
            self.print_sites(state, &sites)?;

            if !self.select_sites(&sites).await? {
                return Ok(());
            }
        }
    }

    /// Handles the selection prompt; returns false when the session should end
    async fn select_sites(&mut self, sites: &[NationalSite]) -> Result<bool, AppError> {
        loop {
            let Some(line) = self.prompt(SELECTION_PROMPT)? else {
                return Ok(false);
            };

            match parse_selection(&line, sites.len()) {
                Selection::Exit => return Ok(false),
                Selection::Back => return Ok(true),
                Selection::Invalid => {
                    writeln!(self.output, "[Error] Invalid input")?;
                }
                Selection::Site(index) => {
                    let site = &sites[index];
                    let Some(client) = &self.places else {
                        writeln!(
                            self.output,
                            "[Error] No places API key configured (set MAPQUEST_API_KEY or --api-key)"
                        )?;
                        continue;
                    };
                    let places = client.nearby(self.fetcher, site).await?;
                    self.print_places(site, &places)?;
                }
            }
        }
    }

    /// Writes a prompt and reads one line; `None` means input ended
    ///
    /// Bytes that are not valid UTF-8 are replaced, so such a line is simply
    /// rejected by the prompt's validation.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            debug!("input closed");
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn print_sites(&mut self, state: &str, sites: &[NationalSite]) -> Result<(), AppError> {
        writeln!(self.output, "{}", STATE_BANNER)?;
        writeln!(self.output, "List of national sites in {}", state)?;
        writeln!(self.output, "{}", STATE_BANNER)?;
        for (i, site) in sites.iter().enumerate() {
            writeln!(self.output, "[{}] {}", i + 1, site.info())?;
        }
        Ok(())
    }

    fn print_places(&mut self, site: &NationalSite, places: &[Place]) -> Result<(), AppError> {
        writeln!(self.output, "{}", PLACES_BANNER)?;
        writeln!(self.output, "Places near {}", site.name)?;
        writeln!(self.output, "{}", PLACES_BANNER)?;
        for place in places {
            writeln!(self.output, "{}", place)?;
        }
        Ok(())
    }
}
