//! Valid state and territory names
//!
//! The park service groups sites under every U.S. state, the District of
//! Columbia, the inhabited territories and a "national" pseudo-state.

/// All accepted state names, lowercase
pub static STATES: [&str; 57] = [
    "alabama",
    "alaska",
    "american samoa",
    "arizona",
    "arkansas",
    "california",
    "colorado",
    "connecticut",
    "delaware",
    "district of columbia",
    "florida",
    "georgia",
    "guam",
    "hawaii",
    "idaho",
    "illinois",
    "indiana",
    "iowa",
    "kansas",
    "kentucky",
    "louisiana",
    "maine",
    "maryland",
    "massachusetts",
    "michigan",
    "minnesota",
    "mississippi",
    "missouri",
    "montana",
    "national",
    "nebraska",
    "nevada",
    "new hampshire",
    "new jersey",
    "new mexico",
    "new york",
    "north carolina",
    "north dakota",
    "northern mariana islands",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "puerto rico",
    "rhode island",
    "south carolina",
    "south dakota",
    "tennessee",
    "texas",
    "utah",
    "vermont",
    "virgin islands",
    "virginia",
    "washington",
    "west virginia",
    "wisconsin",
    "wyoming",
];

/// Validates user input as a state name, case-insensitively
///
/// Returns the canonical lowercase name, or `None` if the input is not a
/// known state or territory.
pub fn normalize_state(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase();
    STATES.iter().copied().find(|state| *state == lower)
}
