use clap::ArgMatches;
use std::path::PathBuf;

/// Settings shared by every command
///
/// Each one comes from a global option, then its environment variable,
/// then a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// data file, `--data` or `LIFEPLAN_DATA`
    pub data: PathBuf,
    /// shown before every amount, `--currency` or `LIFEPLAN_CURRENCY`
    pub currency: String,
    /// unlocks a protected store, `--pin` or `LIFEPLAN_PIN`
    pub pin: Option<String>,
}

pub const DEFAULT_DATA: &str = "lifeplan.json";
pub const DEFAULT_CURRENCY: &str = "PKR";

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            data: PathBuf::from(matches.value_of("data").unwrap_or(DEFAULT_DATA)),
            currency: matches
                .value_of("currency")
                .unwrap_or(DEFAULT_CURRENCY)
                .trim()
                .to_string(),
            pin: matches.value_of("pin").map(String::from),
        }
    }
}
