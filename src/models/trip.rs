//! Trip parameters collected by the form

use serde::{Deserialize, Deserializer, Serialize};

use super::Month;

/// Inputs driving a single itinerary generation.
///
/// `duration` keeps whatever was typed into the form. It is substituted
/// into the prompt verbatim, so it may be non-numeric or negative.
///
/// When deserialized, `destination` must be present (possibly empty) and
/// unknown keys are rejected; the other fields fall back to the form defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TripParameters {
    /// Country from the catalog or free text; may be empty
    #[serde(alias = "country")]
    pub destination: String,
    /// Trip length in days, as entered
    #[serde(
        default = "default_duration",
        deserialize_with = "deserialize_duration",
        alias = "days"
    )]
    pub duration: String,
    #[serde(default)]
    pub month: Month,
    #[serde(default = "default_true", alias = "include_hotels", alias = "hotels")]
    pub include_hotels: bool,
    #[serde(
        default = "default_true",
        alias = "include_restaurants",
        alias = "restaurants"
    )]
    pub include_restaurants: bool,
}

fn default_duration() -> String {
    "5".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TripParameters {
    fn default() -> Self {
        Self {
            destination: String::new(),
            duration: default_duration(),
            month: Month::AnyMonth,
            include_hotels: default_true(),
            include_restaurants: default_true(),
        }
    }
}

impl TripParameters {
    /// Create parameters for a destination with the form defaults
    #[must_use]
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// Duration as a day count, when the entered value is a positive integer
    #[must_use]
    pub fn duration_days(&self) -> Option<u32> {
        self.duration.trim().parse().ok().filter(|days| *days > 0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Number(serde_json::Number),
    Text(String),
}

/// Number inputs arrive either as JSON numbers or as the raw input string
fn deserialize_duration<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawDuration::deserialize(deserializer)? {
        RawDuration::Number(number) => number.to_string(),
        RawDuration::Text(text) => text,
    })
}
