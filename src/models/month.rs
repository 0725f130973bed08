//! Travel month selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WanderlustError;

/// Month the trip takes place in, as offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Month {
    #[default]
    #[serde(rename = "Any month")]
    AnyMonth,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All selectable values in form order
    pub const ALL: [Month; 13] = [
        Month::AnyMonth,
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Label shown in the form and substituted into the prompt
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Month::AnyMonth => "Any month",
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = WanderlustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("any") {
            return Ok(Month::AnyMonth);
        }

        Month::ALL
            .into_iter()
            .find(|month| {
                let label = month.label();
                label.eq_ignore_ascii_case(wanted)
                    || (wanted.len() >= 3 && label.len() >= wanted.len()
                        && label[..wanted.len()].eq_ignore_ascii_case(wanted)
                        && *month != Month::AnyMonth)
            })
            .ok_or_else(|| WanderlustError::validation(format!("Unknown month '{s}'")))
    }
}
