//! Itinerary prompt construction

use crate::models::TripParameters;

const BASE_PROMPT: &str = "Write me an itinerary for";

const DAILY_CLAUSES: &str = "Describe the weather that month, and also 5 things to take note about this country's culture. Keep to a maximum travel area to the size of Hokkaido, if possible, to minimize traveling time between cities.\n\nFor each day, list me the following:\n- Attractions suitable for that season\n";

/// Appended when hotel recommendations are wanted
pub const HOTELS_CLAUSE: &str =
    "- Hotel (prefer not to change it unless traveling to another city)\n";

/// Appended when restaurant recommendations are wanted
pub const RESTAURANTS_CLAUSE: &str =
    "- 2 Restaurants, one for lunch and another for dinner, with shortened Google Map links\n";

const SUMMARY_CLAUSE: &str = "and give me a daily summary of the above points into a paragraph or two.\n";

const STRUCTURE_CLAUSE: &str = "Output the data in a structured format, including separate sections for each day with attractions, hotels, and restaurants listed.\n";

const FORMAT_CLAUSE: &str = "Format the output, use bulletpoints,newlines and tabs. To do so use html tags <h1>, <h2>, <h3>, <b>, <i>, <br><br>, <p>, <li>, <ul>, etc. to format and output in an orderly manner, give them good spacing, sepereating the days, places to visits, attractions, etc.\n";

/// Build the generation prompt for a trip.
///
/// Neither the destination nor the duration is validated: an empty
/// destination or a non-numeric duration is substituted as is.
#[must_use]
pub fn build_prompt(params: &TripParameters) -> String {
    let mut prompt = format!(
        "{BASE_PROMPT} {} days to {} in the coming {}. {DAILY_CLAUSES}",
        params.duration, params.destination, params.month
    );

    if params.include_hotels {
        prompt.push_str(HOTELS_CLAUSE);
    }
    if params.include_restaurants {
        prompt.push_str(RESTAURANTS_CLAUSE);
    }

    prompt.push_str(SUMMARY_CLAUSE);
    prompt.push_str(STRUCTURE_CLAUSE);
    prompt.push_str(FORMAT_CLAUSE);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use rstest::rstest;

    fn params(destination: &str, duration: &str, month: Month, hotels: bool, restaurants: bool) -> TripParameters {
        TripParameters {
            destination: destination.to_string(),
            duration: duration.to_string(),
            month,
            include_hotels: hotels,
            include_restaurants: restaurants,
        }
    }

    #[test]
    fn test_prompt_opening_sentence() {
        let prompt = build_prompt(&params("Japan", "5", Month::April, true, true));
        assert!(prompt.starts_with("Write me an itinerary for 5 days to Japan in the coming April. Describe the weather"));
        assert!(prompt.ends_with("attractions, etc.\n"));
    }

    #[rstest]
    #[case("Italy", "3", Month::AnyMonth)]
    #[case("Thailand", "14", Month::December)]
    #[case("Land of the Rising Sun", "10", Month::March)]
    fn test_prompt_contains_parameters(#[case] destination: &str, #[case] duration: &str, #[case] month: Month) {
        let prompt = build_prompt(&params(destination, duration, month, true, false));
        assert!(prompt.contains(destination));
        assert!(prompt.contains(&format!("{duration} days")));
        assert!(prompt.contains(&format!("in the coming {month}.")));
    }

    #[rstest]
    #[case(true, true)]
    #[case(true, false)]
    #[case(false, true)]
    #[case(false, false)]
    fn test_optional_clauses(#[case] hotels: bool, #[case] restaurants: bool) {
        let prompt = build_prompt(&params("France", "5", Month::May, hotels, restaurants));
        assert_eq!(prompt.contains(HOTELS_CLAUSE), hotels);
        assert_eq!(prompt.contains(RESTAURANTS_CLAUSE), restaurants);
        assert!(prompt.contains("- Attractions suitable for that season\n"));
    }

    #[test]
    fn test_clause_order() {
        let prompt = build_prompt(&params("Spain", "4", Month::June, true, true));
        let attractions = prompt.find("- Attractions").unwrap();
        let hotel = prompt.find(HOTELS_CLAUSE).unwrap();
        let restaurants = prompt.find(RESTAURANTS_CLAUSE).unwrap();
        let summary = prompt.find(SUMMARY_CLAUSE).unwrap();
        let format = prompt.find("use html tags").unwrap();
        assert!(attractions < hotel && hotel < restaurants);
        assert!(restaurants < summary && summary < format);
    }

    #[rstest]
    #[case("-2")]
    #[case("abc")]
    #[case("")]
    fn test_unvalidated_duration_is_substituted(#[case] duration: &str) {
        let prompt = build_prompt(&params("Japan", duration, Month::AnyMonth, false, false));
        assert!(prompt.starts_with(&format!("Write me an itinerary for {duration} days to Japan")));
    }

    #[test]
    fn test_empty_destination_is_accepted() {
        let prompt = build_prompt(&params("", "5", Month::AnyMonth, false, false));
        assert!(prompt.contains("5 days to  in the coming Any month."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let trip = params("Japan", "5", Month::October, true, true);
        assert_eq!(build_prompt(&trip), build_prompt(&trip.clone()));
    }
}
