//! Feature extraction for event matching.
//!
//! Provides pure functions used by the scorer:
//! - Text normalization for case-insensitive comparison
//! - Interest matching against an event's title and description
//! - Common interests between two profiles

use eventmatch_model::Event;

/// Maximum number of interests reported per profile and event.
pub const MAX_INTEREST_MATCHES: usize = 3;

/// Interest keyword that widens to a set of title keywords.
struct Synonym {
    interest: &'static str,
    title_terms: &'static [&'static str],
}

const SYNONYMS: &[Synonym] = &[
    Synonym {
        interest: "tech",
        title_terms: &["tech", "ai"],
    },
    Synonym {
        interest: "startup",
        title_terms: &["founder"],
    },
    Synonym {
        interest: "coffee",
        title_terms: &["coffee"],
    },
];

/// Normalize text for comparison.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

/// Check whether any of `terms` occurs in the already-normalized `haystack`.
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| haystack.contains(t))
}

/// Interests from `interests` that match `event`, in profile order, at most
/// `MAX_INTEREST_MATCHES` of them.
pub fn matching_interests(interests: &[String], event: &Event) -> Vec<String> {
    matching_interests_with_limit(interests, event, MAX_INTEREST_MATCHES)
}

/// Same as `matching_interests` with an explicit limit.
pub fn matching_interests_with_limit(
    interests: &[String],
    event: &Event,
    limit: usize,
) -> Vec<String> {
    let title = normalize_text(&event.title);
    let description = normalize_text(&event.description);

    interests
        .iter()
        .filter(|interest| interest_matches(&normalize_text(interest), &title, &description))
        .take(limit)
        .cloned()
        .collect()
}

fn interest_matches(interest: &str, title: &str, description: &str) -> bool {
    // Empty interests would match every event as a substring
    if interest.is_empty() {
        return false;
    }

    if title.contains(interest) || description.contains(interest) {
        return true;
    }

    SYNONYMS
        .iter()
        .any(|s| interest.contains(s.interest) && contains_any(title, s.title_terms))
}

/// Interests both profiles share, compared case-insensitively.
///
/// Returned lowercased, de-duplicated, in the order of `first`.
pub fn common_interests(first: &[String], second: &[String]) -> Vec<String> {
    let second: Vec<String> = second.iter().map(|i| normalize_text(i.trim())).collect();

    let mut common: Vec<String> = Vec::new();
    for interest in first {
        let interest = normalize_text(interest.trim());
        if !interest.is_empty() && second.contains(&interest) && !common.contains(&interest) {
            common.push(interest);
        }
    }
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn interests(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_synonym_tech_matches_ai_title() {
        let event = Event::new("AI & Machine Learning Summit", "l");
        assert_eq!(matching_interests(&interests(&["tech", "yoga"]), &event), vec!["tech"]);
    }

    #[test]
    fn test_title_substring_wins_over_description() {
        let event = Event::new("Coffee & Running Club", "l")
            .with_description("morning jog then espresso");
        let matched = matching_interests(&interests(&["coffee", "hiking"]), &event);
        assert_eq!(matched, vec!["coffee"]);
    }

    #[test]
    fn test_case_insensitive_description_match() {
        let event = Event::new("Weekend Meetup", "l").with_description("Guided HIKING tour");
        assert_eq!(matching_interests(&interests(&["Hiking"]), &event), vec!["Hiking"]);
    }

    #[test]
    fn test_startup_synonym() {
        let event = Event::new("Founder Friday", "l");
        let matched = matching_interests(&interests(&["Startups", "art"]), &event);
        assert_eq!(matched, vec!["Startups"]);
    }

    #[test]
    fn test_order_and_limit() {
        let event = Event::new("tech art coffee yoga music", "l");
        let matched = matching_interests(
            &interests(&["music", "yoga", "cooking", "art", "coffee"]),
            &event,
        );
        assert_eq!(matched, vec!["music", "yoga", "art"]);
    }

    #[test]
    fn test_empty_event_matches_nothing() {
        let event = Event::default();
        assert!(matching_interests(&interests(&["tech", "coffee"]), &event).is_empty());
        assert!(matching_interests(&interests(&[""]), &Event::new("x", "l")).is_empty());
    }

    #[test]
    fn test_common_interests() {
        let a = interests(&["Tech", "yoga", "coffee", "tech"]);
        let b = interests(&["COFFEE", "hiking", "tech"]);
        assert_eq!(common_interests(&a, &b), vec!["tech", "coffee"]);
        assert!(common_interests(&a, &[]).is_empty());
    }
}
