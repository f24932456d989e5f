//! Explanation generation for matched events.
//!
//! Converts event titles into the human-readable rationale shown next to
//! each match, and condenses a whole run into a short summary.

use eventmatch_features::{common_interests, contains_any, normalize_text};
use eventmatch_model::{Event, MatchedEvent, Profile};
use serde::{Deserialize, Serialize};

/// Keyword category an event title falls into.
///
/// Variants are listed in lookup order; the first one whose keywords occur
/// in the title wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Technology,
    Entrepreneurial,
    FitnessCoffee,
    Creative,
    General,
}

impl MatchCategory {
    const LOOKUP: [(MatchCategory, &'static [&'static str]); 4] = [
        (Self::Technology, &["tech", "ai"]),
        (Self::Entrepreneurial, &["founder", "startup"]),
        (Self::FitnessCoffee, &["coffee", "run"]),
        (Self::Creative, &["art", "creative"]),
    ];

    /// Classify a title by case-insensitive substring lookup.
    pub fn classify(title: &str) -> Self {
        let title = normalize_text(title);
        Self::LOOKUP
            .iter()
            .find(|(_, keywords)| contains_any(&title, keywords))
            .map(|(category, _)| *category)
            .unwrap_or(Self::General)
    }

    /// Rationale text for this category.
    pub fn rationale(&self) -> &'static str {
        match self {
            Self::Technology => {
                "Perfect blend of technology and networking opportunities for both profiles"
            }
            Self::Entrepreneurial => {
                "Great for entrepreneurial networking and startup community building"
            }
            Self::FitnessCoffee => {
                "Combines fitness and coffee culture - ideal for active professionals"
            }
            Self::Creative => "Creative expression meets professional networking",
            Self::General => "Excellent match based on shared interests and location preferences",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Entrepreneurial => "Entrepreneurial",
            Self::FitnessCoffee => "Fitness & Coffee",
            Self::Creative => "Creative",
            Self::General => "General",
        }
    }
}

/// Generate the rationale for a single event.
pub fn explain_event(event: &Event) -> String {
    MatchCategory::classify(&event.title).rationale().to_string()
}

/// Aggregate view of one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub person1: String,
    pub person2: String,
    pub matched_events: usize,
    /// Distinct cities, first-seen order
    pub cities: Vec<String>,
    pub average_score: f32,
    pub top_category: Option<MatchCategory>,
    pub common_interests: Vec<String>,
}

impl MatchSummary {
    pub fn headline(&self) -> String {
        if self.matched_events == 0 {
            return format!(
                "No events found for {} and {} - try adjusting locations or interests.",
                self.person1, self.person2
            );
        }

        let mut line = format!(
            "{} events for {} and {} across {} cities (avg score {:.1})",
            self.matched_events,
            self.person1,
            self.person2,
            self.cities.len(),
            self.average_score
        );
        if let Some(category) = self.top_category {
            line.push_str(&format!(", mostly {}", category.label()));
        }
        if !self.common_interests.is_empty() {
            line.push_str(&format!(". Shared interests: {}", self.common_interests.join(", ")));
        }
        line
    }
}

/// Generate a summary for a set of matched events.
pub fn summarize_matches(
    events: &[MatchedEvent],
    profile1: &Profile,
    profile2: &Profile,
) -> MatchSummary {
    let mut cities: Vec<String> = Vec::new();
    for city in events.iter().filter_map(|e| e.event.city.as_deref()) {
        if !city.is_empty() && !cities.iter().any(|c| c == city) {
            cities.push(city.to_string());
        }
    }

    let average_score = if events.is_empty() {
        0.0
    } else {
        events.iter().map(|e| e.score as f32).sum::<f32>() / events.len() as f32
    };

    MatchSummary {
        person1: profile1.name.clone(),
        person2: profile2.name.clone(),
        matched_events: events.len(),
        cities,
        average_score,
        top_category: top_category(events),
        common_interests: common_interests(&profile1.interests, &profile2.interests),
    }
}

/// Most frequent category; ties go to the category seen first.
fn top_category(events: &[MatchedEvent]) -> Option<MatchCategory> {
    let mut counts: Vec<(MatchCategory, usize)> = Vec::new();
    for event in events {
        let category = MatchCategory::classify(&event.event.title);
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let best = counts.iter().map(|(_, n)| *n).max()?;
    counts.into_iter().find(|(_, n)| *n == best).map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matched(title: &str, city: Option<&str>, score: u8) -> MatchedEvent {
        let mut event = Event::new(title, "l");
        event.city = city.map(str::to_string);
        MatchedEvent {
            rationale: explain_event(&event),
            event,
            index: 0,
            score,
            profile1_matches: vec![],
            profile2_matches: vec![],
            rank: None,
        }
    }

    #[test]
    fn test_ai_summit_is_technology() {
        let event = Event::new("AI & Machine Learning Summit", "l");
        assert_eq!(MatchCategory::classify(&event.title), MatchCategory::Technology);
        assert_eq!(explain_event(&event), MatchCategory::Technology.rationale());
    }

    #[test]
    fn test_category_order_breaks_ties() {
        assert_eq!(MatchCategory::classify("Startup Tech Mixer"), MatchCategory::Technology);
        assert_eq!(MatchCategory::classify("FOUNDER coffee run"), MatchCategory::Entrepreneurial);
        assert_eq!(MatchCategory::classify("Morning Run & Art"), MatchCategory::FitnessCoffee);
        assert_eq!(MatchCategory::classify("Creative Writing"), MatchCategory::Creative);
    }

    #[test]
    fn test_default_rationale_for_empty_title() {
        let rationale = explain_event(&Event::default());
        assert!(!rationale.is_empty());
        assert_eq!(rationale, MatchCategory::General.rationale());
    }

    #[test]
    fn test_summarize_matches() {
        let p1 = Profile::new("Anna", "SF", "Acme").with_interests(["tech", "Coffee"]);
        let p2 = Profile::new("Jordan", "NYC", "Initech").with_interests(["coffee"]);
        let events = vec![
            matched("Tech Talks", Some("San Francisco"), 10),
            matched("Deep Tech Night", Some("San Francisco"), 8),
            matched("Gallery Walk", Some("Toronto"), 9),
            matched("Dinner", None, 9),
        ];

        let summary = summarize_matches(&events, &p1, &p2);
        assert_eq!(summary.matched_events, 4);
        assert_eq!(summary.cities, vec!["San Francisco", "Toronto"]);
        assert_eq!(summary.average_score, 9.0);
        assert_eq!(summary.top_category, Some(MatchCategory::Technology));
        assert_eq!(summary.common_interests, vec!["coffee"]);
        assert!(summary.headline().contains("mostly Technology"));
    }

    #[test]
    fn test_summarize_empty() {
        let p = Profile::new("A", "B", "C");
        let summary = summarize_matches(&[], &p, &p);
        assert_eq!(summary.top_category, None);
        assert!(summary.headline().starts_with("No events found"));
    }
}
