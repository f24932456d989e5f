//! Filtering of matched events for display.
//!
//! Runs on every search or filter change over an already-scored list, so it
//! only borrows: no rescoring, no cloning, no reordering.

use std::collections::BTreeSet;

use eventmatch_features::normalize_text;
use eventmatch_model::{Event, MatchedEvent};
use serde::{Deserialize, Serialize};

/// Conjunctive filter criteria.
///
/// Empty sets and an empty search term mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_term: String,

    #[serde(default)]
    pub min_score: u8,

    #[serde(default)]
    pub cities: BTreeSet<String>,

    #[serde(default)]
    pub statuses: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.cities.insert(city.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.insert(status.into());
        self
    }

    /// True when no criterion can exclude anything.
    pub fn is_unrestricted(&self) -> bool {
        self.search_term.is_empty()
            && self.min_score == 0
            && self.cities.is_empty()
            && self.statuses.is_empty()
    }

    /// Per-event predicate.
    pub fn matches(&self, event: &MatchedEvent) -> bool {
        self.accepts(event, &normalize_text(&self.search_term))
    }

    /// `term` is the search term already normalized.
    fn accepts(&self, event: &MatchedEvent, term: &str) -> bool {
        matches_search(event, term)
            && event.score >= self.min_score
            && in_set(&self.cities, event.event.city.as_deref())
            && in_set(&self.statuses, event.event.status.as_deref())
    }
}

fn matches_search(event: &MatchedEvent, term: &str) -> bool {
    term.is_empty()
        || [&event.event.title, &event.event.location, &event.rationale]
            .iter()
            .any(|field| normalize_text(field).contains(term))
}

/// Absent values never satisfy a non-empty restriction.
fn in_set(allowed: &BTreeSet<String>, value: Option<&str>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.contains(v))
}

/// Select the events satisfying `criteria`, preserving input order.
pub fn filter_events<'a>(
    events: &'a [MatchedEvent],
    criteria: &FilterCriteria,
) -> Vec<&'a MatchedEvent> {
    let term = normalize_text(&criteria.search_term);

    events
        .iter()
        .filter(|event| criteria.accepts(event, &term))
        .collect()
}

/// Distinct filter options present in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFacets {
    /// First-seen order
    pub cities: Vec<String>,
    /// First-seen order
    pub statuses: Vec<String>,
}

impl FilterFacets {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut facets = Self::default();
        for event in events {
            push_distinct(&mut facets.cities, event.city.as_deref());
            push_distinct(&mut facets.statuses, event.status.as_deref());
        }
        facets
    }
}

fn push_distinct(values: &mut Vec<String>, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
}
