//! Core domain model for shared event matching.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `Profile`: One person's declared attributes and interests
//! - `Event`: A catalog entry as received from the scraper
//! - `MatchedEvent`: An event annotated with score, rationale and interests
//! - `ScoreRange`: The closed interval every match score lives in

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a profile is not ready to be matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Name is blank")]
    BlankName,
    #[error("Location is blank")]
    BlankLocation,
    #[error("Company is blank")]
    BlankCompany,
    #[error("At least one interest is required")]
    NoInterests,
    #[error("Interest at position {0} is blank")]
    BlankInterest(usize),
    #[error("Interest at position {0} has surrounding whitespace")]
    UntrimmedInterest(usize),
    #[error("Interest at position {0} is a duplicate")]
    DuplicateInterest(usize),
}

/// Invalid score interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid score range: {min} > {max}")]
pub struct RangeError {
    pub min: u8,
    pub max: u8,
}

/// One person's profile as supplied by the editing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_age")]
    pub age: u32,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub company: String,

    /// Ordered set; insertion order is significant for matching output
    #[serde(default)]
    pub interests: Vec<String>,
}

fn default_age() -> u32 {
    18
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: default_age(),
            location: String::new(),
            company: String::new(),
            interests: Vec::new(),
        }
    }
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            company: company.into(),
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for interest in interests {
            self.add_interest(interest.as_ref());
        }
        self
    }

    /// Append an interest, keeping the list an ordered set.
    ///
    /// The entry is trimmed first. Blank entries and exact duplicates are
    /// rejected and `false` is returned.
    pub fn add_interest(&mut self, interest: &str) -> bool {
        let interest = interest.trim();
        if interest.is_empty() || self.interests.iter().any(|i| i == interest) {
            return false;
        }
        self.interests.push(interest.to_string());
        true
    }

    /// Remove an interest by exact value. Returns whether anything was removed.
    pub fn remove_interest(&mut self, interest: &str) -> bool {
        let before = self.interests.len();
        self.interests.retain(|i| i != interest);
        self.interests.len() != before
    }

    /// Check the readiness rules a profile must satisfy before matching.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::BlankName);
        }
        if self.location.trim().is_empty() {
            return Err(ProfileError::BlankLocation);
        }
        if self.company.trim().is_empty() {
            return Err(ProfileError::BlankCompany);
        }
        if self.interests.is_empty() {
            return Err(ProfileError::NoInterests);
        }
        for (pos, interest) in self.interests.iter().enumerate() {
            if interest.trim().is_empty() {
                return Err(ProfileError::BlankInterest(pos));
            }
            if interest.trim() != interest {
                return Err(ProfileError::UntrimmedInterest(pos));
            }
            if self.interests[..pos].contains(interest) {
                return Err(ProfileError::DuplicateInterest(pos));
            }
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// A catalog event. Missing string fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub organizers: String,

    /// Registration status as scraped (e.g. "Going", "Waitlist")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub attendees: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Event {
    /// Create a minimal event for testing.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// An event annotated by a matching run.
///
/// Created once per run and never mutated by filtering; ranking only fills
/// in `rank` on the values it already owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEvent {
    #[serde(flatten)]
    pub event: Event,

    /// Position of the event in the catalog it was scored from
    pub index: usize,

    pub score: u8,

    pub rationale: String,

    #[serde(default)]
    pub profile1_matches: Vec<String>,

    #[serde(default)]
    pub profile2_matches: Vec<String>,

    /// 1-based position after ranking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

impl MatchedEvent {
    /// Identity for list and comparison purposes. Links repeat across catalogs.
    pub fn key(&self) -> (&str, usize) {
        (&self.event.link, self.index)
    }

    /// Matching interests of both profiles, de-duplicated, profile 1 first.
    pub fn highlights(&self, limit: usize) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for interest in self.profile1_matches.iter().chain(&self.profile2_matches) {
            if !out.contains(&interest.as_str()) {
                out.push(interest);
            }
        }
        out.truncate(limit);
        out
    }
}

/// Closed interval of allowed match scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreRange")]
pub struct ScoreRange {
    min: u8,
    max: u8,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self { min: 7, max: 10 }
    }
}

#[derive(Deserialize)]
struct RawScoreRange {
    min: u8,
    max: u8,
}

impl TryFrom<RawScoreRange> for ScoreRange {
    type Error = RangeError;

    fn try_from(raw: RawScoreRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl ScoreRange {
    pub fn new(min: u8, max: u8) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, score: u8) -> bool {
        (self.min..=self.max).contains(&score)
    }

    pub fn clamp(&self, score: u8) -> u8 {
        score.clamp(self.min, self.max)
    }
}
