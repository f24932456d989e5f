//! Scoring and ranking of catalog events for two profiles.
//!
//! Takes a raw catalog and produces matched events with a score, a rationale
//! and each profile's matching interests, then orders them by score.

use eventmatch_explain::explain_event;
use eventmatch_features::matching_interests;
use eventmatch_model::{Event, MatchedEvent, Profile, ScoreRange};
use rand::Rng;

/// Strategy producing the score for one event.
///
/// Implementations should return a value inside `range`; the scorer clamps
/// anything outside it.
pub trait ScoreStrategy {
    fn score(&self, event: &Event, profile1: &Profile, profile2: &Profile, range: ScoreRange) -> u8;
}

/// Uniform random draw over the range.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomScore;

impl ScoreStrategy for RandomScore {
    fn score(&self, _: &Event, _: &Profile, _: &Profile, range: ScoreRange) -> u8 {
        rand::thread_rng().gen_range(range.min()..=range.max())
    }
}

/// Same score for every event.
#[derive(Debug, Clone, Copy)]
pub struct FixedScore(pub u8);

impl ScoreStrategy for FixedScore {
    fn score(&self, _: &Event, _: &Profile, _: &Profile, _: ScoreRange) -> u8 {
        self.0
    }
}

impl<F> ScoreStrategy for F
where
    F: Fn(&Event, &Profile, &Profile) -> u8,
{
    fn score(&self, event: &Event, profile1: &Profile, profile2: &Profile, _: ScoreRange) -> u8 {
        self(event, profile1, profile2)
    }
}

/// Which part of the catalog gets scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPolicy {
    /// Every event, in catalog order
    All,
    /// The first `n` events of the catalog
    FirstN(usize),
}

impl Default for CatalogPolicy {
    fn default() -> Self {
        Self::FirstN(6)
    }
}

impl CatalogPolicy {
    fn limit(&self, len: usize) -> usize {
        match self {
            Self::All => len,
            Self::FirstN(n) => len.min(*n),
        }
    }
}

/// Configuration for the scorer.
#[derive(Debug, Clone, Default)]
pub struct ScorerConfig {
    /// Closed interval every score is kept in
    pub range: ScoreRange,
    pub policy: CatalogPolicy,
}

/// Scores a catalog against two profiles.
pub struct MatchScorer<S = RandomScore> {
    config: ScorerConfig,
    strategy: S,
}

impl Default for MatchScorer<RandomScore> {
    fn default() -> Self {
        Self::new(ScorerConfig::default(), RandomScore)
    }
}

impl<S: ScoreStrategy> MatchScorer<S> {
    pub fn new(config: ScorerConfig, strategy: S) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score the catalog. Both profiles must already be validated by the caller.
    pub fn score_catalog(
        &self,
        catalog: &[Event],
        profile1: &Profile,
        profile2: &Profile,
    ) -> Vec<MatchedEvent> {
        let limit = self.config.policy.limit(catalog.len());

        tracing::debug!(
            catalog = catalog.len(),
            scored = limit,
            person1 = %profile1.name,
            person2 = %profile2.name,
            "Scoring catalog"
        );

        catalog[..limit]
            .iter()
            .enumerate()
            .map(|(index, event)| self.score_event(index, event, profile1, profile2))
            .collect()
    }

    fn score_event(
        &self,
        index: usize,
        event: &Event,
        profile1: &Profile,
        profile2: &Profile,
    ) -> MatchedEvent {
        let range = self.config.range;
        let raw = self.strategy.score(event, profile1, profile2, range);
        let score = range.clamp(raw);
        if score != raw {
            tracing::warn!(raw, score, index, "Score outside range, clamped");
        }

        MatchedEvent {
            event: event.clone(),
            index,
            score,
            rationale: explain_event(event),
            profile1_matches: matching_interests(&profile1.interests, event),
            profile2_matches: matching_interests(&profile2.interests, event),
            rank: None,
        }
    }
}

/// Order by score descending. Equal scores keep their input order.
///
/// `rank` is set to the 1-based position in the result.
pub fn rank(mut events: Vec<MatchedEvent>) -> Vec<MatchedEvent> {
    // sort_by is stable
    events.sort_by(|a, b| b.score.cmp(&a.score));
    for (position, event) in events.iter_mut().enumerate() {
        event.rank = Some(position + 1);
    }
    events
}

/// Score then rank in one pass.
pub fn match_and_rank<S: ScoreStrategy>(
    scorer: &MatchScorer<S>,
    catalog: &[Event],
    profile1: &Profile,
    profile2: &Profile,
) -> Vec<MatchedEvent> {
    rank(scorer.score_catalog(catalog, profile1, profile2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventmatch_explain::MatchCategory;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Replays a fixed sequence of scores, one per call, cycling when exhausted.
    #[derive(Debug, Clone)]
    struct SequenceScore {
        scores: Vec<u8>,
        next: Cell<usize>,
    }

    impl SequenceScore {
        fn new(scores: Vec<u8>) -> Self {
            Self {
                scores,
                next: Cell::new(0),
            }
        }
    }

    impl ScoreStrategy for SequenceScore {
        fn score(&self, _: &Event, _: &Profile, _: &Profile, range: ScoreRange) -> u8 {
            if self.scores.is_empty() {
                return range.min();
            }
            let i = self.next.get();
            self.next.set(i + 1);
            self.scores[i % self.scores.len()]
        }
    }

    fn profiles() -> (Profile, Profile) {
        (
            Profile::new("Anna", "San Francisco", "Acme").with_interests(["tech", "yoga"]),
            Profile::new("Jordan", "San Francisco", "Initech").with_interests(["coffee", "hiking"]),
        )
    }

    fn catalog(n: usize) -> Vec<Event> {
        (0..n)
            .map(|i| Event::new(format!("Event {}", i), format!("https://lu.ma/{}", i)))
            .collect()
    }

    fn all<S: ScoreStrategy>(strategy: S) -> MatchScorer<S> {
        let config = ScorerConfig {
            policy: CatalogPolicy::All,
            ..Default::default()
        };
        MatchScorer::new(config, strategy)
    }

    #[test]
    fn test_random_scores_stay_in_range() {
        let (p1, p2) = profiles();
        let scorer = all(RandomScore);
        let range = scorer.config().range;

        for event in scorer.score_catalog(&catalog(200), &p1, &p2) {
            assert!(range.contains(event.score), "score {} out of range", event.score);
        }
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let (p1, p2) = profiles();
        let events = all(SequenceScore::new(vec![0, 42, 8])).score_catalog(&catalog(3), &p1, &p2);
        assert_eq!(events.iter().map(|e| e.score).collect::<Vec<_>>(), vec![7, 10, 8]);
    }

    #[test]
    fn test_annotates_rationale_and_interests() {
        let (p1, p2) = profiles();
        let catalog = vec![
            Event::new("AI & Machine Learning Summit", "a"),
            Event::new("Coffee & Running Club", "b").with_description("morning jog then espresso"),
            Event::default(),
        ];

        let events = all(FixedScore(9)).score_catalog(&catalog, &p1, &p2);

        assert_eq!(events[0].rationale, MatchCategory::Technology.rationale());
        assert_eq!(events[0].profile1_matches, vec!["tech"]);
        assert!(events[0].profile2_matches.is_empty());

        assert_eq!(events[1].rationale, MatchCategory::FitnessCoffee.rationale());
        assert_eq!(events[1].profile2_matches, vec!["coffee"]);

        assert_eq!(events[2].rationale, MatchCategory::General.rationale());
        assert!(events[2].profile1_matches.is_empty());
        assert_eq!(events.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_closure_strategy() {
        let (p1, p2) = profiles();
        let by_title = |event: &Event, _: &Profile, _: &Profile| -> u8 {
            if event.title.contains('1') {
                10
            } else {
                8
            }
        };
        let events = all(by_title).score_catalog(&catalog(3), &p1, &p2);
        assert_eq!(events.iter().map(|e| e.score).collect::<Vec<_>>(), vec![8, 10, 8]);
    }

    #[test]
    fn test_default_policy_takes_first_six() {
        let (p1, p2) = profiles();
        let scorer = MatchScorer::new(ScorerConfig::default(), FixedScore(8));

        let events = scorer.score_catalog(&catalog(10), &p1, &p2);
        assert_eq!(events.len(), 6);
        assert_eq!(events.last().map(|e| e.index), Some(5));

        assert_eq!(scorer.score_catalog(&catalog(2), &p1, &p2).len(), 2);
    }

    #[test]
    fn test_rank_is_stable_and_numbered() {
        let (p1, p2) = profiles();
        let scorer = all(SequenceScore::new(vec![8, 10, 8, 9, 10]));
        let scored = scorer.score_catalog(&catalog(5), &p1, &p2);

        let ranked = rank(scored);
        assert_eq!(ranked.iter().map(|e| e.index).collect::<Vec<_>>(), vec![1, 4, 3, 0, 2]);
        assert_eq!(
            ranked.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn test_rank_is_idempotent() {
        let (p1, p2) = profiles();
        let scorer = all(SequenceScore::new(vec![7, 9, 9, 10, 7, 8]));

        let once = match_and_rank(&scorer, &catalog(6), &p1, &p2);
        let twice = rank(once.clone());
        assert_eq!(once, twice);
    }
}
