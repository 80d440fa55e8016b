//! Best-effort identity resolution across the two unkeyed sources.
//!
//! A query resolves to the single highest-scoring corpus entry, or to
//! nothing. Acceptance is governed by a tunable minimum score rather than
//! a hardcoded take-top-1: similar names can otherwise silently mismatch.

use tracing::debug;

use crate::store::search::{text_search, Searchable};
use crate::teams;

pub struct Resolver {
    min_score: f64,
}

impl Resolver {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }

    /// Single best hit for `query`, or None. Never an error: a miss logs a
    /// diagnostic and callers degrade (shorter table, skipped merge).
    pub fn resolve<'a, T: Searchable>(&self, query: &str, corpus: &'a [T]) -> Option<&'a T> {
        self.resolve_with_team(query, None, corpus)
    }

    /// Like [`resolve`](Self::resolve), but when a team hint is given the
    /// hit must also belong to that club. The hint tolerates either
    /// source's spelling of the club name.
    pub fn resolve_with_team<'a, T: Searchable>(
        &self,
        query: &str,
        team_hint: Option<&str>,
        corpus: &'a [T],
    ) -> Option<&'a T> {
        let ranked = text_search(query, corpus);
        let hit = match team_hint {
            Some(hint) => ranked
                .iter()
                .find(|(candidate, _)| teams::same_team(candidate.team(), hint))
                .copied(),
            None => ranked.first().copied(),
        };

        match hit {
            Some((record, score)) if score >= self.min_score => {
                debug!(score, query, "resolved to {}", record.name());
                Some(record)
            }
            Some((record, score)) => {
                debug!(
                    score,
                    min_score = self.min_score,
                    query,
                    "best hit {} below acceptance threshold",
                    record.name(),
                );
                None
            }
            None => {
                debug!(query, team_hint, "no corpus hit");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecondaryPlayerRecord;

    fn entry(name: &str, team: &str) -> SecondaryPlayerRecord {
        SecondaryPlayerRecord {
            player_ref: "0".to_string(),
            name: name.to_string(),
            team: team.to_string(),
        }
    }

    #[test]
    fn surname_query_resolves_the_only_close_match() {
        let corpus = vec![
            entry("Harry Kane", "Tottenham"),
            entry("Mohamed Salah", "Liverpool"),
        ];
        let resolver = Resolver::new(0.0);
        let hit = resolver.resolve("salah", &corpus).expect("should resolve");
        assert_eq!(hit.name, "Mohamed Salah");
    }

    #[test]
    fn team_hint_tolerates_the_other_sources_spelling() {
        // Corpus spells the club the analytics way; the hint uses the
        // primary feed's spelling.
        let corpus = vec![
            entry("Fernandinho", "Manchester City"),
            entry("Fernandes", "Manchester United"),
        ];
        let resolver = Resolver::new(0.0);
        let hit = resolver
            .resolve_with_team("fernandes", Some("Man Utd"), &corpus)
            .expect("should resolve");
        assert_eq!(hit.team, "Manchester United");
    }

    #[test]
    fn raised_threshold_rejects_weak_hits() {
        let corpus = vec![entry("Mohamed Salah", "Liverpool")];
        let strict = Resolver::new(0.95);
        assert!(strict.resolve("smith", &corpus).is_none());
        // The same query passes under the permissive default.
        assert!(Resolver::new(0.0).resolve("smith", &corpus).is_some());
    }

    #[test]
    fn empty_corpus_is_a_clean_miss() {
        let corpus: Vec<SecondaryPlayerRecord> = Vec::new();
        assert!(Resolver::new(0.0).resolve("salah", &corpus).is_none());
    }
}
