//! Ranked free-text search over player name fields. The ranking algorithm
//! is the store's concern; callers only see the ordered hit list.

use strsim::jaro_winkler;

use crate::types::{PlayerRecord, SecondaryPlayerRecord};

/// A corpus entry the search can score and the resolver can hint by team.
pub trait Searchable {
    fn name(&self) -> &str;
    fn team(&self) -> &str;
}

impl Searchable for PlayerRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn team(&self) -> &str {
        &self.team
    }
}

impl Searchable for SecondaryPlayerRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn team(&self) -> &str {
        &self.team
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokenize(s: &str) -> Vec<String> {
    normalize(s).split(' ').map(str::to_string).collect()
}

/// Relevance of `candidate` for `query` in 0.0–1.0. Each query token is
/// scored against its closest candidate token; a full-string comparison
/// acts as the floor so reordered names still rank.
pub fn score(query: &str, candidate: &str) -> f64 {
    let q_norm = normalize(query);
    let c_norm = normalize(candidate);
    if q_norm.is_empty() || c_norm.is_empty() {
        return 0.0;
    }
    if q_norm == c_norm {
        return 1.0;
    }

    let c_tokens = tokenize(candidate);
    let q_tokens = tokenize(query);
    let mut total = 0.0;
    for qt in &q_tokens {
        let best = c_tokens
            .iter()
            .map(|ct| jaro_winkler(qt, ct))
            .fold(0.0f64, f64::max);
        total += best;
    }
    let token_score = total / q_tokens.len() as f64;

    token_score.max(jaro_winkler(&q_norm, &c_norm))
}

/// Rank `corpus` by relevance to `query`, best first. Zero-relevance
/// entries are dropped; ties keep corpus order (the sort is stable), so
/// the first hit at the top score wins.
pub fn text_search<'a, T: Searchable>(query: &str, corpus: &'a [T]) -> Vec<(&'a T, f64)> {
    let mut ranked: Vec<(&T, f64)> = corpus
        .iter()
        .map(|c| (c, score(query, c.name())))
        .filter(|(_, s)| *s > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
