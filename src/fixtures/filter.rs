//! Selects the subset of a player's match log relevant to a comparison.

use std::collections::HashSet;

use crate::config::OPPONENT_SPELL_LIMIT;
use crate::teams;
use crate::types::MatchRecord;

pub struct FixtureFilter<'a> {
    /// Club the player currently plays for.
    current_team: &'a str,
    /// Fixture ids with a persisted result this season.
    season_fixtures: &'a HashSet<u32>,
}

impl<'a> FixtureFilter<'a> {
    pub fn new(current_team: &'a str, season_fixtures: &'a HashSet<u32>) -> Self {
        Self { current_team, season_fixtures }
    }

    /// The ordered, deduplicated subsequence of `history` that enters a
    /// comparison table:
    ///
    /// - at least one side must be a recognized top-flight club;
    /// - appearances with no minutes are dropped;
    /// - with an opponent given, the opponent must appear on either side;
    /// - without one (player-vs-player), only fixtures from the current
    ///   season's known results survive, excluding cross-season noise.
    ///
    /// A long opponent-filtered log means the player has faced that club
    /// across spells with different teams; the result is then narrowed to
    /// fixtures the current club took part in, so a former club's matches
    /// are not attributed to the present one.
    pub fn relevant(&self, history: &[MatchRecord], opponent: Option<&str>) -> Vec<MatchRecord> {
        let mut seen = HashSet::new();
        let mut selected: Vec<MatchRecord> = history
            .iter()
            .filter(|m| teams::is_top_flight(&m.home_team) || teams::is_top_flight(&m.away_team))
            .filter(|m| m.minutes_played > 0)
            .filter(|m| match opponent {
                Some(opp) => {
                    teams::same_team(&m.home_team, opp) || teams::same_team(&m.away_team, opp)
                }
                None => self.season_fixtures.contains(&m.fixture_id),
            })
            .filter(|m| seen.insert(m.fixture_id))
            .cloned()
            .collect();

        if opponent.is_some() && selected.len() > OPPONENT_SPELL_LIMIT {
            selected.retain(|m| {
                teams::same_team(&m.home_team, self.current_team)
                    || teams::same_team(&m.away_team, self.current_team)
            });
        }

        selected
    }
}
