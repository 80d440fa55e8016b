use serde::{Deserialize, Serialize};

use crate::teams;

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// The primary feed encodes positions as element types 1-4.
    pub fn from_element_type(element_type: u64) -> Self {
        match element_type {
            1 => Position::Goalkeeper,
            2 => Position::Defender,
            3 => Position::Midfielder,
            _ => Position::Forward,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "GK" => Position::Goalkeeper,
            "DEF" => Position::Defender,
            "MID" => Position::Midfielder,
            _ => Position::Forward,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        };
        write!(f, "{s}")
    }
}

/// One player as served by the primary feed, with the secondary-source
/// match log folded in by the merge pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Stable element id from the primary feed; unique per snapshot.
    pub id: u32,
    pub name: String,
    pub team: String,
    pub position: Position,
    /// Tenths of £m, as served (55 = £5.5m).
    pub cost: u32,
    /// Signed since-last-event price delta, tenths.
    pub cost_change_event: i32,
    pub ownership_percent: f64,
    /// Per-gameweek point totals, oldest first.
    pub recent_points: Vec<i32>,
    /// Secondary-source match log; empty until the player has been linked.
    #[serde(default)]
    pub match_history: Vec<MatchRecord>,
}

impl PlayerRecord {
    /// Points over the last `window` gameweeks.
    pub fn form(&self, window: usize) -> i32 {
        let start = self.recent_points.len().saturating_sub(window);
        self.recent_points[start..].iter().sum()
    }
}

/// A player row from the secondary analytics source. Carries no key shared
/// with the primary feed — linkage goes through the identity resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryPlayerRecord {
    /// Opaque site-local reference used to fetch the match log.
    pub player_ref: String,
    pub name: String,
    pub team: String,
}

// ---------------------------------------------------------------------------
// Match log
// ---------------------------------------------------------------------------

/// One appearance in a past fixture. Immutable once the fixture is played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub fixture_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    /// ISO date string; lexicographic order is chronological order.
    pub date: String,
    pub minutes_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub expected_goals: f64,
    pub expected_assists: f64,
    pub non_penalty_goals: u32,
    pub non_penalty_expected_goals: f64,
    pub key_passes: u32,
    pub starter: bool,
    /// Not carried by every secondary payload; rendered as a placeholder
    /// when absent.
    #[serde(default)]
    pub saves: Option<u32>,
}

// ---------------------------------------------------------------------------
// Price movements
// ---------------------------------------------------------------------------

/// Classification of a fresh snapshot against the previously persisted one.
/// Computed, never persisted; players whose price is unchanged appear in
/// none of the lists.
#[derive(Debug, Default)]
pub struct PriceMovements {
    pub risers: Vec<PlayerRecord>,
    pub fallers: Vec<PlayerRecord>,
    pub new_players: Vec<PlayerRecord>,
}

// ---------------------------------------------------------------------------
// League results
// ---------------------------------------------------------------------------

/// A finished league fixture with both sides' expected goals, persisted so
/// aggregation can derive defensive columns for any participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueResult {
    pub fixture_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_xg: f64,
    pub away_xg: f64,
    pub date: String,
    pub season: String,
}

impl LeagueResult {
    /// Expected goals of the side opposing `team`, or None when the team
    /// took no part in the fixture.
    pub fn expected_goals_against(&self, team: &str) -> Option<f64> {
        if teams::same_team(&self.home_team, team) {
            Some(self.away_xg)
        } else if teams::same_team(&self.away_team, team) {
            Some(self.home_xg)
        } else {
            None
        }
    }

    /// Goals scored by the side opposing `team`.
    pub fn goals_against(&self, team: &str) -> Option<u32> {
        if teams::same_team(&self.home_team, team) {
            Some(self.away_goals)
        } else if teams::same_team(&self.away_team, team) {
            Some(self.home_goals)
        } else {
            None
        }
    }
}
