//! SQLite-backed key-value store for player snapshots and league results.
//!
//! Upserts are keyed, row-at-a-time and deliberately not transactional: a
//! failure partway through leaves a mixed old/new snapshot, which the
//! differ tolerates because it only ever compares records by id.

use std::collections::HashSet;

use sqlx::Row;
use tracing::info;

use crate::error::Result;
use crate::types::{LeagueResult, PlayerRecord, Position};

#[derive(Clone)]
pub struct PlayerStore {
    pool: sqlx::SqlitePool,
}

impl PlayerStore {
    /// Connect and run pending migrations. `database_url` is a full sqlx
    /// URL, e.g. `sqlite:scout.db?mode=rwc`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::SqlitePool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Bulk keyed upsert of a snapshot.
    pub async fn upsert_players(&self, players: &[PlayerRecord]) -> Result<()> {
        for p in players {
            let recent_points = serde_json::to_string(&p.recent_points)?;
            let match_history = serde_json::to_string(&p.match_history)?;
            sqlx::query(
                r#"
                INSERT INTO players (
                    id, name, team, position, cost, cost_change_event,
                    ownership_percent, recent_points, match_history
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    team = excluded.team,
                    position = excluded.position,
                    cost = excluded.cost,
                    cost_change_event = excluded.cost_change_event,
                    ownership_percent = excluded.ownership_percent,
                    recent_points = excluded.recent_points,
                    match_history = excluded.match_history
                "#,
            )
            .bind(p.id)
            .bind(&p.name)
            .bind(&p.team)
            .bind(p.position.code())
            .bind(p.cost)
            .bind(p.cost_change_event)
            .bind(p.ownership_percent)
            .bind(recent_points)
            .bind(match_history)
            .execute(&self.pool)
            .await?;
        }
        info!("Persisted {} players", players.len());
        Ok(())
    }

    pub async fn find_by_id(&self, id: u32) -> Result<Option<PlayerRecord>> {
        let row = sqlx::query("SELECT * FROM players WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(player_from_row).transpose()
    }

    /// The previously persisted snapshot, id-ordered.
    pub async fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        let rows = sqlx::query("SELECT * FROM players ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(player_from_row).collect()
    }

    pub async fn upsert_results(&self, results: &[LeagueResult]) -> Result<()> {
        for r in results {
            sqlx::query(
                r#"
                INSERT INTO results (
                    fixture_id, home_team, away_team, home_goals, away_goals,
                    home_xg, away_xg, date, season
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(fixture_id) DO UPDATE SET
                    home_goals = excluded.home_goals,
                    away_goals = excluded.away_goals,
                    home_xg = excluded.home_xg,
                    away_xg = excluded.away_xg,
                    date = excluded.date,
                    season = excluded.season
                "#,
            )
            .bind(r.fixture_id)
            .bind(&r.home_team)
            .bind(&r.away_team)
            .bind(r.home_goals)
            .bind(r.away_goals)
            .bind(r.home_xg)
            .bind(r.away_xg)
            .bind(&r.date)
            .bind(&r.season)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    pub async fn find_result(&self, fixture_id: u32) -> Result<Option<LeagueResult>> {
        let row = sqlx::query("SELECT * FROM results WHERE fixture_id = ?")
            .bind(fixture_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(result_from_row).transpose()
    }

    /// Fixture ids with a persisted result for `season`. Player-vs-player
    /// filtering uses this set to exclude cross-season noise.
    pub async fn season_fixture_ids(&self, season: &str) -> Result<HashSet<u32>> {
        let rows = sqlx::query("SELECT fixture_id FROM results WHERE season = ?")
            .bind(season)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| Ok(row.try_get::<u32, _>("fixture_id")?))
            .collect()
    }
}

fn player_from_row(row: sqlx::sqlite::SqliteRow) -> Result<PlayerRecord> {
    let position: String = row.try_get("position")?;
    let recent_points: String = row.try_get("recent_points")?;
    let match_history: String = row.try_get("match_history")?;
    Ok(PlayerRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        team: row.try_get("team")?,
        position: Position::from_code(&position),
        cost: row.try_get("cost")?,
        cost_change_event: row.try_get("cost_change_event")?,
        ownership_percent: row.try_get("ownership_percent")?,
        recent_points: serde_json::from_str(&recent_points)?,
        match_history: serde_json::from_str(&match_history)?,
    })
}

fn result_from_row(row: sqlx::sqlite::SqliteRow) -> Result<LeagueResult> {
    Ok(LeagueResult {
        fixture_id: row.try_get("fixture_id")?,
        home_team: row.try_get("home_team")?,
        away_team: row.try_get("away_team")?,
        home_goals: row.try_get("home_goals")?,
        away_goals: row.try_get("away_goals")?,
        home_xg: row.try_get("home_xg")?,
        away_xg: row.try_get("away_xg")?,
        date: row.try_get("date")?,
        season: row.try_get("season")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchRecord;

    /// Pooled `sqlite::memory:` connections each see their own database,
    /// so tests run against a throwaway file instead.
    async fn temp_store(tag: &str) -> PlayerStore {
        let path = std::env::temp_dir().join(format!("fplscout-test-{tag}.db"));
        let _ = std::fs::remove_file(&path);
        PlayerStore::connect(&format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .expect("temp store should open")
    }

    fn player(id: u32, cost: u32) -> PlayerRecord {
        PlayerRecord {
            id,
            name: format!("Player {id}"),
            team: "Liverpool".to_string(),
            position: Position::Forward,
            cost,
            cost_change_event: 1,
            ownership_percent: 23.4,
            recent_points: vec![2, 8],
            match_history: vec![MatchRecord {
                fixture_id: 500 + id,
                home_team: "Liverpool".to_string(),
                away_team: "Chelsea".to_string(),
                home_goals: 2,
                away_goals: 1,
                date: "2020-09-20".to_string(),
                minutes_played: 90,
                goals: 1,
                assists: 0,
                expected_goals: 0.82,
                expected_assists: 0.05,
                non_penalty_goals: 0,
                non_penalty_expected_goals: 0.06,
                key_passes: 1,
                starter: true,
                saves: None,
            }],
        }
    }

    #[tokio::test]
    async fn upsert_then_find_round_trips_nested_fields() {
        let store = temp_store("round-trip").await;
        store.upsert_players(&[player(1, 100)]).await.unwrap();

        let found = store.find_by_id(1).await.unwrap().expect("player 1");
        assert_eq!(found.position, Position::Forward);
        assert_eq!(found.recent_points, vec![2, 8]);
        assert_eq!(found.match_history[0].fixture_id, 501);
        assert!(store.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = temp_store("replace").await;
        store.upsert_players(&[player(1, 100)]).await.unwrap();
        store.upsert_players(&[player(1, 95)]).await.unwrap();

        let all = store.all_players().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].cost, 95);
    }

    #[tokio::test]
    async fn season_fixture_ids_filters_by_season() {
        let store = temp_store("season-ids").await;
        store
            .upsert_results(&[result(11, "2020"), result(12, "2020"), result(10, "2019")])
            .await
            .unwrap();

        let ids = store.season_fixture_ids("2020").await.unwrap();
        assert_eq!(ids, HashSet::from([11, 12]));
    }

    fn result(fixture_id: u32, season: &str) -> LeagueResult {
        LeagueResult {
            fixture_id,
            home_team: "Leeds".to_string(),
            away_team: "Fulham".to_string(),
            home_goals: 4,
            away_goals: 3,
            home_xg: 2.1,
            away_xg: 1.4,
            date: "2020-09-19".to_string(),
            season: season.to_string(),
        }
    }
}
