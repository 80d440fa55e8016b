//! Primary feed adapter: the fantasy-league REST API.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::try_join_all;
use tracing::{info, warn};

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::types::{PlayerRecord, Position};

pub struct FplApi {
    client: reqwest::Client,
    base_url: String,
}

impl FplApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The full roster, each record carrying its per-gameweek point
    /// history. History comes from one summary request per player, fanned
    /// out and awaited jointly.
    pub async fn fetch_all_players(&self) -> Result<Vec<PlayerRecord>> {
        let url = format!("{}/bootstrap-static/", self.base_url);
        let resp: serde_json::Value = self.client.get(&url).send().await?.json().await?;

        let team_names = parse_team_names(&resp);
        let elements = resp
            .get("elements")
            .and_then(|e| e.as_array())
            .ok_or_else(|| {
                AppError::Parse("bootstrap payload has no elements array".to_string())
            })?;

        let mut players = Vec::with_capacity(elements.len());
        let mut skipped = 0usize;
        for item in elements {
            match parse_element(item, &team_names) {
                Some(player) => players.push(player),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "elements missing required fields were dropped");
        }

        let histories =
            try_join_all(players.iter().map(|p| self.fetch_recent_points(p.id))).await?;
        for (player, points) in players.iter_mut().zip(histories) {
            player.recent_points = points;
        }

        info!("Fetched {} players from the primary feed", players.len());
        Ok(players)
    }

    async fn fetch_recent_points(&self, id: u32) -> Result<Vec<i32>> {
        let url = format!("{}/element-summary/{}/", self.base_url, id);
        let resp: serde_json::Value = self.client.get(&url).send().await?.json().await?;
        Ok(resp
            .get("history")
            .and_then(|h| h.as_array())
            .map(|rounds| {
                rounds
                    .iter()
                    .filter_map(|r| r.get("total_points").and_then(|v| v.as_i64()))
                    .map(|v| v as i32)
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn parse_team_names(v: &serde_json::Value) -> HashMap<u64, String> {
    v.get("teams")
        .and_then(|t| t.as_array())
        .map(|teams| {
            teams
                .iter()
                .filter_map(|t| {
                    let id = t.get("id")?.as_u64()?;
                    let name = t.get("name")?.as_str()?;
                    Some((id, name.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_element(v: &serde_json::Value, team_names: &HashMap<u64, String>) -> Option<PlayerRecord> {
    let id = v.get("id")?.as_u64()? as u32;
    let name = v.get("web_name")?.as_str()?.to_string();
    let team_id = v.get("team")?.as_u64()?;
    let team = team_names.get(&team_id)?.clone();
    let position = Position::from_element_type(v.get("element_type")?.as_u64()?);
    let cost = v.get("now_cost")?.as_u64()? as u32;
    let cost_change_event = v.get("cost_change_event")?.as_i64()? as i32;
    // Served as a string ("45.3"); malformed values read as unowned.
    let ownership_percent = v
        .get("selected_by_percent")
        .and_then(|s| s.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Some(PlayerRecord {
        id,
        name,
        team,
        position,
        cost,
        cost_change_event,
        ownership_percent,
        recent_points: Vec::new(),
        match_history: Vec::new(),
    })
}
