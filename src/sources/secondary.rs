//! Secondary source adapter: the analytics site is reachable only by page
//! scraping. Every page embeds its data as a hex-escaped JSON literal; the
//! helpers here are deliberately naive and tailored to that structure.

use std::time::Duration;

use tracing::info;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::types::{LeagueResult, MatchRecord, SecondaryPlayerRecord};

const LEAGUE: &str = "EPL";

pub struct AnalyticsSite {
    client: reqwest::Client,
    base_url: String,
}

impl AnalyticsSite {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_all_players(&self, season: &str) -> Result<Vec<SecondaryPlayerRecord>> {
        let url = format!("{}/league/{}/{}", self.base_url, LEAGUE, season);
        let body = self.client.get(&url).send().await?.text().await?;
        let data = extract_embedded_json(&body, "playersData")?;

        let rows = data
            .as_array()
            .ok_or_else(|| AppError::Parse("playersData is not an array".to_string()))?;
        let players: Vec<SecondaryPlayerRecord> =
            rows.iter().filter_map(parse_player_row).collect();
        info!("Fetched {} players from the analytics site", players.len());
        Ok(players)
    }

    pub async fn fetch_match_history(&self, player_ref: &str) -> Result<Vec<MatchRecord>> {
        let url = format!("{}/player/{}", self.base_url, player_ref);
        let body = self.client.get(&url).send().await?.text().await?;
        let data = extract_embedded_json(&body, "matchesData")?;

        let rows = data
            .as_array()
            .ok_or_else(|| AppError::Parse("matchesData is not an array".to_string()))?;
        Ok(rows.iter().filter_map(parse_match_row).collect())
    }

    pub async fn fetch_league_results(&self, season: &str) -> Result<Vec<LeagueResult>> {
        let url = format!("{}/league/{}/{}", self.base_url, LEAGUE, season);
        let body = self.client.get(&url).send().await?.text().await?;
        let data = extract_embedded_json(&body, "datesData")?;

        let rows = data
            .as_array()
            .ok_or_else(|| AppError::Parse("datesData is not an array".to_string()))?;
        Ok(rows
            .iter()
            .filter(|r| r.get("isResult").and_then(|v| v.as_bool()).unwrap_or(false))
            .filter_map(|r| parse_result_row(r, season))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Page parsing
// ---------------------------------------------------------------------------

/// Pull the JSON payload embedded in a page as
/// `var <name> = JSON.parse('<hex-escaped literal>')`. The variable is
/// absent when the site serves a bare shell (rate limiting) — the
/// transient case the pipeline retries with backoff.
pub fn extract_embedded_json(body: &str, var: &str) -> Result<serde_json::Value> {
    let marker = format!("var {var}");
    let at = body
        .find(&marker)
        .ok_or_else(|| AppError::Parse(format!("{var} block missing from page")))?;
    let rest = &body[at..];

    let open_pat = "JSON.parse('";
    let open = rest
        .find(open_pat)
        .ok_or_else(|| AppError::Parse(format!("{var} has no JSON.parse literal")))?
        + open_pat.len();
    let close = rest[open..]
        .find("')")
        .ok_or_else(|| AppError::Parse(format!("{var} literal is unterminated")))?;

    let decoded = decode_hex_escapes(&rest[open..open + close])?;
    Ok(serde_json::from_str(&decoded)?)
}

/// `\x22`-style byte escapes decode to raw bytes; everything else passes
/// through unchanged.
fn decode_hex_escapes(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && bytes[i + 1] == b'x' {
            if let Some(byte) = std::str::from_utf8(&bytes[i + 2..i + 4])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
            {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out)
        .map_err(|_| AppError::Parse("embedded payload is not valid UTF-8".to_string()))
}

/// The site serves every number as a string; accept either form.
fn num_f64(v: Option<&serde_json::Value>) -> Option<f64> {
    let v = v?;
    v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok()))
}

fn num_u32(v: Option<&serde_json::Value>) -> Option<u32> {
    num_f64(v).map(|n| n as u32)
}

fn parse_player_row(v: &serde_json::Value) -> Option<SecondaryPlayerRecord> {
    let player_ref = v.get("id")?.as_str()?.to_string();
    let name = v.get("player_name")?.as_str()?.to_string();
    // Players moved mid-season list every club comma-separated; the last
    // entry is the current one.
    let team = v
        .get("team_title")?
        .as_str()?
        .rsplit(',')
        .next()?
        .trim()
        .to_string();
    Some(SecondaryPlayerRecord { player_ref, name, team })
}

fn parse_match_row(v: &serde_json::Value) -> Option<MatchRecord> {
    Some(MatchRecord {
        fixture_id: num_u32(v.get("id"))?,
        home_team: v.get("h_team")?.as_str()?.to_string(),
        away_team: v.get("a_team")?.as_str()?.to_string(),
        home_goals: num_u32(v.get("h_goals"))?,
        away_goals: num_u32(v.get("a_goals"))?,
        date: v.get("date")?.as_str()?.to_string(),
        minutes_played: num_u32(v.get("time"))?,
        goals: num_u32(v.get("goals"))?,
        assists: num_u32(v.get("assists"))?,
        expected_goals: num_f64(v.get("xG"))?,
        expected_assists: num_f64(v.get("xA"))?,
        non_penalty_goals: num_u32(v.get("npg"))?,
        non_penalty_expected_goals: num_f64(v.get("npxG"))?,
        key_passes: num_u32(v.get("key_passes"))?,
        starter: v.get("position").and_then(|p| p.as_str()) != Some("Sub"),
        saves: num_u32(v.get("saves")),
    })
}

fn parse_result_row(v: &serde_json::Value, season: &str) -> Option<LeagueResult> {
    Some(LeagueResult {
        fixture_id: num_u32(v.get("id"))?,
        home_team: v.get("h")?.get("title")?.as_str()?.to_string(),
        away_team: v.get("a")?.get("title")?.as_str()?.to_string(),
        home_goals: num_u32(v.get("goals").and_then(|g| g.get("h")))?,
        away_goals: num_u32(v.get("goals").and_then(|g| g.get("a")))?,
        home_xg: num_f64(v.get("xG").and_then(|x| x.get("h")))?,
        away_xg: num_f64(v.get("xG").and_then(|x| x.get("a")))?,
        date: v.get("datetime")?.as_str()?.to_string(),
        season: season.to_string(),
    })
}
