//! Merge pipeline: fetch both sources, classify price movements against
//! the previously persisted snapshot, link identities, fold the secondary
//! match logs onto primary records and persist the result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use tracing::{info, warn};

use crate::config::{Config, SECONDARY_RETRY_BACKOFF_MS};
use crate::differ;
use crate::error::{AppError, Result};
use crate::resolver::Resolver;
use crate::sources::{AnalyticsSite, FplApi};
use crate::store::{MergeIndex, PlayerStore};
use crate::types::{PlayerRecord, PriceMovements, SecondaryPlayerRecord};

pub struct ScoutPipeline {
    cfg: Config,
    store: PlayerStore,
    resolver: Resolver,
    primary: FplApi,
    secondary: AnalyticsSite,
}

impl ScoutPipeline {
    pub fn new(cfg: Config, store: PlayerStore) -> Result<Self> {
        let primary = FplApi::new(&cfg.fpl_api_url)?;
        let secondary = AnalyticsSite::new(&cfg.analytics_url)?;
        let resolver = Resolver::new(cfg.resolver_min_score);
        Ok(Self { cfg, store, resolver, primary, secondary })
    }

    /// One full snapshot cycle. The diff runs against the store before the
    /// upsert overwrites it; the classified movements come back for
    /// reporting.
    pub async fn refresh_players(&self) -> Result<PriceMovements> {
        let previous = self.store.all_players().await?;
        let fresh = self.primary.fetch_all_players().await?;

        let moves = differ::classify_price_moves(&previous, &fresh);
        info!(
            risers = moves.risers.len(),
            fallers = moves.fallers.len(),
            new = moves.new_players.len(),
            "Classified price movements against {} previous records",
            previous.len(),
        );

        let secondary_players = with_parse_retry(
            || self.secondary.fetch_all_players(&self.cfg.season),
            "league players page",
        )
        .await?;
        let links = link_players(&self.resolver, &fresh, &secondary_players);
        info!(
            linked = links.len(),
            secondary = secondary_players.len(),
            "Linked secondary players to primary records",
        );

        let index = MergeIndex::new();
        for player in fresh {
            index.upsert(player);
        }

        // One fetch task per linked player, awaited jointly: a single hard
        // failure abandons the whole batch.
        let tasks = links.iter().map(|(id, sec)| {
            let index = Arc::clone(&index);
            let id = *id;
            async move {
                let history = with_parse_retry(
                    || self.secondary.fetch_match_history(&sec.player_ref),
                    &sec.name,
                )
                .await?;
                if !index.attach_history(id, history) {
                    // Resolver links come from the fresh roster, so a miss
                    // here means the feed dropped the player mid-cycle.
                    let previously_known = self.store.find_by_id(id).await?.is_some();
                    warn!(id, previously_known, "linked player missing from the merge index");
                }
                Ok::<(), AppError>(())
            }
        });
        try_join_all(tasks).await?;

        let merged = index.drain_sorted();
        self.store.upsert_players(&merged).await?;
        Ok(moves)
    }

    /// Refresh the current season's league results, feeding the
    /// expected-goals-against lookups and the known-results set.
    pub async fn refresh_results(&self) -> Result<usize> {
        let results = with_parse_retry(
            || self.secondary.fetch_league_results(&self.cfg.season),
            "league results page",
        )
        .await?;
        self.store.upsert_results(&results).await?;
        info!("Persisted {} league results", results.len());
        Ok(results.len())
    }
}

/// Resolve each secondary record to at most one primary id. Unresolved
/// records are skipped; the resolver logs the diagnostics.
pub fn link_players<'a>(
    resolver: &Resolver,
    primary: &[PlayerRecord],
    secondary: &'a [SecondaryPlayerRecord],
) -> Vec<(u32, &'a SecondaryPlayerRecord)> {
    secondary
        .iter()
        .filter_map(|s| {
            resolver
                .resolve_with_team(&s.name, Some(&s.team), primary)
                .map(|hit| (hit.id, s))
        })
        .collect()
}

/// Retry `op` while it reports a transient parse failure (the expected
/// data block absent from a fetched page), sleeping per the backoff table.
/// Any other error aborts immediately; the attempt after the last backoff
/// entry is final.
pub async fn with_parse_retry<T, F, Fut>(mut op: F, what: &str) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for (attempt, &delay_ms) in SECONDARY_RETRY_BACKOFF_MS.iter().enumerate() {
        match op().await {
            Ok(value) => return Ok(value),
            Err(AppError::Parse(msg)) => {
                warn!(
                    attempt = attempt + 1,
                    "{what}: {msg} — retrying in {delay_ms}ms",
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
    op().await
}
