mod config;
mod differ;
mod error;
mod fixtures;
mod pipeline;
mod report;
mod resolver;
mod sources;
mod store;
mod teams;
mod types;

use std::collections::{HashMap, HashSet};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::fixtures::FixtureFilter;
use crate::pipeline::ScoutPipeline;
use crate::report::prices;
use crate::report::table;
use crate::report::{ReportChannel, StdoutChannel};
use crate::resolver::Resolver;
use crate::store::PlayerStore;
use crate::types::LeagueResult;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        usage();
        return Ok(());
    };

    let store = PlayerStore::connect(&format!("sqlite:{}?mode=rwc", cfg.db_path)).await?;
    info!("Database ready at {}", cfg.db_path);
    let channel = StdoutChannel;

    match command {
        "update" => {
            let pipeline = ScoutPipeline::new(cfg.clone(), store.clone())?;
            let moves = pipeline.refresh_players().await?;
            let results = pipeline.refresh_results().await?;
            info!(
                risers = moves.risers.len(),
                fallers = moves.fallers.len(),
                results,
                "Update complete",
            );
        }
        "prices" => {
            let pipeline = ScoutPipeline::new(cfg.clone(), store.clone())?;
            let moves = pipeline.refresh_players().await?;
            channel.publish("Price changes", &prices::price_report(&moves));
        }
        "versus" if args.len() >= 3 => {
            player_versus_team(&cfg, &store, &channel, &args[1], &args[2]).await?;
        }
        "compare" if args.len() >= 3 => {
            player_versus_player(&cfg, &store, &channel, &args[1], &args[2]).await?;
        }
        _ => usage(),
    }
    Ok(())
}

async fn player_versus_team(
    cfg: &Config,
    store: &PlayerStore,
    channel: &impl ReportChannel,
    player_query: &str,
    opponent: &str,
) -> Result<()> {
    let corpus = store.all_players().await?;
    let resolver = Resolver::new(cfg.resolver_min_score);
    let Some(player) = resolver.resolve(player_query, &corpus) else {
        warn!("No player matching '{player_query}'");
        return Ok(());
    };

    let season_ids = store.season_fixture_ids(&cfg.season).await?;
    let fixtures =
        FixtureFilter::new(&player.team, &season_ids).relevant(&player.match_history, Some(opponent));
    let results = load_results(store, fixtures.iter().map(|m| m.fixture_id)).await?;

    let report = table::build_table(player, &fixtures, &results);
    channel.publish(&format!("{} vs {}", player.name, opponent), &report.to_markdown());
    Ok(())
}

async fn player_versus_player(
    cfg: &Config,
    store: &PlayerStore,
    channel: &impl ReportChannel,
    first_query: &str,
    second_query: &str,
) -> Result<()> {
    let corpus = store.all_players().await?;
    let resolver = Resolver::new(cfg.resolver_min_score);
    let Some(first) = resolver.resolve(first_query, &corpus) else {
        warn!("No player matching '{first_query}'");
        return Ok(());
    };
    let Some(second) = resolver.resolve(second_query, &corpus) else {
        warn!("No player matching '{second_query}'");
        return Ok(());
    };

    let season_ids = store.season_fixture_ids(&cfg.season).await?;
    let first_fixtures =
        FixtureFilter::new(&first.team, &season_ids).relevant(&first.match_history, None);
    let second_fixtures =
        FixtureFilter::new(&second.team, &season_ids).relevant(&second.match_history, None);

    let fixture_ids = first_fixtures
        .iter()
        .chain(second_fixtures.iter())
        .map(|m| m.fixture_id);
    let results = load_results(store, fixture_ids).await?;

    let report = table::build_versus_table(
        (first, &first_fixtures),
        (second, &second_fixtures),
        &results,
    );
    channel.publish(&format!("{} vs {}", first.name, second.name), &report.to_markdown());
    Ok(())
}

async fn load_results(
    store: &PlayerStore,
    fixture_ids: impl Iterator<Item = u32>,
) -> Result<HashMap<u32, LeagueResult>> {
    let mut map = HashMap::new();
    for id in fixture_ids.collect::<HashSet<_>>() {
        if let Some(result) = store.find_result(id).await? {
            map.insert(id, result);
        }
    }
    Ok(map)
}

fn usage() {
    eprintln!(
        "Usage: scout <command>\n\n\
         Commands:\n\
         \x20 update                    refresh players and league results\n\
         \x20 prices                    refresh players, publish the price-change report\n\
         \x20 versus <player> <team>    player-vs-opponent comparison table\n\
         \x20 compare <player> <player> player-vs-player comparison table"
    );
}
