//! Price movement classification between the previously persisted snapshot
//! and a freshly fetched one.

use std::collections::HashMap;

use crate::types::{PlayerRecord, PriceMovements};

/// Classify every player in `new` against `previous`:
///
/// - id absent from the previous snapshot → `new_players` (never a
///   riser/faller, whatever the price looks like);
/// - previous cost above the new cost → `fallers`;
/// - previous cost below the new cost → `risers`;
/// - equal cost → none of the lists.
///
/// Pure over both inputs; re-running on two identical snapshots yields
/// empty riser and faller sets.
pub fn classify_price_moves(previous: &[PlayerRecord], new: &[PlayerRecord]) -> PriceMovements {
    let old_by_id: HashMap<u32, &PlayerRecord> = previous.iter().map(|p| (p.id, p)).collect();

    let mut moves = PriceMovements::default();
    for player in new {
        match old_by_id.get(&player.id) {
            None => moves.new_players.push(player.clone()),
            Some(old) if old.cost > player.cost => moves.fallers.push(player.clone()),
            Some(old) if old.cost < player.cost => moves.risers.push(player.clone()),
            Some(_) => {}
        }
    }
    moves
}
