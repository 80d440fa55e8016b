//! Price-change report tables.

use crate::config::FORM_WINDOW;
use crate::teams;
use crate::types::{PlayerRecord, PriceMovements};

/// One riser/faller section. Prices are served in tenths of £m; the delta
/// takes its sign from the section and its magnitude from the feed.
pub fn price_change_table(players: &[PlayerRecord], risers: bool) -> String {
    let header = "|Name|Team|Position|Ownership|Price|Δ|Form|\n\
                  |:-|:-|:-|:-:|:-:|:-:|:-:|\n";

    let body = players
        .iter()
        .map(|p| {
            format!(
                "|{}|{}|{}|{:.1}%|£{:.1}|{}£{:.1}|{}|",
                p.name,
                teams::short_name(&p.team),
                p.position,
                p.ownership_percent,
                p.cost as f64 / 10.0,
                if risers { "+" } else { "-" },
                (p.cost_change_event as f64 / 10.0).abs(),
                p.form(FORM_WINDOW),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header}{body}")
}

/// The full report body: a section per movement direction. New players
/// are noted but not tabulated — they have no previous price to move from.
pub fn price_report(moves: &PriceMovements) -> String {
    let mut sections = Vec::new();
    if !moves.risers.is_empty() {
        sections.push(format!(
            "## Price risers\n\n{}",
            price_change_table(&moves.risers, true)
        ));
    }
    if !moves.fallers.is_empty() {
        sections.push(format!(
            "## Price fallers\n\n{}",
            price_change_table(&moves.fallers, false)
        ));
    }
    if sections.is_empty() {
        sections.push("No price changes since the last snapshot.".to_string());
    }
    if !moves.new_players.is_empty() {
        sections.push(format!("{} new player(s) entered the game.", moves.new_players.len()));
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn riser() -> PlayerRecord {
        PlayerRecord {
            id: 233,
            name: "Mohamed Salah".to_string(),
            team: "Liverpool".to_string(),
            position: Position::Midfielder,
            cost: 129,
            cost_change_event: 1,
            ownership_percent: 45.3,
            recent_points: vec![2, 3, 9, 6, 2, 12],
            match_history: Vec::new(),
        }
    }

    #[test]
    fn riser_row_formats_price_delta_and_form() {
        let table = price_change_table(&[riser()], true);
        let row = table.lines().nth(2).expect("one body row");
        assert_eq!(row, "|Mohamed Salah|LIV|Midfielder|45.3%|£12.9|+£0.1|32|");
    }

    #[test]
    fn faller_delta_is_negative_regardless_of_feed_sign() {
        let mut p = riser();
        p.cost_change_event = -1;
        let table = price_change_table(&[p], false);
        assert!(table.contains("|-£0.1|"), "table was: {table}");
    }

    #[test]
    fn empty_movements_report_says_so() {
        let report = price_report(&PriceMovements::default());
        assert!(report.contains("No price changes"));
    }
}
