//! Fixture comparison tables with computed footer totals.

use std::collections::HashMap;

use crate::teams;
use crate::types::{LeagueResult, MatchRecord, PlayerRecord, Position};

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Coerce a rendered cell back to a number for footer accumulation. Cells
/// that fail (placeholders, labels) are skipped — not zero-filled and not
/// errors — so a column mixing numeric and non-numeric values silently
/// loses the non-numeric contributions. Bold markers are transparent.
pub fn try_num(cell: &str) -> Option<f64> {
    cell.trim().trim_matches('*').trim().parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Text column; no footer total.
    Label,
    /// Count-like total, rendered as an integer.
    Count,
    /// Rate-like total, rendered to two decimals.
    Rate,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub kind: ColumnKind,
}

const fn col(header: &'static str, kind: ColumnKind) -> Column {
    Column { header, kind }
}

/// Stat columns for a position (fixture and date labels excluded).
/// Key passes anchor the outfield layout; defender defensive columns slot
/// in just before them.
pub fn stat_columns(position: Position) -> Vec<Column> {
    use ColumnKind::{Count, Rate};
    match position {
        Position::Goalkeeper => vec![
            col("MP", Count),
            col("GC", Count),
            col("xGA", Rate),
            col("S", Count),
        ],
        Position::Defender => vec![
            col("MP", Count),
            col("G", Count),
            col("xG", Rate),
            col("A", Count),
            col("xA", Rate),
            col("NPG", Count),
            col("NPxG", Rate),
            col("GC", Count),
            col("xGA", Rate),
            col("KP", Count),
        ],
        Position::Midfielder | Position::Forward => vec![
            col("MP", Count),
            col("G", Count),
            col("xG", Rate),
            col("A", Count),
            col("xA", Rate),
            col("NPG", Count),
            col("NPxG", Rate),
            col("KP", Count),
        ],
    }
}

// ---------------------------------------------------------------------------
// Single-player table
// ---------------------------------------------------------------------------

pub struct FixtureTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
}

impl FixtureTable {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push('|');
        for column in &self.columns {
            out.push_str(column.header);
            out.push('|');
        }
        out.push_str("\n|");
        for column in &self.columns {
            out.push_str(match column.kind {
                ColumnKind::Label => ":-",
                _ => ":-:",
            });
            out.push('|');
        }
        out.push('\n');
        for row in self.rows.iter().chain(std::iter::once(&self.footer)) {
            out.push('|');
            for cell in row {
                out.push_str(cell);
                out.push('|');
            }
            out.push('\n');
        }
        out
    }
}

/// Aggregate a filtered fixture list into a row-oriented table with a
/// footer of totals.
pub fn build_table(
    player: &PlayerRecord,
    fixtures: &[MatchRecord],
    results: &HashMap<u32, LeagueResult>,
) -> FixtureTable {
    let mut columns = vec![col("Fixture", ColumnKind::Label), col("Date", ColumnKind::Label)];
    let stats = stat_columns(player.position);
    columns.extend(stats.iter().copied());

    let rows: Vec<Vec<String>> = fixtures
        .iter()
        .map(|m| {
            let mut row = vec![fixture_label(m), m.date.clone()];
            row.extend(stats.iter().map(|c| stat_cell(c.header, player, m, results)));
            row
        })
        .collect();

    let footer = footer_row(&columns, &rows);
    FixtureTable { columns, rows, footer }
}

/// `home h-a away` with the winner's name bolded; draws stay plain.
fn fixture_label(m: &MatchRecord) -> String {
    if m.home_goals > m.away_goals {
        format!("**{}** {}-{} {}", m.home_team, m.home_goals, m.away_goals, m.away_team)
    } else if m.home_goals < m.away_goals {
        format!("{} {}-{} **{}**", m.home_team, m.home_goals, m.away_goals, m.away_team)
    } else {
        format!("{} {}-{} {}", m.home_team, m.home_goals, m.away_goals, m.away_team)
    }
}

fn stat_cell(
    header: &str,
    player: &PlayerRecord,
    m: &MatchRecord,
    results: &HashMap<u32, LeagueResult>,
) -> String {
    match header {
        "MP" if m.starter => format!("**{}**", m.minutes_played),
        "MP" => m.minutes_played.to_string(),
        "G" => m.goals.to_string(),
        "xG" => format!("{:.2}", m.expected_goals),
        "A" => m.assists.to_string(),
        "xA" => format!("{:.2}", m.expected_assists),
        "NPG" => m.non_penalty_goals.to_string(),
        "NPxG" => format!("{:.2}", m.non_penalty_expected_goals),
        "KP" => m.key_passes.to_string(),
        "GC" => results
            .get(&m.fixture_id)
            .and_then(|r| r.goals_against(&player.team))
            .or_else(|| goals_conceded(player, m))
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string()),
        "xGA" => results
            .get(&m.fixture_id)
            .and_then(|r| r.expected_goals_against(&player.team))
            .map(|xga| format!("{xga:.2}"))
            .unwrap_or_else(|| "-".to_string()),
        "S" => m
            .saves
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        _ => "-".to_string(),
    }
}

/// Fallback when no result is persisted for the fixture: the conceded
/// count is readable from the match score itself. None when the current
/// club took no part (a former-club appearance).
fn goals_conceded(player: &PlayerRecord, m: &MatchRecord) -> Option<u32> {
    if teams::same_team(&m.home_team, &player.team) {
        Some(m.away_goals)
    } else if teams::same_team(&m.away_team, &player.team) {
        Some(m.home_goals)
    } else {
        None
    }
}

/// Sum every numeric column across the rows via [`try_num`]; coercion
/// failures are skipped. All footer values are bolded.
fn footer_row(columns: &[Column], rows: &[Vec<String>]) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| match column.kind {
            ColumnKind::Label if column.header == "Fixture" => "**Total**".to_string(),
            ColumnKind::Label => String::new(),
            kind => {
                let sum: f64 = rows
                    .iter()
                    .filter_map(|row| row.get(i).and_then(|cell| try_num(cell)))
                    .sum();
                match kind {
                    ColumnKind::Count => format!("**{}**", sum.round() as i64),
                    _ => format!("**{sum:.2}**"),
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Player-vs-player table
// ---------------------------------------------------------------------------

/// Mirrored two-player table: the players' stat columns sit on opposite
/// sides of a shared fixture column, rows are paired by recency, and each
/// side's footer is computed independently over its own cells.
pub fn build_versus_table(
    left: (&PlayerRecord, &[MatchRecord]),
    right: (&PlayerRecord, &[MatchRecord]),
    results: &HashMap<u32, LeagueResult>,
) -> FixtureTable {
    let (left_player, left_fixtures) = left;
    let (right_player, right_fixtures) = right;

    let mut left_stats = stat_columns(left_player.position);
    left_stats.reverse();
    let right_stats = stat_columns(right_player.position);

    let mut columns = left_stats.clone();
    columns.push(col("Date", ColumnKind::Label));
    columns.push(col("Fixture", ColumnKind::Label));
    columns.push(col("Date", ColumnKind::Label));
    columns.extend(right_stats.iter().copied());

    let left_recent = by_recency(left_fixtures);
    let right_recent = by_recency(right_fixtures);

    let len = left_recent.len().max(right_recent.len());
    let rows: Vec<Vec<String>> = (0..len)
        .map(|i| {
            let lm = left_recent.get(i);
            let rm = right_recent.get(i);

            let mut row: Vec<String> = left_stats
                .iter()
                .map(|c| side_cell(c.header, left_player, lm, results))
                .collect();
            row.push(lm.map(|m| m.date.clone()).unwrap_or_else(|| "-".to_string()));
            row.push(shared_fixture_label(lm, rm));
            row.push(rm.map(|m| m.date.clone()).unwrap_or_else(|| "-".to_string()));
            row.extend(
                right_stats
                    .iter()
                    .map(|c| side_cell(c.header, right_player, rm, results)),
            );
            row
        })
        .collect();

    let footer = footer_row(&columns, &rows);
    FixtureTable { columns, rows, footer }
}

fn by_recency(fixtures: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut ordered: Vec<&MatchRecord> = fixtures.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}

fn side_cell(
    header: &str,
    player: &PlayerRecord,
    m: Option<&&MatchRecord>,
    results: &HashMap<u32, LeagueResult>,
) -> String {
    match m {
        Some(m) => stat_cell(header, player, m, results),
        None => "-".to_string(),
    }
}

/// The shared middle column. Two players rarely appear in the same
/// fixture, so differing labels render side by side.
fn shared_fixture_label(left: Option<&&MatchRecord>, right: Option<&&MatchRecord>) -> String {
    match (left, right) {
        (Some(l), Some(r)) if l.fixture_id == r.fixture_id => fixture_label(l),
        (Some(l), Some(r)) => format!("{} / {}", fixture_label(l), fixture_label(r)),
        (Some(l), None) => fixture_label(l),
        (None, Some(r)) => fixture_label(r),
        (None, None) => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outfielder(name: &str, team: &str, position: Position) -> PlayerRecord {
        PlayerRecord {
            id: 1,
            name: name.to_string(),
            team: team.to_string(),
            position,
            cost: 100,
            cost_change_event: 0,
            ownership_percent: 20.0,
            recent_points: Vec::new(),
            match_history: Vec::new(),
        }
    }

    fn appearance(fixture_id: u32, goals: u32, xg: f64) -> MatchRecord {
        MatchRecord {
            fixture_id,
            home_team: "Liverpool".to_string(),
            away_team: "Everton".to_string(),
            home_goals: 2,
            away_goals: 1,
            date: format!("2020-10-{:02}", fixture_id % 28 + 1),
            minutes_played: 90,
            goals,
            assists: 1,
            expected_goals: xg,
            expected_assists: 0.10,
            non_penalty_goals: goals,
            non_penalty_expected_goals: xg,
            key_passes: 3,
            starter: true,
            saves: None,
        }
    }

    fn column_index(table: &FixtureTable, header: &str) -> usize {
        table
            .columns
            .iter()
            .position(|c| c.header == header)
            .unwrap_or_else(|| panic!("no {header} column"))
    }

    #[test]
    fn try_num_accepts_numbers_and_rejects_placeholders() {
        assert_eq!(try_num("3"), Some(3.0));
        assert_eq!(try_num("0.75"), Some(0.75));
        assert_eq!(try_num("**90**"), Some(90.0));
        assert_eq!(try_num("-"), None);
        assert_eq!(try_num(""), None);
    }

    #[test]
    fn count_footer_is_an_integer_and_rate_footer_has_two_decimals() {
        let player = outfielder("Mohamed Salah", "Liverpool", Position::Forward);
        let fixtures = vec![appearance(1, 1, 0.31), appearance(2, 2, 0.44)];
        let table = build_table(&player, &fixtures, &HashMap::new());

        assert_eq!(table.footer[column_index(&table, "G")], "**3**");
        assert_eq!(table.footer[column_index(&table, "xG")], "**0.75**");
        assert_eq!(table.footer[column_index(&table, "MP")], "**180**");
    }

    #[test]
    fn non_numeric_cell_is_skipped_in_the_footer_total() {
        // Saves are absent for an outfielder-style record, so the GK saves
        // column mixes a number and a placeholder.
        let player = outfielder("Alisson", "Liverpool", Position::Goalkeeper);
        let mut with_saves = appearance(1, 0, 0.0);
        with_saves.saves = Some(4);
        let without_saves = appearance(2, 0, 0.0);

        let table = build_table(&player, &[with_saves, without_saves], &HashMap::new());
        let s = column_index(&table, "S");
        assert_eq!(table.rows[1][s], "-");
        assert_eq!(table.footer[s], "**4**");
    }

    #[test]
    fn winner_is_bolded_and_draws_are_not() {
        let mut m = appearance(1, 0, 0.0);
        m.home_goals = 2;
        m.away_goals = 1;
        assert_eq!(fixture_label(&m), "**Liverpool** 2-1 Everton");

        m.home_goals = 0;
        m.away_goals = 3;
        assert_eq!(fixture_label(&m), "Liverpool 0-3 **Everton**");

        m.home_goals = 1;
        m.away_goals = 1;
        assert_eq!(fixture_label(&m), "Liverpool 1-1 Everton");
    }

    #[test]
    fn starter_minutes_are_bolded() {
        let player = outfielder("Mohamed Salah", "Liverpool", Position::Forward);
        let mut started = appearance(1, 0, 0.0);
        started.starter = true;
        let mut benched = appearance(2, 0, 0.0);
        benched.starter = false;
        benched.minutes_played = 25;

        let table = build_table(&player, &[started, benched], &HashMap::new());
        let mp = column_index(&table, "MP");
        assert_eq!(table.rows[0][mp], "**90**");
        assert_eq!(table.rows[1][mp], "25");
    }

    #[test]
    fn defender_gets_defensive_columns_before_key_passes() {
        let headers: Vec<&str> = stat_columns(Position::Defender)
            .iter()
            .map(|c| c.header)
            .collect();
        assert_eq!(headers, vec!["MP", "G", "xG", "A", "xA", "NPG", "NPxG", "GC", "xGA", "KP"]);

        let midfield: Vec<&str> = stat_columns(Position::Midfielder)
            .iter()
            .map(|c| c.header)
            .collect();
        assert!(!midfield.contains(&"GC"));
    }

    #[test]
    fn expected_goals_against_comes_from_the_opposing_side_of_the_result() {
        let player = outfielder("Andrew Robertson", "Liverpool", Position::Defender);
        let m = appearance(7, 0, 0.0);
        let results = HashMap::from([(
            7,
            LeagueResult {
                fixture_id: 7,
                home_team: "Liverpool".to_string(),
                away_team: "Everton".to_string(),
                home_goals: 2,
                away_goals: 1,
                home_xg: 1.9,
                away_xg: 0.85,
                date: "2020-10-08".to_string(),
                season: "2020".to_string(),
            },
        )]);

        let table = build_table(&player, &[m], &results);
        assert_eq!(table.rows[0][column_index(&table, "xGA")], "0.85");
        assert_eq!(table.rows[0][column_index(&table, "GC")], "1");
    }

    #[test]
    fn missing_result_renders_a_placeholder_and_skips_the_total() {
        let player = outfielder("Andrew Robertson", "Liverpool", Position::Defender);
        let table = build_table(&player, &[appearance(7, 0, 0.0)], &HashMap::new());
        let xga = column_index(&table, "xGA");
        assert_eq!(table.rows[0][xga], "-");
        assert_eq!(table.footer[xga], "**0.00**");
    }

    #[test]
    fn versus_table_pairs_rows_by_recency_and_totals_each_side() {
        let salah = outfielder("Mohamed Salah", "Liverpool", Position::Forward);
        let kane = outfielder("Harry Kane", "Spurs", Position::Forward);

        let mut salah_old = appearance(1, 1, 0.5);
        salah_old.date = "2020-09-01".to_string();
        let mut salah_new = appearance(2, 2, 0.7);
        salah_new.date = "2020-10-01".to_string();

        let mut kane_only = appearance(3, 1, 0.2);
        kane_only.date = "2020-09-15".to_string();
        kane_only.home_team = "Spurs".to_string();
        kane_only.away_team = "West Ham".to_string();

        let table = build_versus_table(
            (&salah, &[salah_old, salah_new]),
            (&kane, &[kane_only]),
            &HashMap::new(),
        );

        // Most recent fixtures pair up first; the shorter side pads out.
        assert_eq!(table.rows.len(), 2);
        let left_g = table.columns.iter().position(|c| c.header == "G").unwrap();
        assert_eq!(table.rows[0][left_g], "2");
        assert_eq!(table.rows[1][left_g], "1");

        let right_g = table.columns.len()
            - 1
            - table
                .columns
                .iter()
                .rev()
                .position(|c| c.header == "G")
                .unwrap();
        assert_eq!(table.rows[0][right_g], "1");
        assert_eq!(table.rows[1][right_g], "-");

        // Independent footers: three goals left, one right.
        assert_eq!(table.footer[left_g], "**3**");
        assert_eq!(table.footer[right_g], "**1**");

        // The shared middle column carries the Total marker.
        let fixture = table.columns.iter().position(|c| c.header == "Fixture").unwrap();
        assert_eq!(table.footer[fixture], "**Total**");
    }

    #[test]
    fn markdown_has_header_alignment_body_and_footer_lines() {
        let player = outfielder("Mohamed Salah", "Liverpool", Position::Forward);
        let table = build_table(&player, &[appearance(1, 1, 0.31)], &HashMap::new());
        let md = table.to_markdown();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("|Fixture|Date|MP|"));
        assert!(lines[1].starts_with("|:-|:-|:-:|"));
        assert!(lines[3].contains("**Total**"));
    }
}
