//! Fixed top-flight roster and team-name normalization, shared by the
//! identity resolver and the fixture filter. The two sources spell club
//! names differently ("Man Utd" vs "Manchester United"), so every
//! comparison goes through `same_team` rather than string equality.

pub struct Team {
    /// Spelling used by the primary feed.
    pub primary_name: &'static str,
    /// Spelling used by the secondary analytics site.
    pub secondary_name: &'static str,
    pub short: &'static str,
    /// Other spellings seen in queries and older payloads.
    pub aliases: &'static [&'static str],
}

pub const TOP_FLIGHT: &[Team] = &[
    Team { primary_name: "Arsenal", secondary_name: "Arsenal", short: "ARS", aliases: &[] },
    Team { primary_name: "Aston Villa", secondary_name: "Aston Villa", short: "AVL", aliases: &["villa"] },
    Team { primary_name: "Brighton", secondary_name: "Brighton", short: "BHA", aliases: &["brighton and hove albion", "brighton & hove albion"] },
    Team { primary_name: "Burnley", secondary_name: "Burnley", short: "BUR", aliases: &[] },
    Team { primary_name: "Chelsea", secondary_name: "Chelsea", short: "CHE", aliases: &[] },
    Team { primary_name: "Crystal Palace", secondary_name: "Crystal Palace", short: "CRY", aliases: &["palace"] },
    Team { primary_name: "Everton", secondary_name: "Everton", short: "EVE", aliases: &[] },
    Team { primary_name: "Fulham", secondary_name: "Fulham", short: "FUL", aliases: &[] },
    Team { primary_name: "Leicester", secondary_name: "Leicester", short: "LEI", aliases: &["leicester city"] },
    Team { primary_name: "Leeds", secondary_name: "Leeds", short: "LEE", aliases: &["leeds united"] },
    Team { primary_name: "Liverpool", secondary_name: "Liverpool", short: "LIV", aliases: &[] },
    Team { primary_name: "Man City", secondary_name: "Manchester City", short: "MCI", aliases: &["city"] },
    Team { primary_name: "Man Utd", secondary_name: "Manchester United", short: "MUN", aliases: &["man united", "united"] },
    Team { primary_name: "Newcastle", secondary_name: "Newcastle United", short: "NEW", aliases: &[] },
    Team { primary_name: "Sheffield Utd", secondary_name: "Sheffield United", short: "SHU", aliases: &["blades"] },
    Team { primary_name: "Southampton", secondary_name: "Southampton", short: "SOU", aliases: &["saints"] },
    Team { primary_name: "Spurs", secondary_name: "Tottenham", short: "TOT", aliases: &["tottenham hotspur"] },
    Team { primary_name: "West Brom", secondary_name: "West Bromwich Albion", short: "WBA", aliases: &["west bromwich"] },
    Team { primary_name: "West Ham", secondary_name: "West Ham", short: "WHU", aliases: &["west ham united", "hammers"] },
    Team { primary_name: "Wolves", secondary_name: "Wolverhampton Wanderers", short: "WOL", aliases: &["wolverhampton"] },
];

/// Lowercase, strip " fc"/" afc" suffixes, collapse whitespace. Does NOT
/// strip distinguishing words like "city" or "united".
pub fn normalize(name: &str) -> String {
    let s = name.to_lowercase();
    let s = s
        .strip_suffix(" afc")
        .or_else(|| s.strip_suffix(" fc"))
        .unwrap_or(&s);
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Look up the roster entry matching any known spelling of `name`.
pub fn canonical(name: &str) -> Option<&'static Team> {
    let norm = normalize(name);
    if norm.is_empty() {
        return None;
    }
    TOP_FLIGHT.iter().find(|t| {
        norm == normalize(t.primary_name)
            || norm == normalize(t.secondary_name)
            || norm == t.short.to_lowercase()
            || t.aliases.iter().any(|a| norm == *a)
    })
}

/// Whether two spellings refer to the same club. Falls back to normalized
/// equality for clubs outside the roster (relegated opponents in old logs).
pub fn same_team(a: &str, b: &str) -> bool {
    match (canonical(a), canonical(b)) {
        (Some(ta), Some(tb)) => std::ptr::eq(ta, tb),
        _ => normalize(a) == normalize(b),
    }
}

pub fn is_top_flight(name: &str) -> bool {
    canonical(name).is_some()
}

/// Three-letter code for report tables; unrecognized names pass through.
pub fn short_name(name: &str) -> String {
    canonical(name)
        .map(|t| t.short.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_source_spellings_are_the_same_club() {
        assert!(same_team("Man Utd", "Manchester United"));
        assert!(same_team("Spurs", "Tottenham"));
        assert!(same_team("Wolves", "Wolverhampton Wanderers FC"));
    }

    #[test]
    fn city_and_united_stay_distinct() {
        assert!(!same_team("Manchester City", "Manchester United"));
        assert!(!same_team("Man City", "Man Utd"));
    }

    #[test]
    fn unknown_clubs_compare_by_normalized_name() {
        assert!(same_team("Norwich", "Norwich FC"));
        assert!(!same_team("Norwich", "Watford"));
        assert!(!is_top_flight("Norwich"));
    }

    #[test]
    fn short_codes_resolve() {
        assert_eq!(short_name("Manchester United"), "MUN");
        assert_eq!(short_name("Sheffield United"), "SHU");
        assert_eq!(short_name("Some Lower League XI"), "Some Lower League XI");
    }
}
