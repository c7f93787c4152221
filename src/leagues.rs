// football-data.co.uk division codes.
const LEAGUES: &[(&str, &str)] = &[
    ("E0", "Premier League"),
    ("SP1", "La Liga"),
    ("I1", "Serie A"),
    ("D1", "Bundesliga"),
    ("F1", "Ligue 1"),
    ("N1", "Eredivisie"),
    ("P1", "Primeira Liga"),
    ("B1", "Pro League"),
];

pub fn league_name(code: &str) -> &str {
    let key = code.trim();
    LEAGUES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(key))
        .map(|(_, name)| *name)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_and_passes_through_unknown() {
        assert_eq!(league_name("E0"), "Premier League");
        assert_eq!(league_name("sp1"), "La Liga");
        assert_eq!(league_name(" XYZ "), "XYZ");
    }
}
