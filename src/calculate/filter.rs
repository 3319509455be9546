//! Matchday ordering and match filtering.

use serde::{Deserialize, Serialize};

use crate::models::{DivisionId, Match, TeamId};

use super::score::is_match_played;

/// Distinct matchday labels in the order they first appear (matches sorted by id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchdayOrder {
    labels: Vec<String>,
}

impl MatchdayOrder {
    /// Build the order from any set of matches.
    pub fn from_matches<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut sorted: Vec<&Match> = matches.into_iter().collect();
        sorted.sort_by_key(|m| m.id);

        let mut labels: Vec<String> = Vec::new();
        for m in sorted {
            if !labels.contains(&m.matchday) {
                labels.push(m.matchday.clone());
            }
        }
        Self { labels }
    }

    /// Build the order of one division's matchdays.
    pub fn for_division(matches: &[Match], division: DivisionId) -> Self {
        Self::from_matches(matches.iter().filter(|m| m.division == division))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of a label in the order.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Range covering every matchday.
    pub fn full_range(&self) -> Option<MatchdayRange> {
        if self.labels.is_empty() {
            None
        } else {
            Some(MatchdayRange::new(0, self.labels.len() - 1))
        }
    }

    /// Inclusive range between two labels. A missing bound extends to that end.
    pub fn range_between(&self, from: Option<&str>, to: Option<&str>) -> Option<MatchdayRange> {
        let full = self.full_range()?;
        let start = match from {
            Some(label) => self.index_of(label)?,
            None => full.start,
        };
        let end = match to {
            Some(label) => self.index_of(label)?,
            None => full.end,
        };
        Some(MatchdayRange::new(start, end))
    }

    /// Whether a match's matchday falls inside a range.
    pub fn contains(&self, range: &MatchdayRange, m: &Match) -> bool {
        self.index_of(&m.matchday)
            .map_or(false, |index| range.contains(index))
    }
}

/// Inclusive range of matchday positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchdayRange {
    pub start: usize,
    pub end: usize,
}

impl MatchdayRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Default range for a division's statistics: up to the last matchday before the first
/// one that still has an unplayed match.
pub fn default_stats_range(matches: &[Match], division: DivisionId) -> Option<MatchdayRange> {
    let order = MatchdayOrder::for_division(matches, division);
    let full = order.full_range()?;

    let first_unplayed = matches
        .iter()
        .filter(|m| m.division == division && !is_match_played(m))
        .filter_map(|m| order.index_of(&m.matchday))
        .min();

    let end = match first_unplayed {
        Some(index) => index.saturating_sub(1),
        None => full.end,
    };
    Some(MatchdayRange::new(0, end))
}

/// Matchday part of a match filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchdaySelection {
    #[default]
    All,
    /// One matchday label
    Exactly(String),
    /// Inclusive range of positions in the division's matchday order
    Range(MatchdayRange),
}

/// Criteria for selecting matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFilter {
    pub division: DivisionId,
    pub team: Option<TeamId>,
    pub matchdays: MatchdaySelection,
}

impl MatchFilter {
    /// All matches of a division.
    pub fn division(division: DivisionId) -> Self {
        Self {
            division,
            team: None,
            matchdays: MatchdaySelection::All,
        }
    }

    /// Builder method to restrict to one team's matches.
    pub fn with_team(mut self, team: Option<TeamId>) -> Self {
        self.team = team;
        self
    }

    /// Builder method to restrict the matchdays.
    pub fn with_matchdays(mut self, matchdays: MatchdaySelection) -> Self {
        self.matchdays = matchdays;
        self
    }
}

/// Select matches, keeping their input order.
pub fn filter_matches<'a>(matches: &'a [Match], filter: &MatchFilter) -> Vec<&'a Match> {
    let order = MatchdayOrder::for_division(matches, filter.division);

    matches
        .iter()
        .filter(|m| m.division == filter.division)
        .filter(|m| filter.team.map_or(true, |team| m.involves(team)))
        .filter(|m| match &filter.matchdays {
            MatchdaySelection::All => true,
            MatchdaySelection::Exactly(label) => &m.matchday == label,
            MatchdaySelection::Range(range) => order.contains(range, m),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DefWin, Period};

    fn m(id: u32, division: u32, matchday: &str) -> Match {
        Match::new(id.into(), division.into(), matchday).with_teams(10.into(), 20.into())
    }

    fn played(id: u32, division: u32, matchday: &str) -> Match {
        m(id, division, matchday).with_periods(vec![Period::new(id.into(), 1, 0)])
    }

    #[test]
    fn test_matchday_order_first_appearance_by_id() {
        let matches = vec![m(3, 1, "2"), m(1, 1, "1"), m(2, 1, "1"), m(4, 1, "Playoffs")];
        let order = MatchdayOrder::from_matches(&matches);

        assert_eq!(order.labels(), &["1", "2", "Playoffs"]);
        assert_eq!(order.index_of("Playoffs"), Some(2));
        assert_eq!(order.index_of("9"), None);
    }

    #[test]
    fn test_range_between_labels() {
        let matches = vec![m(1, 1, "1"), m(2, 1, "2"), m(3, 1, "3")];
        let order = MatchdayOrder::from_matches(&matches);

        assert_eq!(
            order.range_between(Some("2"), None),
            Some(MatchdayRange::new(1, 2))
        );
        assert_eq!(
            order.range_between(None, Some("1")),
            Some(MatchdayRange::new(0, 0))
        );
        assert_eq!(order.range_between(Some("7"), None), None);
    }

    #[test]
    fn test_default_stats_range_stops_before_unplayed() {
        let matches = vec![
            played(1, 1, "1"),
            played(2, 1, "2"),
            m(3, 1, "2"),
            m(4, 1, "3"),
        ];

        assert_eq!(
            default_stats_range(&matches, 1.into()),
            Some(MatchdayRange::new(0, 0))
        );
    }

    #[test]
    fn test_default_stats_range_all_played() {
        let matches = vec![
            played(1, 1, "1"),
            m(2, 1, "2").with_defwin(DefWin::First),
        ];

        assert_eq!(
            default_stats_range(&matches, 1.into()),
            Some(MatchdayRange::new(0, 1))
        );
    }

    #[test]
    fn test_default_stats_range_nothing_played() {
        let matches = vec![m(1, 1, "1"), m(2, 1, "2")];

        assert_eq!(
            default_stats_range(&matches, 1.into()),
            Some(MatchdayRange::new(0, 0))
        );
        assert_eq!(default_stats_range(&matches, 2.into()), None);
    }

    #[test]
    fn test_filter_by_division_and_team() {
        let mut other = m(3, 1, "1");
        other.details[0].team = 30.into();
        other.details[1].team = 40.into();
        let matches = vec![m(1, 1, "1"), m(2, 2, "1"), other];

        let filter = MatchFilter::division(1.into()).with_team(Some(30.into()));
        let selected = filter_matches(&matches, &filter);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 3.into());

        let all = filter_matches(&matches, &MatchFilter::division(1.into()));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_filter_by_matchday_range_uses_division_order() {
        let matches = vec![
            m(1, 1, "1"),
            m(2, 2, "A"),
            m(3, 1, "2"),
            m(4, 1, "3"),
        ];

        let filter = MatchFilter::division(1.into())
            .with_matchdays(MatchdaySelection::Range(MatchdayRange::new(1, 2)));
        let ids: Vec<_> = filter_matches(&matches, &filter)
            .iter()
            .map(|m| m.id.value())
            .collect();

        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_filter_exact_matchday() {
        let matches = vec![m(1, 1, "1"), m(2, 1, "Playoffs"), m(3, 1, "Playoffs")];

        let filter = MatchFilter::division(1.into())
            .with_matchdays(MatchdaySelection::Exactly("Playoffs".to_string()));

        assert_eq!(filter_matches(&matches, &filter).len(), 2);
    }
}
