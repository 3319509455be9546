//! Per-player statistic sheets.
//!
//! A match produces one [`StatSheetEntry`] per period and statistics row. Entries are then
//! merged per resolved player name into [`StatSheet`]s, over a single match or any set of
//! matches.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::GameRules;
use crate::models::{
    GamePosition, Match, Player, Slot, StatLine, StatSheet, StatSheetEntry, TeamId,
};

use super::nickname::NicknameResolver;
use super::sides::{starting_red_slot, SideAssignment};

/// Build the stat sheet entries of one match.
pub fn build_stat_sheets(players: &[Player], m: &Match, rules: &GameRules) -> Vec<StatSheetEntry> {
    let resolver = NicknameResolver::new(players);
    build_stat_sheets_with(&resolver, m, rules)
}

/// Build the stat sheet entries of one match with an existing resolver.
pub fn build_stat_sheets_with(
    resolver: &NicknameResolver<'_>,
    m: &Match,
    rules: &GameRules,
) -> Vec<StatSheetEntry> {
    let Some((first, second)) = m.pairing() else {
        if !m.periods.is_empty() {
            warn!("Match {} has periods but no two teams; skipping its statistics", m.id);
        }
        return Vec::new();
    };

    let starting_red = starting_red_slot(first, second);
    let clean_sheet_secs = rules.clean_sheet_secs();
    let mut entries = Vec::new();

    for (index, period) in m.periods.iter().enumerate() {
        let sides = SideAssignment::from_start(starting_red, index);

        for row in &period.player_stats {
            let slot = sides.slot_for(row.side);
            let team = match slot {
                Slot::First => first.team,
                Slot::Second => second.team,
            };
            let is_red = row.side.is_red();
            let resolved = resolver.resolve(&row.raw_name);

            let clean_sheet = u32::from(
                row.line.position.is_goalkeeper()
                    && row.line.gametime >= clean_sheet_secs
                    && period.conceded_by(is_red) == 0,
            );

            entries.push(StatSheetEntry {
                player: resolved.id(),
                player_name: resolved.display_name(),
                team,
                is_red,
                stats: row.line.clone(),
                clean_sheet,
            });
        }
    }

    debug!("Built {} stat sheet entries for match {}", entries.len(), m.id);
    entries
}

/// Merge entries into one sheet per resolved player name, in first-appearance order.
///
/// Counters are summed, gametime is summed with each entry capped at one period, the
/// position is the most frequent one (first seen wins ties), `average_pos_x` is averaged
/// after mirroring blue-side entries and `average_pos_y` is a plain mean. Team and
/// display name come from the first entry of each group.
pub fn aggregate_stat_sheets(entries: &[StatSheetEntry], rules: &GameRules) -> Vec<StatSheet> {
    let mut groups: Vec<Vec<&StatSheetEntry>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        match index.get(entry.player_name.as_str()) {
            Some(&i) => groups[i].push(entry),
            None => {
                index.insert(entry.player_name.as_str(), groups.len());
                groups.push(vec![entry]);
            }
        }
    }

    groups
        .into_iter()
        .map(|group| merge_group(&group, rules.period_secs()))
        .collect()
}

fn merge_group(group: &[&StatSheetEntry], cap_secs: f64) -> StatSheet {
    let head = group[0];
    let count = group.len() as f64;

    let mut stats = StatLine::default();
    let mut clean_sheets = 0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for entry in group {
        stats.add_counters(&entry.stats);
        stats.gametime += entry.stats.gametime.min(cap_secs);
        clean_sheets += entry.clean_sheet;
        sum_x += if entry.is_red {
            entry.stats.average_pos_x
        } else {
            -entry.stats.average_pos_x
        };
        sum_y += entry.stats.average_pos_y;
    }

    stats.position = position_mode(group.iter().map(|e| e.stats.position));
    stats.average_pos_x = sum_x / count;
    stats.average_pos_y = sum_y / count;

    StatSheet {
        player: head.player,
        player_name: head.player_name.clone(),
        team: head.team,
        stats,
        clean_sheets,
        periods: group.len() as u32,
    }
}

/// Most frequent position; ties go to the one seen first.
fn position_mode(positions: impl Iterator<Item = GamePosition>) -> GamePosition {
    let mut counts: Vec<(GamePosition, u32)> = Vec::new();
    for position in positions {
        match counts.iter_mut().find(|(p, _)| *p == position) {
            Some((_, n)) => *n += 1,
            None => counts.push((position, 1)),
        }
    }

    let mut best: Option<(GamePosition, u32)> = None;
    for (position, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((position, n));
        }
    }
    best.map(|(p, _)| p).unwrap_or_default()
}

/// Aggregated sheets of one team in a match, ordered by position then longest gametime.
pub fn team_sheets(entries: &[StatSheetEntry], team: TeamId, rules: &GameRules) -> Vec<StatSheet> {
    let team_entries: Vec<StatSheetEntry> =
        entries.iter().filter(|e| e.team == team).cloned().collect();

    let mut sheets = aggregate_stat_sheets(&team_entries, rules);
    sheets.sort_by(|a, b| {
        a.stats
            .position
            .cmp(&b.stats.position)
            .then(b.stats.gametime.total_cmp(&a.stats.gametime))
    });
    sheets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Period, PlayerSide, PlayerStats};
    use pretty_assertions::assert_eq;

    fn rules() -> GameRules {
        GameRules::default()
    }

    fn players() -> Vec<Player> {
        vec![
            Player::new(1.into(), "Alice").with_nicks(["ali"]),
            Player::new(2.into(), "Bob").with_nicks(["bob"]),
        ]
    }

    fn row(name: &str, side: PlayerSide, line: StatLine) -> PlayerStats {
        PlayerStats::new(name, side).with_line(line)
    }

    fn keeper(gametime: f64) -> StatLine {
        StatLine {
            position: GamePosition::GK,
            gametime,
            ..Default::default()
        }
    }

    /// Team 10 starts red; Alice plays on side 1 in period 1 and side 2 in period 2.
    fn two_period_match() -> Match {
        Match::new(1.into(), 1.into(), "1")
            .with_teams(10.into(), 20.into())
            .with_periods(vec![
                Period::new(1.into(), 2, 0).with_player_stats(vec![
                    row(
                        "ali",
                        PlayerSide::First,
                        StatLine {
                            goals: 2,
                            gametime: 300.0,
                            position: GamePosition::ST,
                            average_pos_x: 100.0,
                            average_pos_y: 10.0,
                            ..Default::default()
                        },
                    ),
                    row("bob", PlayerSide::Second, keeper(300.0)),
                ]),
                Period::new(2.into(), 1, 1).with_player_stats(vec![
                    row(
                        "ALI",
                        PlayerSide::Second,
                        StatLine {
                            goals: 1,
                            assists: 1,
                            gametime: 280.0,
                            position: GamePosition::ST,
                            average_pos_x: 50.0,
                            average_pos_y: 30.0,
                            ..Default::default()
                        },
                    ),
                    row("stranger", PlayerSide::First, StatLine::default()),
                ]),
            ])
    }

    #[test]
    fn test_entries_map_sides_to_teams() {
        let entries = build_stat_sheets(&players(), &two_period_match(), &rules());

        assert_eq!(entries.len(), 4);
        // Period 1: side 1 is red = team 10
        assert_eq!(entries[0].team, 10.into());
        assert!(entries[0].is_red);
        assert_eq!(entries[1].team, 20.into());
        // Period 2: sides swap, side 2 (blue) is team 10 again
        assert_eq!(entries[2].team, 10.into());
        assert!(!entries[2].is_red);
        assert_eq!(entries[3].team, 20.into());
    }

    #[test]
    fn test_unknown_player_entry() {
        let entries = build_stat_sheets(&players(), &two_period_match(), &rules());

        assert_eq!(entries[3].player, None);
        assert_eq!(entries[3].player_name, "stranger (unknown)");
    }

    #[test]
    fn test_clean_sheet_credit() {
        let m = Match::new(1.into(), 1.into(), "1")
            .with_teams(10.into(), 20.into())
            .with_periods(vec![Period::new(1.into(), 0, 3).with_player_stats(vec![
                row("ali", PlayerSide::First, keeper(280.0)),
                row("bob", PlayerSide::Second, keeper(280.0)),
            ])]);
        let rules = GameRules {
            clean_sheet_fraction: 0.9,
            ..GameRules::default()
        };

        let entries = build_stat_sheets(&players(), &m, &rules);
        // Threshold is 270s. Red keeper conceded 3, blue keeper conceded 0.
        assert_eq!(entries[0].clean_sheet, 0);
        assert_eq!(entries[1].clean_sheet, 1);
    }

    #[test]
    fn test_clean_sheet_requires_time_and_position() {
        let m = Match::new(1.into(), 1.into(), "1")
            .with_teams(10.into(), 20.into())
            .with_periods(vec![Period::new(1.into(), 0, 0).with_player_stats(vec![
                row("ali", PlayerSide::First, keeper(100.0)),
                row(
                    "bob",
                    PlayerSide::Second,
                    StatLine {
                        position: GamePosition::DM,
                        gametime: 300.0,
                        ..Default::default()
                    },
                ),
            ])]);

        let entries = build_stat_sheets(&players(), &m, &rules());
        assert_eq!(entries[0].clean_sheet, 0);
        assert_eq!(entries[1].clean_sheet, 0);
    }

    #[test]
    fn test_match_without_teams_has_no_entries() {
        let mut m = two_period_match();
        m.details.clear();

        assert!(build_stat_sheets(&players(), &m, &rules()).is_empty());
    }

    #[test]
    fn test_aggregate_sums_counters() {
        let entries = build_stat_sheets(&players(), &two_period_match(), &rules());
        let sheets = aggregate_stat_sheets(&entries, &rules());

        assert_eq!(sheets.len(), 3);
        let alice = &sheets[0];
        assert_eq!(alice.player_name, "Alice");
        assert_eq!(alice.player, Some(1.into()));
        assert_eq!(alice.stats.goals, 3);
        assert_eq!(alice.stats.assists, 1);
        assert_eq!(alice.stats.gametime, 580.0);
        assert_eq!(alice.periods, 2);
        assert_eq!(alice.team, 10.into());
    }

    #[test]
    fn test_aggregate_mirrors_blue_x_position() {
        let entries = build_stat_sheets(&players(), &two_period_match(), &rules());
        let sheets = aggregate_stat_sheets(&entries, &rules());
        let alice = &sheets[0];

        // (100 + -50) / 2 and (10 + 30) / 2
        assert_eq!(alice.stats.average_pos_x, 25.0);
        assert_eq!(alice.stats.average_pos_y, 20.0);
    }

    #[test]
    fn test_aggregate_caps_gametime_per_entry() {
        let entry = |time: f64| StatSheetEntry {
            player: Some(1.into()),
            player_name: "Alice".to_string(),
            team: 10.into(),
            is_red: true,
            stats: StatLine {
                gametime: time,
                ..Default::default()
            },
            clean_sheet: 0,
        };

        let sheets = aggregate_stat_sheets(&[entry(450.0), entry(200.0)], &rules());
        assert_eq!(sheets[0].stats.gametime, 500.0);
    }

    #[test]
    fn test_aggregate_position_mode_tie_first_seen() {
        let entry = |position: GamePosition| StatSheetEntry {
            player: None,
            player_name: "x (unknown)".to_string(),
            team: 10.into(),
            is_red: true,
            stats: StatLine {
                position,
                ..Default::default()
            },
            clean_sheet: 0,
        };

        let tie = [entry(GamePosition::AM), entry(GamePosition::GK)];
        assert_eq!(
            aggregate_stat_sheets(&tie, &rules())[0].stats.position,
            GamePosition::AM
        );

        let majority = [
            entry(GamePosition::AM),
            entry(GamePosition::GK),
            entry(GamePosition::GK),
        ];
        assert_eq!(
            aggregate_stat_sheets(&majority, &rules())[0].stats.position,
            GamePosition::GK
        );
    }

    #[test]
    fn test_aggregate_groups_unknowns_by_raw_name() {
        let entry = |name: &str, goals: u32| StatSheetEntry {
            player: None,
            player_name: format!("{} (unknown)", name),
            team: 10.into(),
            is_red: true,
            stats: StatLine {
                goals,
                ..Default::default()
            },
            clean_sheet: 0,
        };

        let sheets = aggregate_stat_sheets(
            &[entry("ghost", 1), entry("phantom", 2), entry("ghost", 3)],
            &rules(),
        );

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].player_name, "ghost (unknown)");
        assert_eq!(sheets[0].stats.goals, 4);
        assert_eq!(sheets[1].stats.goals, 2);
    }

    #[test]
    fn test_aggregate_across_matches_sums_clean_sheets() {
        let m = Match::new(1.into(), 1.into(), "1")
            .with_teams(10.into(), 20.into())
            .with_periods(vec![Period::new(1.into(), 0, 0)
                .with_player_stats(vec![row("bob", PlayerSide::First, keeper(300.0))])]);
        let mut entries = build_stat_sheets(&players(), &m, &rules());
        entries.extend(build_stat_sheets(&players(), &m, &rules()));

        let sheets = aggregate_stat_sheets(&entries, &rules());
        assert_eq!(sheets[0].clean_sheets, 2);
        assert_eq!(sheets[0].stats.position, GamePosition::GK);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let entries = build_stat_sheets(&players(), &two_period_match(), &rules());
        let before = entries.clone();

        let first = aggregate_stat_sheets(&entries, &rules());
        let second = aggregate_stat_sheets(&entries, &rules());

        assert_eq!(first, second);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_stat_sheets(&[], &rules()).is_empty());
    }

    #[test]
    fn test_team_sheets_order() {
        let m = Match::new(1.into(), 1.into(), "1")
            .with_teams(10.into(), 20.into())
            .with_periods(vec![Period::new(1.into(), 0, 0).with_player_stats(vec![
                row(
                    "ali",
                    PlayerSide::First,
                    StatLine {
                        position: GamePosition::ST,
                        gametime: 300.0,
                        ..Default::default()
                    },
                ),
                row("bob", PlayerSide::First, keeper(120.0)),
                row(
                    "x",
                    PlayerSide::First,
                    StatLine {
                        position: GamePosition::ST,
                        gametime: 200.0,
                        ..Default::default()
                    },
                ),
                row("y", PlayerSide::Second, keeper(300.0)),
            ])]);

        let entries = build_stat_sheets(&players(), &m, &rules());
        let sheets = team_sheets(&entries, 10.into(), &rules());

        let names: Vec<&str> = sheets.iter().map(|s| s.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice", "x (unknown)"]);
    }
}
