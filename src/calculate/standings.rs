//! Division standings.

use std::collections::HashMap;

use tracing::debug;

use crate::config::GameRules;
use crate::models::{Division, Match, Slot, StandingRow, Team, TeamId};

use super::filter::{MatchdayOrder, MatchdayRange};
use super::score::resolve_match_score;

/// Compute the standings table of a division.
///
/// Only matches with a real score (not unplayed, not void) and two known teams count.
/// When `range` is given, matches outside that inclusive span of the division's
/// matchday order are skipped. Rows are sorted by points, goal differential, then goals
/// scored, all descending; ties keep the division's team order.
pub fn compute_standings(
    matches: &[Match],
    division: &Division,
    teams: &[Team],
    range: Option<&MatchdayRange>,
    rules: &GameRules,
) -> Vec<StandingRow> {
    let names: HashMap<TeamId, &str> = teams.iter().map(|t| (t.id, t.name.as_str())).collect();
    let order = MatchdayOrder::for_division(matches, division.id);

    let mut rows: Vec<StandingRow> = division
        .teams
        .iter()
        .map(|id| {
            let name = names
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| id.to_string());
            StandingRow::new(*id, name)
        })
        .collect();
    let positions: HashMap<TeamId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.team, i))
        .collect();

    let mut counted = 0usize;
    for m in matches.iter().filter(|m| m.division == division.id) {
        if let Some(range) = range {
            if !order.contains(range, m) {
                continue;
            }
        }
        let Some((score_first, score_second)) = resolve_match_score(m, rules).score() else {
            continue;
        };
        let Some((first, second)) = m.pairing() else {
            continue;
        };
        let beneficiary = m.defwin.beneficiary();

        for (slot, detail, own, opponent) in [
            (Slot::First, first, score_first, score_second),
            (Slot::Second, second, score_second, score_first),
        ] {
            if let Some(&index) = positions.get(&detail.team) {
                rows[index].record(own, opponent, beneficiary == Some(slot));
            }
        }
        counted += 1;
    }

    debug!(
        "Standings for division {}: {} team(s), {} match(es) counted",
        division.id,
        rows.len(),
        counted
    );

    rows.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
    rows
}
