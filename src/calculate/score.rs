//! Match score resolution.

use tracing::warn;

use crate::config::GameRules;
use crate::models::{DefWin, Match, MatchResult, MatchScore};

use super::sides::{starting_red_slot, SideAssignment};

/// Resolve a match's score, possession and action zone, ordered (team1, team2).
///
/// Default wins short-circuit everything else. Otherwise the red/blue figures of every
/// period are credited to whichever team held that side, then the manual adjustments
/// are added to the score: `add_red` to the team that started red, `add_blue` to the
/// other one.
pub fn resolve_match_score(m: &Match, rules: &GameRules) -> MatchResult {
    match m.defwin {
        DefWin::First => return MatchResult::Scored(MatchScore::from_score(rules.defwin_score, 0)),
        DefWin::Second => return MatchResult::Scored(MatchScore::from_score(0, rules.defwin_score)),
        DefWin::Void => return MatchResult::Void,
        DefWin::None => {}
    }

    if m.periods.is_empty() {
        return MatchResult::Unplayed;
    }

    let Some((first, second)) = m.pairing() else {
        warn!(
            "Match {} has {} period(s) but only {} team(s); treating as unplayed",
            m.id,
            m.periods.len(),
            m.details.len()
        );
        return MatchResult::Unplayed;
    };

    let starting_red = starting_red_slot(first, second);
    let mut score = [0i32; 2];
    let mut possession = [0.0f64; 2];
    let mut action_zone = [0.0f64; 2];

    for (index, period) in m.periods.iter().enumerate() {
        let sides = SideAssignment::from_start(starting_red, index);
        let (red, blue) = (sides.red.index(), sides.blue.index());

        score[red] += period.score_red as i32;
        score[blue] += period.score_blue as i32;
        possession[red] += period.possession_red;
        possession[blue] += period.possession_blue;
        action_zone[red] += period.action_zone_red;
        action_zone[blue] += period.action_zone_blue;
    }

    score[starting_red.index()] += m.add_red;
    score[starting_red.other().index()] += m.add_blue;

    MatchResult::Scored(MatchScore {
        score: (score[0], score[1]),
        possession: (possession[0], possession[1]),
        action_zone: (action_zone[0], action_zone[1]),
    })
}

/// Whether a match counts as played for filtering purposes.
pub fn is_match_played(m: &Match) -> bool {
    !m.periods.is_empty() || m.add_red != 0 || m.add_blue != 0 || m.defwin.is_set()
}
