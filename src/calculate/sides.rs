//! Red/blue side assignment across the periods of a match.
//!
//! Teams swap sides every period: the team that starts red is red on even-indexed
//! periods (0, 2, ...) and blue on odd-indexed ones.

use tracing::warn;

use crate::models::{Match, MatchDetail, PlayerSide, Slot};

/// Which slot played red and which played blue in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideAssignment {
    pub red: Slot,
    pub blue: Slot,
}

impl SideAssignment {
    /// Sides for a 0-based period index, given the slot that started red.
    pub fn from_start(starting_red: Slot, period_index: usize) -> Self {
        let red = if period_index % 2 == 0 {
            starting_red
        } else {
            starting_red.other()
        };
        Self {
            red,
            blue: red.other(),
        }
    }

    /// Sides for a 0-based period index, from the two match details.
    pub fn for_period(first: &MatchDetail, second: &MatchDetail, period_index: usize) -> Self {
        Self::from_start(starting_red_slot(first, second), period_index)
    }

    /// Slot of the team behind a side recorded by the game client.
    pub fn slot_for(&self, side: PlayerSide) -> Slot {
        if side.is_red() {
            self.red
        } else {
            self.blue
        }
    }

    pub fn is_red(&self, slot: Slot) -> bool {
        self.red == slot
    }
}

/// Slot of the team that played red in the first period.
///
/// Falls back to slot 1 when neither detail is flagged.
pub fn starting_red_slot(first: &MatchDetail, second: &MatchDetail) -> Slot {
    if first.starts_red {
        if second.starts_red {
            warn!(
                "Both teams {} and {} flagged as starting red; using the first",
                first.team, second.team
            );
        }
        Slot::First
    } else if second.starts_red {
        Slot::Second
    } else {
        warn!(
            "Neither team {} nor {} flagged as starting red; using the first",
            first.team, second.team
        );
        Slot::First
    }
}

/// View of a match restricted to one period (1-based `number`).
///
/// The view keeps only that period, drops the goal adjustments and flags whichever slot
/// was red in it as the starting red team, so it scores like a one-period match.
/// `None` when the match has no such period.
pub fn period_view(m: &Match, number: usize) -> Option<Match> {
    let index = number.checked_sub(1)?;
    let period = m.periods.get(index)?.clone();

    let mut view = m.clone();
    view.periods = vec![period];
    view.add_red = 0;
    view.add_blue = 0;
    if let Some((first, second)) = m.pairing() {
        let red = SideAssignment::for_period(first, second, index).red;
        for (i, detail) in view.details.iter_mut().take(2).enumerate() {
            detail.starts_red = i == red.index();
        }
    }
    Some(view)
}
