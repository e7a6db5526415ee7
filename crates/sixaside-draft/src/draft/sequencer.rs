// Snake-order turn sequencing.
//
// Everything here is a pure function of (team order, picks so far), so the
// on-the-clock team can always be recomputed from the persisted pick count.

use serde::Serialize;

/// Picks each team makes in a six-a-side draft.
pub const DEFAULT_PICKS_PER_TEAM: u32 = 6;

/// Whose turn it is, and which slot of the draft they are filling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnClock<T> {
    /// 1-based round.
    pub round: u32,
    /// 1-based overall pick number.
    pub pick_number: u32,
    pub team: T,
}

/// Result of sequencing: either a team is on the clock or every pick has
/// been made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Clock<T> {
    OnClock(OnClock<T>),
    Complete,
}

impl<T> Clock<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Clock::Complete)
    }

    pub fn on_clock(&self) -> Option<&OnClock<T>> {
        match self {
            Clock::OnClock(slot) => Some(slot),
            Clock::Complete => None,
        }
    }

    pub fn into_on_clock(self) -> Option<OnClock<T>> {
        match self {
            Clock::OnClock(slot) => Some(slot),
            Clock::Complete => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Clock<U> {
        match self {
            Clock::OnClock(slot) => Clock::OnClock(OnClock {
                round: slot.round,
                pick_number: slot.pick_number,
                team: f(slot.team),
            }),
            Clock::Complete => Clock::Complete,
        }
    }
}

/// Total picks in a draft of `team_count` teams. Saturates at `u32::MAX`
/// rather than wrapping, so an oversized draft never looks complete early.
pub fn total_picks(team_count: usize, picks_per_team: u32) -> u32 {
    u32::try_from(team_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(picks_per_team)
}

/// Compute the team on the clock after `picks_so_far` committed picks.
///
/// Odd rounds walk `ordered_teams` forwards, even rounds walk it backwards,
/// so the last picker of one round opens the next. An empty order has zero
/// total picks and is therefore always complete.
pub fn compute_on_clock<T>(ordered_teams: &[T], picks_so_far: u32, picks_per_team: u32) -> Clock<&T> {
    let team_count = ordered_teams.len();
    if picks_so_far >= total_picks(team_count, picks_per_team) {
        return Clock::Complete;
    }

    // Nonzero and within u32: a larger count would have saturated the total.
    let n = u32::try_from(team_count).unwrap_or(u32::MAX);
    let pick_number = picks_so_far + 1;
    let round = pick_number.div_ceil(n);
    let index = ((pick_number - 1) % n) as usize;

    let team = if round % 2 == 1 {
        &ordered_teams[index]
    } else {
        &ordered_teams[team_count - 1 - index]
    };

    Clock::OnClock(OnClock {
        round,
        pick_number,
        team,
    })
}
