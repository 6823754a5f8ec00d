use super::types::{Choice, RoundOutcome};

/// Ordered (player, cpu) pairs the player wins.
pub const WINNING_COMBOS: [(Choice, Choice); 3] = [
    (Choice::Snake, Choice::Water),
    (Choice::Water, Choice::Gun),
    (Choice::Gun, Choice::Snake),
];

impl Choice {
    /// Snake drinks Water, Water floods Gun, Gun shoots Snake.
    pub fn beats(self, other: Choice) -> bool {
        WINNING_COMBOS.contains(&(self, other))
    }
}

/// Decide a round from the player's perspective.
pub fn resolve(player: Choice, cpu: Choice) -> RoundOutcome {
    if player == cpu {
        RoundOutcome::Draw
    } else if player.beats(cpu) {
        RoundOutcome::PlayerWin
    } else {
        RoundOutcome::CpuWin
    }
}
