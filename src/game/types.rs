use serde::{Deserialize, Serialize};

/// Round wins needed to take a best-of-five match.
pub const WINS_NEEDED: u32 = 3;

/// One of the three weapons a side can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    Snake,
    Water,
    Gun,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Snake, Choice::Water, Choice::Gun];

    /// Stable integer encoding (Snake = 1, Water = -1, Gun = 0).
    pub fn code(self) -> i8 {
        match self {
            Choice::Snake => 1,
            Choice::Water => -1,
            Choice::Gun => 0,
        }
    }

    #[allow(dead_code)]
    pub fn from_code(code: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Fluent message id for the display name.
    pub fn message_id(self) -> &'static str {
        match self {
            Choice::Snake => "choice-snake",
            Choice::Water => "choice-water",
            Choice::Gun => "choice-gun",
        }
    }
}

/// Result of a single round from the human player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    PlayerWin,
    CpuWin,
    Draw,
}

impl RoundOutcome {
    /// The side that took the round, `None` for a draw.
    pub fn winner(self) -> Option<Side> {
        match self {
            RoundOutcome::PlayerWin => Some(Side::Player),
            RoundOutcome::CpuWin => Some(Side::Cpu),
            RoundOutcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Cpu,
}

/// Round wins inside the running match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub player: u32,
    pub cpu: u32,
}

impl MatchScore {
    fn slot(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player,
            Side::Cpu => &mut self.cpu,
        }
    }

    /// Credit a round win and report whether that side has now taken the match.
    pub fn credit(&mut self, side: Side) -> bool {
        let slot = self.slot(side);
        *slot += 1;
        *slot >= WINS_NEEDED
    }
}

/// A round that has been played, as shown in the game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRecord {
    /// 1-based, draws included.
    pub number: u32,
    pub player: Choice,
    pub cpu: Choice,
    pub outcome: RoundOutcome,
}

/// Match wins across every run of the program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTimeStats {
    #[serde(rename = "Player_Wins", default)]
    pub player_wins: u32,
    #[serde(rename = "CPU_Wins", default)]
    pub cpu_wins: u32,
}

impl AllTimeStats {
    pub fn record(&mut self, winner: Side) {
        match winner {
            Side::Player => self.player_wins = self.player_wins.saturating_add(1),
            Side::Cpu => self.cpu_wins = self.cpu_wins.saturating_add(1),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
