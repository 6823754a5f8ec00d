use thiserror::Error;

use super::rules;
use super::types::{AllTimeStats, Choice, MatchScore, RoundOutcome, RoundRecord, Side};
use crate::storage::StatsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    InProgress,
    Complete(Side),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("the match is already over, start a new one")]
    AlreadyComplete,
}

/// One best-of-five match: first side to three round wins takes it.
#[derive(Debug, Clone)]
pub struct Match {
    score: MatchScore,
    round: u32,
    phase: MatchPhase,
}

impl Match {
    pub fn new() -> Self {
        Self {
            score: MatchScore::default(),
            round: 0,
            phase: MatchPhase::InProgress,
        }
    }

    pub fn score(&self) -> MatchScore {
        self.score
    }

    /// Rounds played so far, draws included.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, MatchPhase::Complete(_))
    }

    /// Apply one round's outcome. Draws count as a round but move no score.
    pub fn record(&mut self, outcome: RoundOutcome) -> Result<MatchPhase, MatchError> {
        if self.is_complete() {
            return Err(MatchError::AlreadyComplete);
        }
        self.round += 1;
        if let Some(side) = outcome.winner() {
            if self.score.credit(side) {
                self.phase = MatchPhase::Complete(side);
            }
        }
        Ok(self.phase)
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

/// State changes the UI listens for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    MatchStarted,
    RoundPlayed {
        record: RoundRecord,
        score: MatchScore,
    },
    MatchCompleted {
        winner: Side,
        stats: AllTimeStats,
    },
    StatsChanged(AllTimeStats),
}

type Observer = Box<dyn Fn(&GameEvent)>;

/// The running match plus the all-time record, backed by a store.
pub struct Game<S: StatsStore> {
    current: Match,
    stats: AllTimeStats,
    store: S,
    observers: Vec<Observer>,
}

impl<S: StatsStore> Game<S> {
    /// Load the record (zero on any failure) and start a fresh match.
    pub fn new(store: S) -> Self {
        let stats = store.load().unwrap_or_else(|e| {
            log::warn!("could not load statistics, starting from zero: {e}");
            AllTimeStats::default()
        });
        log::info!(
            "all-time record: player {} - {} cpu",
            stats.player_wins,
            stats.cpu_wins
        );
        Self {
            current: Match::new(),
            stats,
            store,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Fn(&GameEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn current(&self) -> &Match {
        &self.current
    }

    pub fn stats(&self) -> AllTimeStats {
        self.stats
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Throw away the running match and begin another.
    pub fn new_match(&mut self) {
        self.current = Match::new();
        log::info!("new match started");
        self.emit(&GameEvent::MatchStarted);
    }

    /// Resolve and record a round between the two picks.
    pub fn play_round(&mut self, player: Choice, cpu: Choice) -> Result<RoundRecord, MatchError> {
        let outcome = rules::resolve(player, cpu);
        let phase = self.current.record(outcome)?;
        let record = RoundRecord {
            number: self.current.round(),
            player,
            cpu,
            outcome,
        };
        self.after_round(record, phase);
        Ok(record)
    }

    /// Play a pair of picks that produces `outcome`.
    #[cfg(test)]
    pub fn record_outcome(&mut self, outcome: RoundOutcome) -> Result<RoundRecord, MatchError> {
        let (winner, loser) = rules::WINNING_COMBOS[0];
        let (player, cpu) = match outcome {
            RoundOutcome::PlayerWin => (winner, loser),
            RoundOutcome::CpuWin => (loser, winner),
            RoundOutcome::Draw => (winner, winner),
        };
        self.play_round(player, cpu)
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        self.persist();
        self.emit(&GameEvent::StatsChanged(self.stats));
    }

    /// Final save before the window goes away.
    pub fn shutdown(&self) {
        self.persist();
    }

    fn after_round(&mut self, record: RoundRecord, phase: MatchPhase) {
        log::debug!(
            "round {}: ({}, {}) -> {:?}",
            record.number,
            record.player.code(),
            record.cpu.code(),
            record.outcome
        );
        self.emit(&GameEvent::RoundPlayed {
            record,
            score: self.current.score(),
        });

        if let MatchPhase::Complete(winner) = phase {
            self.stats.record(winner);
            log::info!("match won by {winner:?} after {} rounds", record.number);
            self.persist();
            self.emit(&GameEvent::MatchCompleted {
                winner,
                stats: self.stats,
            });
        }
    }

    // Best-effort: a failed save never interrupts play.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.stats) {
            log::warn!("could not save statistics: {e}");
        }
    }

    fn emit(&self, event: &GameEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStore;
    use RoundOutcome::*;

    #[test]
    fn fresh_match_is_zeroed_and_in_progress() {
        let m = Match::new();
        assert_eq!(m.score(), MatchScore { player: 0, cpu: 0 });
        assert_eq!(m.round(), 0);
        assert_eq!(m.phase(), MatchPhase::InProgress);

        let game = Game::new(MemoryStore::default());
        assert_eq!(game.current().score(), MatchScore::default());
        assert!(!game.current().is_complete());
    }

    #[test]
    fn draws_advance_the_round_only() {
        let mut m = Match::new();
        assert_eq!(m.record(Draw), Ok(MatchPhase::InProgress));
        assert_eq!(m.record(Draw), Ok(MatchPhase::InProgress));
        assert_eq!(m.round(), 2);
        assert_eq!(m.score(), MatchScore::default());
    }

    #[test]
    fn player_takes_match_three_to_one() {
        let store = MemoryStore::with(AllTimeStats {
            player_wins: 4,
            cpu_wins: 2,
        });
        let mut game = Game::new(store);
        for outcome in [PlayerWin, PlayerWin, CpuWin, PlayerWin] {
            game.record_outcome(outcome).unwrap();
        }

        assert_eq!(game.current().score(), MatchScore { player: 3, cpu: 1 });
        assert_eq!(game.current().phase(), MatchPhase::Complete(Side::Player));
        assert_eq!(game.current().round(), 4);
        assert_eq!(
            game.stats(),
            AllTimeStats {
                player_wins: 5,
                cpu_wins: 2
            }
        );
        assert_eq!(game.store().saves.get(), 1);
        assert_eq!(game.store().stats.get().player_wins, 5);
    }

    #[test]
    fn cpu_sweep_counts_for_cpu() {
        let mut game = Game::new(MemoryStore::default());
        for _ in 0..3 {
            game.record_outcome(CpuWin).unwrap();
        }
        assert_eq!(game.current().phase(), MatchPhase::Complete(Side::Cpu));
        assert_eq!(game.stats().cpu_wins, 1);
        assert_eq!(game.stats().player_wins, 0);
    }

    #[test]
    fn completed_match_rejects_more_rounds() {
        let mut game = Game::new(MemoryStore::default());
        for _ in 0..3 {
            game.record_outcome(PlayerWin).unwrap();
        }
        assert_eq!(
            game.play_round(Choice::Snake, Choice::Water),
            Err(MatchError::AlreadyComplete)
        );
        assert_eq!(game.current().round(), 3);
        assert_eq!(game.stats().player_wins, 1);

        game.new_match();
        assert_eq!(game.current().phase(), MatchPhase::InProgress);
        assert_eq!(game.current().round(), 0);
        assert_eq!(game.stats().player_wins, 1);
    }

    #[test]
    fn play_round_keeps_the_choices() {
        let mut game = Game::new(MemoryStore::default());
        let record = game.play_round(Choice::Gun, Choice::Snake).unwrap();
        assert_eq!(record.number, 1);
        assert_eq!(record.outcome, PlayerWin);
        assert_eq!((record.player, record.cpu), (Choice::Gun, Choice::Snake));
    }

    #[test]
    fn shutdown_saves_the_current_record() {
        let mut game = Game::new(MemoryStore::with(AllTimeStats {
            player_wins: 2,
            cpu_wins: 1,
        }));
        game.shutdown();
        assert_eq!(game.store().saves.get(), 1);
        assert_eq!(
            game.store().stats.get(),
            AllTimeStats {
                player_wins: 2,
                cpu_wins: 1
            }
        );

        for _ in 0..3 {
            game.record_outcome(CpuWin).unwrap();
        }
        game.shutdown();
        assert_eq!(game.store().saves.get(), 3);
        assert_eq!(
            game.store().stats.get(),
            AllTimeStats {
                player_wins: 2,
                cpu_wins: 2
            }
        );
    }

    #[test]
    fn broken_store_falls_back_to_zero_and_keeps_playing() {
        let mut game = Game::new(MemoryStore::broken());
        assert_eq!(game.stats(), AllTimeStats::default());
        for _ in 0..3 {
            game.record_outcome(CpuWin).unwrap();
        }
        assert_eq!(game.stats().cpu_wins, 1);
        game.shutdown();
    }

    #[test]
    fn observers_see_rounds_then_completion() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::new(MemoryStore::default());
        {
            let seen = seen.clone();
            game.subscribe(move |e| seen.borrow_mut().push(e.clone()));
        }
        game.record_outcome(Draw).unwrap();
        game.record_outcome(PlayerWin).unwrap();
        game.record_outcome(PlayerWin).unwrap();
        game.record_outcome(PlayerWin).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert!(matches!(
            seen[0],
            GameEvent::RoundPlayed {
                record: RoundRecord {
                    number: 1,
                    outcome: Draw,
                    ..
                },
                ..
            }
        ));
        assert_eq!(
            seen[4],
            GameEvent::MatchCompleted {
                winner: Side::Player,
                stats: AllTimeStats {
                    player_wins: 1,
                    cpu_wins: 0
                }
            }
        );
    }

    #[test]
    fn reset_statistics_saves_and_notifies() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::new(MemoryStore::with(AllTimeStats {
            player_wins: 9,
            cpu_wins: 9,
        }));
        {
            let seen = seen.clone();
            game.subscribe(move |e| seen.borrow_mut().push(e.clone()));
        }
        game.reset_statistics();
        assert_eq!(game.stats(), AllTimeStats::default());
        assert_eq!(game.store().stats.get(), AllTimeStats::default());
        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::StatsChanged(AllTimeStats::default())]
        );
    }
}
