//! Match state and the turn controller.

use alloc::vec::Vec;
use core::fmt;

use chrono::NaiveDateTime;
use rand::Rng;
use uuid::Uuid;

use crate::board::Board;
use crate::common::{BoardError, CellState};
use crate::grid::Position;
use crate::targeting::{Targeter, TargetingState};

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The human.
    #[cfg_attr(feature = "std", serde(rename = "PLAYER"))]
    Player,
    /// The computer.
    #[cfg_attr(feature = "std", serde(rename = "ENEMY"))]
    Opponent,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Persisted name of the side.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Opponent => "ENEMY",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerTurn,
    OpponentTurn,
    GameOver { winner: Side },
}

/// Shot counters of one side. Accuracy is derived from them on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotStats {
    pub shots: u32,
    pub hits: u32,
    pub ships_sunk: u32,
}

impl ShotStats {
    /// Hits per shot as a percentage, `0.0` before the first shot.
    pub fn accuracy(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.hits as f64 / self.shots as f64 * 100.0
    }

    fn record(&mut self, result: CellState) {
        self.shots += 1;
        match result {
            CellState::Hit => self.hits += 1,
            CellState::Sunk => {
                self.hits += 1;
                self.ships_sunk += 1;
            }
            _ => {}
        }
    }
}

/// Outcome of one resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub shooter: Side,
    pub at: Position,
    pub result: CellState,
    /// The cell had been shot before; nothing changed.
    pub repeated: bool,
    /// Phase after the shot.
    pub phase: Phase,
}

/// Errors returned by the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The match is over; no further shots are accepted.
    GameOver,
    /// It is the other side's turn.
    NotYourTurn { current: Side },
    /// Every cell of the target board has been shot.
    NoTargetAvailable,
    /// A decoded match breaks a semantic invariant.
    InvalidState(&'static str),
    Board(BoardError),
}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        GameError::Board(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameOver => write!(f, "The match is already over"),
            GameError::NotYourTurn { current } => {
                write!(f, "Not your turn: {} is to play", current)
            }
            GameError::NoTargetAvailable => write!(f, "No unshot cell left to fire at"),
            GameError::InvalidState(reason) => write!(f, "Invalid match state: {}", reason),
            GameError::Board(e) => write!(f, "Board error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// Serializable state of a whole match: both boards, whose turn it is,
/// counters, and the opponent's targeting memory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    player_board: Board,
    opponent_board: Board,
    current_turn: Side,
    game_over: bool,
    winner: Option<Side>,
    player_stats: ShotStats,
    opponent_stats: ShotStats,
    last_saved: Option<NaiveDateTime>,
    match_id: Uuid,
    targeting: Targeter,
}

impl MatchState {
    /// Start a match from two boards whose ships are in place. The player
    /// always shoots first.
    pub fn new<R: Rng + ?Sized>(player_board: Board, opponent_board: Board, rng: &mut R) -> Self {
        let match_id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
        MatchState {
            player_board,
            opponent_board,
            current_turn: Side::Player,
            game_over: false,
            winner: None,
            player_stats: ShotStats::default(),
            opponent_stats: ShotStats::default(),
            last_saved: None,
            match_id,
            targeting: Targeter::new(),
        }
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn opponent_board(&self) -> &Board {
        &self.opponent_board
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn is_player_turn(&self) -> bool {
        !self.game_over && self.current_turn == Side::Player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn phase(&self) -> Phase {
        match (self.game_over, self.winner, self.current_turn) {
            (true, Some(winner), _) => Phase::GameOver { winner },
            // `validate` rejects this combination on load.
            (true, None, side) => Phase::GameOver { winner: side },
            (false, _, Side::Player) => Phase::PlayerTurn,
            (false, _, Side::Opponent) => Phase::OpponentTurn,
        }
    }

    pub fn player_stats(&self) -> ShotStats {
        self.player_stats
    }

    pub fn opponent_stats(&self) -> ShotStats {
        self.opponent_stats
    }

    pub fn player_accuracy(&self) -> f64 {
        self.player_stats.accuracy()
    }

    pub fn opponent_accuracy(&self) -> f64 {
        self.opponent_stats.accuracy()
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    pub fn last_saved(&self) -> Option<NaiveDateTime> {
        self.last_saved
    }

    pub(crate) fn touch_saved(&mut self, now: NaiveDateTime) {
        self.last_saved = Some(now);
    }

    pub fn targeting(&self) -> TargetingState {
        self.targeting.state()
    }

    /// The human fires at the opponent's board.
    ///
    /// A repeat shot at an already resolved cell is reported with
    /// `repeated = true` and changes nothing, not even the counters.
    pub fn player_fire(&mut self, at: Position) -> Result<ShotReport, GameError> {
        self.ensure_turn(Side::Player)?;
        self.resolve(Side::Player, at)
    }

    /// The opponent takes a single shot chosen by its targeting engine.
    pub fn opponent_step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<ShotReport, GameError> {
        self.ensure_turn(Side::Opponent)?;
        let at = self
            .targeting
            .next_target(&self.player_board, rng)
            .ok_or(GameError::NoTargetAvailable)?;
        let report = self.resolve(Side::Opponent, at)?;
        self.targeting.observe(at, report.result);
        Ok(report)
    }

    /// Play the opponent's whole turn: it keeps shooting after hits and
    /// sinkings until it misses or wins.
    pub fn opponent_turn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<ShotReport>, GameError> {
        self.ensure_turn(Side::Opponent)?;
        let mut reports = Vec::new();
        while self.phase() == Phase::OpponentTurn {
            reports.push(self.opponent_step(rng)?);
        }
        Ok(reports)
    }

    /// Semantic checks on top of a successful decode.
    pub fn validate(&self) -> Result<(), GameError> {
        self.player_board
            .validate()
            .map_err(|_| GameError::InvalidState("player board is inconsistent"))?;
        self.opponent_board
            .validate()
            .map_err(|_| GameError::InvalidState("opponent board is inconsistent"))?;
        if self.game_over != self.winner.is_some() {
            return Err(GameError::InvalidState("game over flag disagrees with winner"));
        }
        match self.winner {
            Some(Side::Player) if !self.opponent_board.all_sunk() => {
                return Err(GameError::InvalidState("player won with enemy ships afloat"));
            }
            Some(Side::Opponent) if !self.player_board.all_sunk() => {
                return Err(GameError::InvalidState("opponent won with player ships afloat"));
            }
            _ => {}
        }
        for stats in [self.player_stats, self.opponent_stats] {
            if stats.hits > stats.shots || stats.ships_sunk > stats.hits {
                return Err(GameError::InvalidState("counters are inconsistent"));
            }
        }
        if !self.targeting.state().is_consistent() {
            return Err(GameError::InvalidState("targeting memory is inconsistent"));
        }
        Ok(())
    }

    fn ensure_turn(&self, side: Side) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        if self.current_turn != side {
            return Err(GameError::NotYourTurn {
                current: self.current_turn,
            });
        }
        Ok(())
    }

    fn resolve(&mut self, shooter: Side, at: Position) -> Result<ShotReport, GameError> {
        let target = match shooter {
            Side::Player => &mut self.opponent_board,
            Side::Opponent => &mut self.player_board,
        };
        let repeated = target.already_shot(at);
        let result = target.fire_at(at)?;
        let defeated = target.all_sunk();

        if !repeated {
            match shooter {
                Side::Player => self.player_stats.record(result),
                Side::Opponent => self.opponent_stats.record(result),
            }
            if defeated {
                self.game_over = true;
                self.winner = Some(shooter);
            } else if result == CellState::Water {
                self.current_turn = shooter.other();
            }
        }

        Ok(ShotReport {
            shooter,
            at,
            result,
            repeated,
            phase: self.phase(),
        })
    }
}
