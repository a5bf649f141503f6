#![cfg(feature = "std")]
//! A running match: state, profile and saves behind one owner.
//!
//! Every resolved shot is auto-saved. The opponent's turn runs on a tokio
//! task that owns the session for the duration of the turn and hands it back
//! through the join handle, so exactly one side mutates the boards at a time.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::board::Board;
use crate::common::BoardError;
use crate::config::OPPONENT_THINK_DELAY;
use crate::game::{GameError, MatchState, Phase, ShotReport};
use crate::grid::Position;
use crate::persistence::{LoadError, SaveError, SaveManager};
use crate::profile::PlayerProfile;
use crate::storage::{FsStorage, Storage};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Result of an opponent turn run on a worker task, with the session handed
/// back.
pub type TurnOutcome<S> = (Session<S>, Result<Vec<ShotReport>, GameError>);

pub struct Session<S: Storage = FsStorage> {
    state: MatchState,
    profile: PlayerProfile,
    saves: SaveManager<S>,
    rng: SmallRng,
    think_delay: Duration,
    events: Option<mpsc::UnboundedSender<ShotReport>>,
    result_recorded: bool,
}

impl<S: Storage + 'static> Session<S> {
    /// Wrap an existing match.
    pub fn new(
        state: MatchState,
        profile: PlayerProfile,
        saves: SaveManager<S>,
        rng: SmallRng,
    ) -> Self {
        let result_recorded = state.is_game_over();
        Session {
            state,
            profile,
            saves,
            rng,
            think_delay: OPPONENT_THINK_DELAY,
            events: None,
            result_recorded,
        }
    }

    /// Start a new match against a randomly placed enemy fleet.
    pub fn start(
        player_board: Board,
        profile: PlayerProfile,
        saves: SaveManager<S>,
        mut rng: SmallRng,
    ) -> Result<Self, BoardError> {
        let mut opponent_board = Board::new();
        opponent_board.place_fleet_randomly(&mut rng)?;
        let state = MatchState::new(player_board, opponent_board, &mut rng);
        info!("match {} started", state.match_id());
        let mut session = Self::new(state, profile, saves, rng);
        session.auto_save();
        Ok(session)
    }

    /// Pick up the saved match and profile.
    pub fn resume(saves: SaveManager<S>, rng: SmallRng) -> Result<Self, LoadError> {
        let state = saves.load_match()?;
        let profile = saves.load_profile(now())?;
        info!("resuming match {} ({:?})", state.match_id(), state.phase());
        Ok(Self::new(state, profile, saves, rng))
    }

    /// Pause before each opponent shot.
    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay = delay;
        self
    }

    /// Receive every resolved shot as it happens, including those fired on
    /// the worker task.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ShotReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn saves(&self) -> &SaveManager<S> {
        &self.saves
    }

    /// Rename the player. Stored with the next save.
    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.profile.nickname = nickname.into();
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The human fires at (`row`, `col`) on the enemy board.
    pub fn player_fire(&mut self, row: usize, col: usize) -> Result<ShotReport, GameError> {
        let report = self.state.player_fire(Position::new(row, col)?)?;
        self.after_shot(report);
        Ok(report)
    }

    /// Play the opponent's turn here, pausing before each shot. Returns
    /// immediately with no shots if it is not the opponent's turn.
    pub async fn play_opponent_turn(&mut self) -> Result<Vec<ShotReport>, GameError> {
        let mut reports = Vec::new();
        while self.state.phase() == Phase::OpponentTurn {
            tokio::time::sleep(self.think_delay).await;
            let report = self.state.opponent_step(&mut self.rng)?;
            debug!("opponent fired at {} -> {:?}", report.at, report.result);
            self.after_shot(report);
            reports.push(report);
        }
        Ok(reports)
    }

    /// Move the session onto a worker task for the opponent's turn.
    pub fn spawn_opponent_turn(mut self) -> JoinHandle<TurnOutcome<S>> {
        tokio::spawn(async move {
            let result = self.play_opponent_turn().await;
            (self, result)
        })
    }

    /// Save right away, reporting failures.
    pub fn save(&mut self) -> Result<(), SaveError> {
        self.saves.save(&mut self.state, &mut self.profile, now())
    }

    /// Drop the saved match, keeping the profile.
    pub fn discard_save(&mut self) {
        self.saves.delete_saved_match();
    }

    fn after_shot(&mut self, report: ShotReport) {
        if !report.repeated {
            if self.state.is_game_over() && !self.result_recorded {
                self.profile.record_result(&self.state);
                self.result_recorded = true;
                info!("match {} won by {}", self.state.match_id(), report.shooter);
            }
            self.auto_save();
        }
        if let Some(events) = &self.events {
            // The receiver going away only means nobody is watching.
            let _ = events.send(report);
        }
    }

    fn auto_save(&mut self) {
        if let Err(e) = self.save() {
            warn!("auto-save failed: {}", e);
        }
    }
}
