#![cfg(feature = "std")]
//! Player profile and its plain `KEY=VALUE` text record.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::config::DEFAULT_NICKNAME;
use crate::game::{MatchState, Side};

/// Timestamp layout used in the text record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Nickname and lifetime statistics of the human player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub nickname: String,
    /// Enemy ships the player has sunk.
    pub player_ships_destroyed: u32,
    /// Player ships the enemy has sunk.
    pub enemy_ships_destroyed: u32,
    pub last_played: NaiveDateTime,
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl PlayerProfile {
    pub fn new(nickname: impl Into<String>, now: NaiveDateTime) -> Self {
        PlayerProfile {
            nickname: nickname.into(),
            player_ships_destroyed: 0,
            enemy_ships_destroyed: 0,
            last_played: now,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
        }
    }

    /// Fresh profile for a first run.
    pub fn first_run(now: NaiveDateTime) -> Self {
        Self::new(DEFAULT_NICKNAME, now)
    }

    pub fn touch(&mut self, now: NaiveDateTime) {
        self.last_played = now;
    }

    pub fn register_win(&mut self) {
        self.games_won += 1;
        self.games_played += 1;
    }

    pub fn register_loss(&mut self) {
        self.games_lost += 1;
        self.games_played += 1;
    }

    /// Won games as a percentage of games played, `0.0` before the first.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.games_won as f64 / self.games_played as f64 * 100.0
    }

    /// Fold a finished match into the lifetime statistics. Does nothing for
    /// a match still in progress.
    pub fn record_result(&mut self, state: &MatchState) {
        let Some(winner) = state.winner() else {
            return;
        };
        self.player_ships_destroyed += state.player_stats().ships_sunk;
        self.enemy_ships_destroyed += state.opponent_stats().ships_sunk;
        match winner {
            Side::Player => self.register_win(),
            Side::Opponent => self.register_loss(),
        }
    }

    /// Render the profile as one `KEY=VALUE` pair per line.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "NICKNAME={}", self.nickname);
        let _ = writeln!(out, "PLAYER_SHIPS_DESTROYED={}", self.player_ships_destroyed);
        let _ = writeln!(out, "ENEMY_SHIPS_DESTROYED={}", self.enemy_ships_destroyed);
        let _ = writeln!(out, "LAST_PLAYED={}", self.last_played.format(TIMESTAMP_FORMAT));
        let _ = writeln!(out, "GAMES_PLAYED={}", self.games_played);
        let _ = writeln!(out, "GAMES_WON={}", self.games_won);
        let _ = writeln!(out, "GAMES_LOST={}", self.games_lost);
        out
    }

    /// Parse a text record. Fields missing from the record keep their first
    /// run defaults, unknown keys are ignored, and malformed lines are
    /// skipped with a warning.
    pub fn from_plain_text(text: &str, now: NaiveDateTime) -> Self {
        let mut profile = Self::first_run(now);
        for line in text.lines().map(str::trim) {
            let Some((key, value)) = line.split_once('=') else {
                if !line.is_empty() {
                    warn!("skipping profile line without '=': {:?}", line);
                }
                continue;
            };
            if let Err(err) = profile.apply(key.trim(), value.trim()) {
                warn!("skipping malformed profile line {:?}: {}", line, err);
            }
        }
        profile
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        let count = |v: &str| v.parse::<u32>().map_err(|e| e.to_string());
        match key {
            "NICKNAME" => self.nickname = value.to_string(),
            "PLAYER_SHIPS_DESTROYED" => self.player_ships_destroyed = count(value)?,
            "ENEMY_SHIPS_DESTROYED" => self.enemy_ships_destroyed = count(value)?,
            "LAST_PLAYED" => {
                self.last_played = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
                    .map_err(|e| e.to_string())?
            }
            "GAMES_PLAYED" => self.games_played = count(value)?,
            "GAMES_WON" => self.games_won = count(value)?,
            "GAMES_LOST" => self.games_lost = count(value)?,
            other => debug!("ignoring unknown profile key {:?}", other),
        }
        Ok(())
    }
}
