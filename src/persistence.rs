#![cfg(feature = "std")]
//! Save and restore a match and the player profile.
//!
//! The match is stored as a framed bincode blob:
//!
//! | bytes | content                              |
//! |-------|--------------------------------------|
//! | 4     | magic `BSHP`                         |
//! | 2     | format version, little endian        |
//! | 8     | payload length, little endian        |
//! | 8     | FNV-1a checksum of the payload       |
//! | n     | bincode-encoded [`MatchState`]       |
//!
//! The profile is a plain `KEY=VALUE` text file, see [`PlayerProfile`].

use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};
use thiserror::Error;

use crate::config::{MATCH_FILE, PROFILE_FILE, SAVE_FORMAT_VERSION};
use crate::game::{GameError, MatchState};
use crate::profile::PlayerProfile;
use crate::storage::{FsStorage, Storage};

const MAGIC: &[u8; 4] = b"BSHP";
const HEADER_LEN: usize = 4 + 2 + 8 + 8;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Why a save failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SaveErrorKind {
    #[error("file not writable")]
    NotWritable,
    #[error("disk full")]
    DiskFull,
    #[error("serialization error")]
    Serialization,
    #[error("permission denied")]
    PermissionDenied,
}

/// A failed save. The previous save, if any, is still intact.
#[derive(Debug, Error)]
#[error("failed to save {}: {kind}", .path.display())]
pub struct SaveError {
    kind: SaveErrorKind,
    path: PathBuf,
    #[source]
    source: Option<BoxError>,
}

impl SaveError {
    pub fn kind(&self) -> SaveErrorKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(path: PathBuf, err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => SaveErrorKind::PermissionDenied,
            io::ErrorKind::StorageFull => SaveErrorKind::DiskFull,
            _ => SaveErrorKind::NotWritable,
        };
        SaveError {
            kind,
            path,
            source: Some(Box::new(err) as BoxError),
        }
    }
}

/// Why a load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    #[error("no saved game")]
    NotFound,
    #[error("save file is corrupted")]
    Corrupted,
    #[error("save file could not be decoded")]
    Deserialization,
    #[error("not a save file")]
    InvalidFormat,
    #[error("save format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u16, expected: u16 },
    #[error("saved game is invalid: {0}")]
    InvalidState(&'static str),
}

/// A failed load.
#[derive(Debug, Error)]
#[error("failed to load {}: {kind}", .path.display())]
pub struct LoadError {
    kind: LoadErrorKind,
    path: PathBuf,
    #[source]
    source: Option<BoxError>,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn new(kind: LoadErrorKind, path: PathBuf) -> Self {
        LoadError {
            kind,
            path,
            source: None,
        }
    }

    fn with_source(kind: LoadErrorKind, path: PathBuf, source: impl Into<BoxError>) -> Self {
        LoadError {
            kind,
            path,
            source: Some(source.into()),
        }
    }
}

/// FNV-1a, 64 bit.
fn checksum(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Encode a match into the framed save format.
pub fn encode_match(state: &MatchState) -> Result<Vec<u8>, bincode::Error> {
    let payload = bincode::serialize(state)?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&SAVE_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&checksum(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode and validate a framed match. Errors carry no path; callers attach
/// one.
pub fn decode_match(bytes: &[u8]) -> Result<MatchState, (LoadErrorKind, Option<BoxError>)> {
    if bytes.len() < HEADER_LEN {
        // A cut-off save still starts with (part of) the magic.
        let prefix = bytes.len().min(MAGIC.len());
        let kind = if !bytes.is_empty() && bytes[..prefix] == MAGIC[..prefix] {
            LoadErrorKind::Corrupted
        } else {
            LoadErrorKind::InvalidFormat
        };
        return Err((kind, None));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);
    if &header[0..4] != MAGIC {
        return Err((LoadErrorKind::InvalidFormat, None));
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != SAVE_FORMAT_VERSION {
        return Err((
            LoadErrorKind::VersionMismatch {
                found: version,
                expected: SAVE_FORMAT_VERSION,
            },
            None,
        ));
    }
    let mut word = [0u8; 8];
    word.copy_from_slice(&header[6..14]);
    let len = u64::from_le_bytes(word);
    word.copy_from_slice(&header[14..22]);
    let sum = u64::from_le_bytes(word);
    if payload.len() as u64 != len || checksum(payload) != sum {
        return Err((LoadErrorKind::Corrupted, None));
    }

    let state: MatchState = bincode::deserialize(payload).map_err(|err| {
        let kind = match *err {
            bincode::ErrorKind::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                LoadErrorKind::Corrupted
            }
            _ => LoadErrorKind::Deserialization,
        };
        (kind, Some(err as BoxError))
    })?;

    state.validate().map_err(|err| match err {
        GameError::InvalidState(reason) => (LoadErrorKind::InvalidState(reason), None),
        other => (
            LoadErrorKind::InvalidState("match failed validation"),
            Some(Box::new(other) as BoxError),
        ),
    })?;
    Ok(state)
}

/// Reads and writes the save files through a [`Storage`] backend.
pub struct SaveManager<S: Storage = FsStorage> {
    storage: S,
}

impl SaveManager<FsStorage> {
    /// Save files under `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self::new(FsStorage::new(dir)?))
    }
}

impl<S: Storage> SaveManager<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Refresh both timestamps and write the match, then the profile.
    pub fn save(
        &mut self,
        state: &mut MatchState,
        profile: &mut PlayerProfile,
        now: NaiveDateTime,
    ) -> Result<(), SaveError> {
        state.touch_saved(now);
        profile.touch(now);
        self.save_match(state)?;
        self.save_profile(profile)?;
        info!("game saved");
        Ok(())
    }

    pub fn save_match(&mut self, state: &MatchState) -> Result<(), SaveError> {
        let path = self.storage.locate(MATCH_FILE);
        let bytes = encode_match(state).map_err(|e| SaveError {
            kind: SaveErrorKind::Serialization,
            path: path.clone(),
            source: Some(e as BoxError),
        })?;
        self.storage
            .write(MATCH_FILE, &bytes)
            .map_err(|e| SaveError::io(path.clone(), e))?;
        info!("match state saved to {}", path.display());
        Ok(())
    }

    pub fn save_profile(&mut self, profile: &PlayerProfile) -> Result<(), SaveError> {
        let path = self.storage.locate(PROFILE_FILE);
        self.storage
            .write(PROFILE_FILE, profile.to_plain_text().as_bytes())
            .map_err(|e| SaveError::io(path.clone(), e))?;
        info!("player profile saved to {}", path.display());
        Ok(())
    }

    /// Load the saved match. Fails with [`LoadErrorKind::NotFound`] when
    /// there is none.
    pub fn load_match(&self) -> Result<MatchState, LoadError> {
        let path = self.storage.locate(MATCH_FILE);
        if !self.storage.exists(MATCH_FILE) {
            return Err(LoadError::new(LoadErrorKind::NotFound, path));
        }
        let bytes = self.storage.read(MATCH_FILE).map_err(|e| {
            let kind = if e.kind() == io::ErrorKind::NotFound {
                LoadErrorKind::NotFound
            } else {
                LoadErrorKind::Deserialization
            };
            LoadError::with_source(kind, path.clone(), e)
        })?;
        let state = decode_match(&bytes).map_err(|(kind, source)| LoadError {
            kind,
            path: path.clone(),
            source,
        })?;
        info!("match {} loaded", state.match_id());
        Ok(state)
    }

    /// Load the profile, or a first-run profile when none was saved yet.
    pub fn load_profile(&self, now: NaiveDateTime) -> Result<PlayerProfile, LoadError> {
        if !self.storage.exists(PROFILE_FILE) {
            info!("no player profile yet, starting a new one");
            return Ok(PlayerProfile::first_run(now));
        }
        let path = self.storage.locate(PROFILE_FILE);
        let bytes = self
            .storage
            .read(PROFILE_FILE)
            .map_err(|e| LoadError::with_source(LoadErrorKind::Corrupted, path.clone(), e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| LoadError::with_source(LoadErrorKind::InvalidFormat, path, e))?;
        Ok(PlayerProfile::from_plain_text(&text, now))
    }

    pub fn has_saved_match(&self) -> bool {
        self.storage.exists(MATCH_FILE)
    }

    pub fn has_profile(&self) -> bool {
        self.storage.exists(PROFILE_FILE)
    }

    /// Delete the saved match. Failures are logged, not returned.
    pub fn delete_saved_match(&mut self) {
        match self.storage.remove(MATCH_FILE) {
            Ok(()) => info!("saved match deleted"),
            Err(e) => warn!("could not delete saved match: {}", e),
        }
    }

    /// Delete the saved match and the profile. Failures are logged.
    pub fn delete_all(&mut self) {
        self.delete_saved_match();
        match self.storage.remove(PROFILE_FILE) {
            Ok(()) => info!("all saved data deleted"),
            Err(e) => warn!("could not delete player profile: {}", e),
        }
    }

    /// One-line summary of the saved match, `None` when there is none.
    pub fn saved_match_info(&self) -> Result<Option<String>, LoadError> {
        if !self.has_saved_match() {
            return Ok(None);
        }
        let state = self.load_match()?;
        let saved = state
            .last_saved()
            .map(|t| t.format(crate::profile::TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "never".to_string());
        Ok(Some(format!(
            "match {} | last saved {} | turn {}",
            state.match_id(),
            saved,
            state.current_turn()
        )))
    }
}
