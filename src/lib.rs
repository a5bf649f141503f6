#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod board;
mod common;
mod config;
mod game;
mod grid;
mod ship;
mod targeting;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod persistence;
#[cfg(feature = "std")]
mod profile;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod storage;

pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::*;
pub use ship::*;
pub use targeting::*;

#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with};
#[cfg(feature = "std")]
pub use persistence::{LoadError, LoadErrorKind, SaveError, SaveErrorKind, SaveManager};
#[cfg(feature = "std")]
pub use profile::{PlayerProfile, TIMESTAMP_FORMAT};
#[cfg(feature = "std")]
pub use session::Session;
