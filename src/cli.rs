#![cfg(feature = "std")]
//! Terminal helpers: coordinate parsing and board rendering.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use rand::Rng;

use crate::board::Board;
use crate::common::CellState;
use crate::config::{fleet_classes, BOARD_SIZE};
use crate::game::{MatchState, ShotReport, Side};
use crate::grid::Position;
use crate::ship::{Orientation, Ship, ShipClass};

/// `A1`-style label of a cell: column letter, 1-based row.
pub fn coord_label(pos: Position) -> String {
    let col = (b'A' + pos.col() as u8) as char;
    format!("{}{}", col, pos.row() + 1)
}

/// Parse an `A1`-style coordinate. Case-insensitive.
pub fn parse_coord(input: &str) -> Option<Position> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 {
        return None;
    }
    Position::new(row - 1, col).ok()
}

/// Parse a placement like `B3 V`. Orientation defaults to horizontal.
pub fn parse_placement(input: &str) -> Option<(Position, Orientation)> {
    let mut parts = input.split_whitespace();
    let pos = parse_coord(parts.next()?)?;
    let orientation = match parts.next().and_then(|p| p.chars().next()) {
        Some('v') | Some('V') => Orientation::Vertical,
        Some('h') | Some('H') | None => Orientation::Horizontal,
        Some(_) => return None,
    };
    Some((pos, orientation))
}

fn cell_char(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Water => 'o',
        CellState::Ship => 'S',
        CellState::Hit => 'X',
        CellState::Sunk => '#',
    }
}

/// Render a board as text. With `reveal` unset, untouched ships are hidden.
pub fn render_board(board: &Board, reveal: bool) -> String {
    let mut out = String::from("   ");
    for c in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "{:2} ", r + 1);
        for c in 0..BOARD_SIZE {
            let mut state = Position::new(r, c).map(|p| board.cell(p)).unwrap_or_default();
            if !reveal {
                state = state.masked();
            }
            let _ = write!(out, " {}", cell_char(state));
        }
        out.push('\n');
    }
    out
}

/// Enemy waters on top, own fleet below.
pub fn render_player_view(state: &MatchState) -> String {
    format!(
        "Enemy waters:\n{}\nYour fleet:\n{}",
        render_board(state.opponent_board(), false),
        render_board(state.player_board(), true)
    )
}

/// One-line description of a shot.
pub fn describe_shot(report: &ShotReport) -> String {
    let who = match report.shooter {
        Side::Player => "You fire",
        Side::Opponent => "Enemy fires",
    };
    let what = match (report.repeated, report.result) {
        (true, _) => "already shot there",
        (false, CellState::Water) => "water",
        (false, CellState::Hit) => "hit!",
        (false, CellState::Sunk) => "sunk!",
        (false, _) => "?",
    };
    format!("{} at {} -> {}", who, coord_label(report.at), what)
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn place_random<G: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut G,
    class: ShipClass,
) -> io::Result<()> {
    let (r, c, o) = board.random_placement(rng, class).map_err(io::Error::other)?;
    board
        .try_place(&Ship::new(class, o), r, c)
        .map_err(io::Error::other)
}

/// Ask for every ship of the fleet in turn (e.g. `A5 H`). An empty line
/// places the current ship at random, `r` places the rest of the fleet at
/// random.
pub fn place_fleet_interactive<R, W, G>(
    input: &mut R,
    out: &mut W,
    board: &mut Board,
    rng: &mut G,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    writeln!(out, "Place your ships (e.g. A5 H). Enter for random, 'r' for the rest at random.")?;
    let mut auto = false;
    for class in fleet_classes() {
        loop {
            if auto {
                place_random(board, rng, class)?;
                break;
            }
            write!(out, "{}", render_board(board, true))?;
            let text = format!("Place {} (length {}): ", class.name(), class.size());
            let Some(line) = prompt(input, out, &text)? else {
                // Input closed: finish the fleet on our own.
                auto = true;
                continue;
            };
            if line.is_empty() {
                place_random(board, rng, class)?;
                break;
            }
            if line.eq_ignore_ascii_case("r") {
                auto = true;
                continue;
            }
            match parse_placement(&line) {
                Some((pos, orientation)) => {
                    match board.try_place(&Ship::new(class, orientation), pos.row(), pos.col()) {
                        Ok(()) => break,
                        Err(e) => writeln!(out, "Error: {}", e)?,
                    }
                }
                None => writeln!(out, "Invalid input")?,
            }
        }
    }
    Ok(())
}

/// Ask for a target until a valid coordinate is entered. `None` when the
/// input is closed or the player types `q`.
pub fn read_target<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<Position>> {
    loop {
        let Some(line) = prompt(input, out, "Enter target (e.g. B7, q to quit): ")? else {
            return Ok(None);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match parse_coord(&line) {
            Some(pos) => return Ok(Some(pos)),
            None => writeln!(out, "Invalid coordinate")?,
        }
    }
}
