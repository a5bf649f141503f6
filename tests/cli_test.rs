use std::io::Cursor;

use broadside::cli::{
    coord_label, describe_shot, parse_coord, parse_placement, place_fleet_interactive, read_target,
    render_board,
};
use broadside::{Board, CellState, Orientation, Phase, Position, ShipClass, ShotReport, Side, NUM_SHIPS};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

#[test]
fn test_parse_coord() {
    assert_eq!(parse_coord("A1"), Some(pos(0, 0)));
    assert_eq!(parse_coord("j10"), Some(pos(9, 9)));
    assert_eq!(parse_coord(" c4 "), Some(pos(3, 2)));
    assert_eq!(parse_coord("K1"), None);
    assert_eq!(parse_coord("A0"), None);
    assert_eq!(parse_coord("A11"), None);
    assert_eq!(parse_coord("5A"), None);
    assert_eq!(parse_coord(""), None);
}

#[test]
fn test_coord_label_matches_parse() {
    for p in Position::all() {
        assert_eq!(parse_coord(&coord_label(p)), Some(p));
    }
}

#[test]
fn test_parse_placement() {
    assert_eq!(parse_placement("B3 V"), Some((pos(2, 1), Orientation::Vertical)));
    assert_eq!(parse_placement("b3 h"), Some((pos(2, 1), Orientation::Horizontal)));
    assert_eq!(parse_placement("B3"), Some((pos(2, 1), Orientation::Horizontal)));
    assert_eq!(parse_placement("B3 X"), None);
}

#[test]
fn test_render_hides_ships_unless_revealed() {
    let mut board = Board::new();
    board.place_fleet_randomly(&mut SmallRng::seed_from_u64(1)).unwrap();
    board.fire(0, 0).unwrap();

    let hidden = render_board(&board, false);
    let shown = render_board(&board, true);
    assert!(!hidden.contains('S'));
    assert!(shown.contains('S'));
    assert_eq!(hidden.lines().count(), 11);
    assert!(hidden.starts_with("    A B C"));
}

#[test]
fn test_interactive_placement() {
    let mut input = Cursor::new("A1 H\nA1 V\nJ1 V\nnonsense\n\nr\n");
    let mut out = Vec::new();
    let mut board = Board::new();
    place_fleet_interactive(&mut input, &mut out, &mut board, &mut SmallRng::seed_from_u64(3)).unwrap();

    assert_eq!(board.ship_count(), NUM_SHIPS);
    assert!(board.is_fleet_complete());
    let carrier = board.ship_at(pos(0, 0)).unwrap();
    assert_eq!(carrier.class(), ShipClass::Carrier);
    assert_eq!(carrier.orientation(), Orientation::Horizontal);
    assert_eq!(board.ship_at(pos(0, 9)).unwrap().class(), ShipClass::Submarine);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Error:"));
    assert!(text.contains("Invalid input"));
}

#[test]
fn test_read_target() {
    let mut out = Vec::new();
    let mut input = Cursor::new("zz\nB2\n");
    assert_eq!(read_target(&mut input, &mut out).unwrap(), Some(pos(1, 1)));

    let mut input = Cursor::new("q\n");
    assert_eq!(read_target(&mut input, &mut out).unwrap(), None);
    let mut input = Cursor::new("");
    assert_eq!(read_target(&mut input, &mut out).unwrap(), None);
}

#[test]
fn test_describe_shot() {
    let report = ShotReport {
        shooter: Side::Opponent,
        at: pos(4, 1),
        result: CellState::Sunk,
        repeated: false,
        phase: Phase::OpponentTurn,
    };
    assert_eq!(describe_shot(&report), "Enemy fires at B5 -> sunk!");
}
