use broadside::{
    Board, CellState, GameError, MatchState, Orientation, Phase, Position, Ship, ShipClass, Side,
    Targeter, TargetingState,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn pos(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

fn board_with(class: ShipClass, row: usize, col: usize) -> Board {
    let mut board = Board::new();
    assert!(board.place(&Ship::new(class, Orientation::Horizontal), row, col));
    board
}

fn fleet(seed: u64) -> Board {
    let mut board = Board::new();
    board.place_fleet_randomly(&mut SmallRng::seed_from_u64(seed)).unwrap();
    board
}

#[test]
fn test_player_shoots_first() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(fleet(1), fleet(2), &mut rng);
    assert_eq!(state.phase(), Phase::PlayerTurn);
    assert!(state.is_player_turn());
    assert_eq!(
        state.opponent_step(&mut rng).unwrap_err(),
        GameError::NotYourTurn { current: Side::Player }
    );
}

#[test]
fn test_water_passes_the_turn() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(
        board_with(ShipClass::Destroyer, 0, 0),
        board_with(ShipClass::Destroyer, 0, 0),
        &mut rng,
    );
    let report = state.player_fire(pos(9, 9)).unwrap();
    assert_eq!(report.result, CellState::Water);
    assert_eq!(report.phase, Phase::OpponentTurn);
    assert_eq!(state.current_turn(), Side::Opponent);
    assert_eq!(
        state.player_fire(pos(8, 8)).unwrap_err(),
        GameError::NotYourTurn { current: Side::Opponent }
    );
}

#[test]
fn test_hit_grants_another_shot() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(
        board_with(ShipClass::Destroyer, 0, 0),
        board_with(ShipClass::Destroyer, 0, 0),
        &mut rng,
    );
    let report = state.player_fire(pos(0, 0)).unwrap();
    assert_eq!(report.result, CellState::Hit);
    assert_eq!(report.phase, Phase::PlayerTurn);
    assert!(state.is_player_turn());
}

#[test]
fn test_repeat_shot_changes_nothing() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(
        board_with(ShipClass::Destroyer, 0, 0),
        board_with(ShipClass::Destroyer, 0, 0),
        &mut rng,
    );
    state.player_fire(pos(0, 0)).unwrap();
    let before = state.clone();

    let report = state.player_fire(pos(0, 0)).unwrap();
    assert!(report.repeated);
    assert_eq!(report.result, CellState::Hit);
    assert_eq!(state, before);
    assert_eq!(state.player_stats().shots, 1);
}

#[test]
fn test_shots_rejected_after_game_over() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(
        board_with(ShipClass::Frigate, 5, 5),
        board_with(ShipClass::Frigate, 0, 0),
        &mut rng,
    );
    let report = state.player_fire(pos(0, 0)).unwrap();
    assert_eq!(report.result, CellState::Sunk);
    assert_eq!(report.phase, Phase::GameOver { winner: Side::Player });
    assert!(state.is_game_over());
    assert_eq!(state.winner(), Some(Side::Player));

    assert_eq!(state.player_fire(pos(1, 1)).unwrap_err(), GameError::GameOver);
    assert_eq!(state.opponent_step(&mut rng).unwrap_err(), GameError::GameOver);
    assert_eq!(state.opponent_turn(&mut rng).unwrap_err(), GameError::GameOver);
    state.validate().unwrap();
}

#[test]
fn test_accuracy() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(
        board_with(ShipClass::Carrier, 0, 0),
        board_with(ShipClass::Carrier, 0, 0),
        &mut rng,
    );
    assert_eq!(state.player_accuracy(), 0.0);
    state.player_fire(pos(0, 0)).unwrap();
    assert_eq!(state.player_accuracy(), 100.0);
    state.player_fire(pos(9, 9)).unwrap();
    assert_eq!(state.player_accuracy(), 50.0);
    assert_eq!(state.player_stats().hits, 1);
    assert_eq!(state.player_stats().shots, 2);
}

#[test]
fn test_opponent_turn_runs_until_miss_or_win() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut state = MatchState::new(fleet(11), fleet(12), &mut rng);
    state.player_fire(pos(0, 0)).ok();
    while state.is_player_turn() {
        let at = state.opponent_board().unshot_cells()[0];
        state.player_fire(at).unwrap();
    }
    if state.is_game_over() {
        return;
    }

    let reports = state.opponent_turn(&mut rng).unwrap();
    let (last, rest) = reports.split_last().unwrap();
    assert!(rest.iter().all(|r| r.result != CellState::Water && !r.repeated));
    assert!(last.result == CellState::Water || state.is_game_over());
    assert!(reports.iter().all(|r| r.shooter == Side::Opponent));
    assert_eq!(state.opponent_stats().shots as usize, reports.len());
}

#[test]
fn test_targeting_state_follows_opponent_hits() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut state = MatchState::new(
        board_with(ShipClass::Carrier, 0, 0),
        board_with(ShipClass::Carrier, 0, 0),
        &mut rng,
    );
    state.player_fire(pos(9, 9)).unwrap();
    let reports = state.opponent_turn(&mut rng).unwrap();
    let mut expected = TargetingState::default();
    for r in &reports {
        expected.observe(r.at, r.result);
    }
    assert_eq!(state.targeting(), expected);
}

#[test]
fn test_computer_vs_computer_completes() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = MatchState::new(fleet(seed * 2), fleet(seed * 2 + 1), &mut rng);
        let mut player = Targeter::new();
        let mut turns = 0;
        while !state.is_game_over() {
            turns += 1;
            assert!(turns < 1000, "match did not terminate");
            if state.is_player_turn() {
                let at = player.next_target(state.opponent_board(), &mut rng).unwrap();
                let report = state.player_fire(at).unwrap();
                assert!(!report.repeated);
                player.observe(at, report.result);
            } else {
                state.opponent_turn(&mut rng).unwrap();
            }
        }
        let winner = state.winner().unwrap();
        let loser_board = match winner {
            Side::Player => state.opponent_board(),
            Side::Opponent => state.player_board(),
        };
        assert!(loser_board.all_sunk());
        state.validate().unwrap();
    }
}

#[test]
fn test_match_ids_differ() {
    let mut rng = SmallRng::seed_from_u64(1);
    let a = MatchState::new(Board::new(), Board::new(), &mut rng);
    let b = MatchState::new(Board::new(), Board::new(), &mut rng);
    assert_ne!(a.match_id(), b.match_id());
}
