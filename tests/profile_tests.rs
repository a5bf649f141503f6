use broadside::{
    Board, MatchState, Orientation, PlayerProfile, Position, Ship, ShipClass, TIMESTAMP_FORMAT,
};
use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(hour, 30, 15)
        .unwrap()
}

fn frigate_at(row: usize, col: usize) -> Board {
    let mut board = Board::new();
    assert!(board.place(&Ship::new(ShipClass::Frigate, Orientation::Horizontal), row, col));
    board
}

#[test]
fn test_plain_text_roundtrip() {
    let mut profile = PlayerProfile::new("Grace", at(8));
    profile.player_ships_destroyed = 17;
    profile.enemy_ships_destroyed = 4;
    profile.register_win();
    profile.register_loss();
    profile.register_win();

    let text = profile.to_plain_text();
    assert!(text.contains("NICKNAME=Grace\n"));
    assert!(text.contains(&format!("LAST_PLAYED={}\n", at(8).format(TIMESTAMP_FORMAT))));
    assert_eq!(PlayerProfile::from_plain_text(&text, at(20)), profile);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let text = "NICKNAME=Linus\n\
                GAMES_PLAYED=lots\n\
                just some words\n\
                GAMES_WON=2\n\
                LAST_PLAYED=yesterday\n\
                FAVOURITE_SHIP=Carrier\n";
    let profile = PlayerProfile::from_plain_text(text, at(9));
    assert_eq!(profile.nickname, "Linus");
    assert_eq!(profile.games_played, 0);
    assert_eq!(profile.games_won, 2);
    assert_eq!(profile.last_played, at(9));
}

#[test]
fn test_empty_record_is_first_run() {
    assert_eq!(
        PlayerProfile::from_plain_text("", at(7)),
        PlayerProfile::first_run(at(7))
    );
}

#[test]
fn test_win_rate() {
    let mut profile = PlayerProfile::first_run(at(1));
    assert_eq!(profile.win_rate(), 0.0);
    profile.register_win();
    profile.register_loss();
    assert_eq!(profile.games_played, 2);
    assert_eq!(profile.win_rate(), 50.0);
}

#[test]
fn test_record_result() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut state = MatchState::new(frigate_at(9, 9), frigate_at(0, 0), &mut rng);
    let mut profile = PlayerProfile::first_run(at(1));

    profile.record_result(&state);
    assert_eq!(profile.games_played, 0);

    state.player_fire(Position::new(0, 0).unwrap()).unwrap();
    profile.record_result(&state);
    assert_eq!(profile.games_played, 1);
    assert_eq!(profile.games_won, 1);
    assert_eq!(profile.player_ships_destroyed, 1);
    assert_eq!(profile.enemy_ships_destroyed, 0);
}
