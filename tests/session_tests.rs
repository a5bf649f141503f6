use std::io;
use std::time::Duration;

use broadside::storage::MemoryStorage;
use broadside::{
    Board, CellState, Phase, PlayerProfile, SaveManager, Session, Side, Targeter, MATCH_FILE,
    PROFILE_FILE,
};
use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn start(seed: u64) -> (MemoryStorage, Session<MemoryStorage>) {
    let storage = MemoryStorage::new();
    let mut board = Board::new();
    board.place_fleet_randomly(&mut SmallRng::seed_from_u64(seed)).unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
    let session = Session::start(
        board,
        PlayerProfile::first_run(now),
        SaveManager::new(storage.clone()),
        SmallRng::seed_from_u64(seed + 1),
    )
    .unwrap()
    .with_think_delay(Duration::ZERO);
    (storage, session)
}

/// Fire at unshot enemy cells until the turn passes or the match ends.
fn miss_once(session: &mut Session<MemoryStorage>) {
    while session.phase() == Phase::PlayerTurn {
        let at = session.state().opponent_board().unshot_cells()[0];
        session.player_fire(at.row(), at.col()).unwrap();
    }
}

#[tokio::test]
async fn test_start_saves_immediately() {
    let (storage, session) = start(1);
    assert!(storage.get(MATCH_FILE).is_some());
    assert!(storage.get(PROFILE_FILE).is_some());
    assert_eq!(session.phase(), Phase::PlayerTurn);
    assert!(session.state().opponent_board().is_fleet_complete());
}

#[tokio::test]
async fn test_every_shot_is_auto_saved() {
    let (storage, mut session) = start(2);
    let at = session.state().opponent_board().unshot_cells()[0];
    session.player_fire(at.row(), at.col()).unwrap();

    let saves = SaveManager::new(storage.clone());
    assert_eq!(&saves.load_match().unwrap(), session.state());
}

#[tokio::test]
async fn test_opponent_turn_hands_session_back() {
    let (storage, mut session) = start(3);
    miss_once(&mut session);
    if session.state().is_game_over() {
        return;
    }
    assert_eq!(session.phase(), Phase::OpponentTurn);

    let (session, result) = session.spawn_opponent_turn().await.unwrap();
    let reports = result.unwrap();
    assert!(!reports.is_empty());
    assert!(reports.iter().all(|r| r.shooter == Side::Opponent));
    assert_ne!(session.phase(), Phase::OpponentTurn);

    let saves = SaveManager::new(storage);
    assert_eq!(&saves.load_match().unwrap(), session.state());
}

#[tokio::test]
async fn test_events_stream_every_shot() {
    let (_, mut session) = start(4);
    let mut events = session.subscribe();
    miss_once(&mut session);
    let fired = session.state().player_stats().shots as usize;

    let mut received = Vec::new();
    while let Ok(report) = events.try_recv() {
        received.push(report);
    }
    assert_eq!(received.len(), fired);
    assert_eq!(received.last().unwrap().result, CellState::Water);
}

#[tokio::test]
async fn test_auto_save_failure_does_not_stop_play() {
    let (storage, mut session) = start(5);
    let before = storage.get(MATCH_FILE).unwrap();
    storage.fail_writes(Some(io::ErrorKind::PermissionDenied));

    let at = session.state().opponent_board().unshot_cells()[0];
    assert!(session.player_fire(at.row(), at.col()).is_ok());
    assert_eq!(storage.get(MATCH_FILE).unwrap(), before);
    assert!(session.save().is_err());
}

#[tokio::test]
async fn test_resume_picks_up_saved_match() {
    let (storage, mut session) = start(6);
    miss_once(&mut session);
    let resumed = Session::resume(SaveManager::new(storage), SmallRng::seed_from_u64(0)).unwrap();
    assert_eq!(resumed.state(), session.state());
    assert_eq!(resumed.profile().nickname, session.profile().nickname);
    assert_eq!(resumed.profile().games_played, 0);
}

#[tokio::test]
async fn test_full_match_updates_profile_once() {
    let (storage, mut session) = start(7);
    let mut player = Targeter::new();
    let mut rng = SmallRng::seed_from_u64(70);
    loop {
        match session.phase() {
            Phase::PlayerTurn => {
                let at = player.next_target(session.state().opponent_board(), &mut rng).unwrap();
                let report = session.player_fire(at.row(), at.col()).unwrap();
                player.observe(at, report.result);
            }
            Phase::OpponentTurn => {
                session.play_opponent_turn().await.unwrap();
            }
            Phase::GameOver { .. } => break,
        }
    }
    assert_eq!(session.profile().games_played, 1);

    // a repeat shot after the end is rejected and changes nothing
    assert!(session.player_fire(0, 0).is_err());
    assert_eq!(session.profile().games_played, 1);

    let saves = SaveManager::new(storage);
    assert_eq!(saves.load_profile(session.profile().last_played).unwrap().games_played, 1);

    session.discard_save();
    assert!(!saves.has_saved_match());
}

#[tokio::test]
async fn test_rename_on_resume_is_saved() {
    let (storage, mut session) = start(8);
    miss_once(&mut session);
    let mut resumed =
        Session::resume(SaveManager::new(storage.clone()), SmallRng::seed_from_u64(0)).unwrap();
    resumed.set_nickname("Hopper");
    resumed.save().unwrap();

    let reloaded = Session::resume(SaveManager::new(storage), SmallRng::seed_from_u64(0)).unwrap();
    assert_eq!(reloaded.profile().nickname, "Hopper");
    assert_eq!(reloaded.state(), resumed.state());
}
