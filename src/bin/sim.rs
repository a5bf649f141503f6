//! Computer vs. computer match, printed as one JSON line.
//!
//! The player side is driven by the same hunt/target engine as the opponent.

use broadside::{init_logging, Board, GameError, MatchState, Phase, ShotStats, Side, Targeter};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

fn side_json(stats: &ShotStats) -> serde_json::Value {
    json!({
        "shots": stats.shots,
        "hits": stats.hits,
        "sunk": stats.ships_sunk,
        "accuracy": stats.accuracy(),
    })
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let mut b1 = Board::new();
    let mut b2 = Board::new();
    b1.place_fleet_randomly(&mut rng1)?;
    b2.place_fleet_randomly(&mut rng2)?;

    let mut state = MatchState::new(b1, b2, &mut rng2);
    let mut player = Targeter::new();

    loop {
        match state.phase() {
            Phase::PlayerTurn => {
                let at = player
                    .next_target(state.opponent_board(), &mut rng1)
                    .ok_or(GameError::NoTargetAvailable)?;
                let report = state.player_fire(at)?;
                player.observe(at, report.result);
            }
            Phase::OpponentTurn => {
                state.opponent_turn(&mut rng2)?;
            }
            Phase::GameOver { .. } => break,
        }
    }

    let winner = match state.winner() {
        Some(Side::Player) => Some("player1"),
        Some(Side::Opponent) => Some("player2"),
        None => None,
    };
    let p1 = state.player_stats();
    let p2 = state.opponent_stats();

    let result = json!({
        "player1": side_json(&p1),
        "player2": side_json(&p2),
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
