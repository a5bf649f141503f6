#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::io;
#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use broadside::{
    cli::{describe_shot, place_fleet_interactive, read_target, render_player_view},
    init_logging_with, Board, Phase, SaveManager, Session, Side, SAVE_DIR,
};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// Directory holding the save files.
    #[arg(long, global = true, default_value = SAVE_DIR)]
    save_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer, resuming the saved match if there is one.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Nickname to record in the profile.
        #[arg(long)]
        nickname: Option<String>,
        /// Pause before each opponent shot, in milliseconds.
        #[arg(long, default_value_t = 800)]
        think_ms: u64,
        /// Start a new match even if one is saved.
        #[arg(long)]
        new: bool,
    },
    /// Show the profile and the saved match, if any.
    Status,
    /// Delete the saved match and the profile.
    Reset,
}

#[cfg(feature = "std")]
fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging_with(log::LevelFilter::Warn);
    let cli = Cli::parse();
    let mut saves = SaveManager::open(&cli.save_dir)?;

    match cli.command {
        Commands::Play {
            seed,
            nickname,
            think_ms,
            new,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng = if let Some(s) = seed {
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };

            let mut session = if !new && saves.has_saved_match() {
                match Session::resume(saves, rng) {
                    Ok(mut session) => {
                        if let Some(name) = nickname {
                            session.set_nickname(name);
                        }
                        println!("Resuming saved match, {}.", session.profile().nickname);
                        session
                    }
                    Err(e) => {
                        anyhow::bail!("{} (run `reset` or pass --new to start over)", e);
                    }
                }
            } else {
                let mut profile = saves.load_profile(now())?;
                if let Some(name) = nickname {
                    profile.nickname = name;
                }
                println!("Welcome, {}!", profile.nickname);
                let mut board = Board::new();
                let stdin = io::stdin();
                place_fleet_interactive(
                    &mut stdin.lock(),
                    &mut io::stdout(),
                    &mut board,
                    &mut rng,
                )?;
                Session::start(board, profile, saves, rng)?
            };

            session = session.with_think_delay(Duration::from_millis(think_ms));
            run_match(session).await?;
        }
        Commands::Status => {
            let profile = saves.load_profile(now())?;
            println!("{}", profile.nickname);
            println!(
                "  games: {} played, {} won, {} lost ({:.1}% won)",
                profile.games_played,
                profile.games_won,
                profile.games_lost,
                profile.win_rate()
            );
            println!(
                "  ships sunk: {} by you, {} by the enemy",
                profile.player_ships_destroyed, profile.enemy_ships_destroyed
            );
            match saves.saved_match_info() {
                Ok(Some(info)) => println!("Saved {}", info),
                Ok(None) => println!("No saved match."),
                Err(e) => println!("Saved match unreadable: {}", e),
            }
        }
        Commands::Reset => {
            saves.delete_all();
            println!("All saved data deleted.");
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn run_match(mut session: Session) -> anyhow::Result<()> {
    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(report) = events.recv().await {
            if report.shooter == Side::Opponent {
                println!("{}", describe_shot(&report));
            }
        }
    });

    let stdin = io::stdin();
    loop {
        match session.phase() {
            Phase::PlayerTurn => {
                println!("\n{}", render_player_view(session.state()));
                let Some(target) = read_target(&mut stdin.lock(), &mut io::stdout())? else {
                    session.save()?;
                    println!("Match saved. See you next time.");
                    break;
                };
                match session.player_fire(target.row(), target.col()) {
                    Ok(report) => println!("{}", describe_shot(&report)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Phase::OpponentTurn => {
                println!("Enemy is aiming...");
                let (returned, result) = session.spawn_opponent_turn().await?;
                session = returned;
                result?;
            }
            Phase::GameOver { winner } => {
                println!("\n{}", render_player_view(session.state()));
                let state = session.state();
                match winner {
                    Side::Player => println!("VICTORY! You have sunk all enemy ships."),
                    Side::Opponent => println!("DEFEAT. All your ships have been destroyed."),
                }
                println!(
                    "Accuracy: you {:.1}%, enemy {:.1}%",
                    state.player_accuracy(),
                    state.opponent_accuracy()
                );
                session.discard_save();
                break;
            }
        }
    }

    // Closing the channel lets the printer drain and stop.
    drop(session);
    printer.await?;
    Ok(())
}
