use core::time::Duration;

use crate::ship::ShipClass;

pub const BOARD_SIZE: usize = 10;

/// Ship classes in the order a fleet is laid out, largest first.
pub const FLEET: [ShipClass; 4] = [
    ShipClass::Carrier,
    ShipClass::Submarine,
    ShipClass::Destroyer,
    ShipClass::Frigate,
];

/// Number of ships in a complete fleet.
pub const NUM_SHIPS: usize = 1 + 2 + 3 + 4;

/// Total number of ship segments in a complete fleet.
pub const TOTAL_SHIP_CELLS: usize = 4 + 3 * 2 + 2 * 3 + 4;

/// Pause before each opponent shot so the human can follow along.
pub const OPPONENT_THINK_DELAY: Duration = Duration::from_millis(800);

/// Attempts per ship before random placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Default directory holding the save files.
pub const SAVE_DIR: &str = "saves";
pub const MATCH_FILE: &str = "battleship_game.bin";
pub const PROFILE_FILE: &str = "player_data.txt";

/// Bumped whenever the layout of a saved match changes.
pub const SAVE_FORMAT_VERSION: u16 = 1;

pub const DEFAULT_NICKNAME: &str = "Player";

/// Every ship of a complete fleet, one entry per hull, largest first.
pub fn fleet_classes() -> impl Iterator<Item = ShipClass> {
    FLEET
        .iter()
        .flat_map(|class| core::iter::repeat(*class).take(class.quantity()))
}
