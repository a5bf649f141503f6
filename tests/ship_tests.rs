use broadside::{fleet_classes, BoardError, Orientation, Position, Ship, ShipClass, FLEET, NUM_SHIPS};

#[test]
fn test_fleet_composition() {
    let sizes: Vec<(usize, usize)> = FLEET.iter().map(|c| (c.size(), c.quantity())).collect();
    assert_eq!(sizes, vec![(4, 1), (3, 2), (2, 3), (1, 4)]);
    assert_eq!(fleet_classes().count(), NUM_SHIPS);
    assert_eq!(fleet_classes().next(), Some(ShipClass::Carrier));
}

#[test]
fn test_footprint() -> Result<(), BoardError> {
    let ship = Ship::new(ShipClass::Carrier, Orientation::Vertical);
    let cells: Vec<_> = ship.footprint(0, 0)?.map(<(usize, usize)>::from).collect();
    assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(ship.footprint(7, 0).err(), Some(BoardError::ShipOutOfBounds));
    Ok(())
}

#[test]
fn test_fresh_ship() {
    let ship = Ship::new(ShipClass::Destroyer, Orientation::Horizontal);
    assert!(!ship.is_placed());
    assert!(!ship.is_sunk());
    assert_eq!(ship.hits(), 0);
    assert_eq!(ship.size(), 2);
    assert!(!ship.occupies(Position::new(0, 0).unwrap()));
    assert_eq!(ship.class().to_string(), ShipClass::Destroyer.name());
}

#[test]
fn test_rotate_only_while_unplaced() {
    let mut ship = Ship::new(ShipClass::Submarine, Orientation::Horizontal);
    ship.rotate().unwrap();
    assert_eq!(ship.orientation(), Orientation::Vertical);

    let mut board = broadside::Board::new();
    assert!(board.place(&ship, 0, 0));
    let mut placed = board.ships().remove(0);
    assert_eq!(placed.rotate().unwrap_err(), BoardError::ShipAlreadyPlaced);
    assert_eq!(
        placed.set_orientation(Orientation::Horizontal).unwrap_err(),
        BoardError::ShipAlreadyPlaced
    );
}
