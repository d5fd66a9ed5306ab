use std::{collections::BTreeSet, time::Duration};

use turret_defence_catalog::TurretCatalog;
use turret_defence_core::{
    CellCoord, PlacementError, RemovalError, SlotId, TurretKind, TurretLevel, TurretSnapshot,
    UpgradeError,
};
use turret_defence_world::{CellOccupancy, Purse, TurretPool, TurretRenderer, Upgrade, Wallet};

const CATALOG: &str = "\
# id level upgrade_cost sprite_index purchase_cost fire_rate damage radius
1 0 0 0 50 2.0 5 2
1 1 30 1 0 2.0 8 2
1 2 70 2 0 3.0 12 3
2 0 0 3 80 1.0 20 4
";

#[derive(Default)]
struct Map {
    blocked: BTreeSet<CellCoord>,
}

impl CellOccupancy for Map {
    fn is_cell_empty(&self, cell: CellCoord) -> bool {
        !self.blocked.contains(&cell)
    }
}

#[derive(Default)]
struct Recorder {
    drawn: Vec<TurretSnapshot>,
}

impl TurretRenderer for Recorder {
    fn draw_turret(&mut self, turret: &TurretSnapshot) {
        self.drawn.push(*turret);
    }
}

fn pool(capacity: usize) -> TurretPool {
    TurretPool::new(TurretCatalog::parse(CATALOG).expect("catalog parses"), capacity)
}

fn basic() -> TurretKind {
    TurretKind::new(1)
}

#[test]
fn cost_lookups_follow_the_catalog() {
    let pool = pool(20);

    assert_eq!(pool.purchase_cost(basic()), Some(50));
    assert_eq!(pool.purchase_cost(TurretKind::new(2)), Some(80));
    assert_eq!(pool.purchase_cost(TurretKind::new(7)), None);

    assert_eq!(pool.upgrade_cost(basic(), TurretLevel::new(1)), Some(30));
    assert_eq!(pool.upgrade_cost(basic(), TurretLevel::new(2)), Some(70));
    assert_eq!(pool.upgrade_cost(basic(), TurretLevel::new(3)), None);
    assert_eq!(pool.upgrade_cost(TurretKind::new(7), TurretLevel::BASE), None);
}

#[test]
fn placing_on_empty_cell_occupies_one_slot() {
    let mut pool = pool(20);
    let map = Map::default();
    let cell = CellCoord::new(2, 3);

    let slot = pool.place(&map, basic(), cell).expect("placement succeeds");

    assert_eq!(slot, SlotId::new(0));
    assert_eq!(pool.active_count(), 1);
    let turret = pool.turret_at(cell).expect("turret present");
    assert_eq!(turret.stats.level, TurretLevel::BASE);
    assert_eq!(turret.stats.kind, basic());
    assert_eq!(
        pool.place(&map, TurretKind::new(2), cell),
        Err(PlacementError::TurretPresent),
        "cell is no longer available",
    );
    assert_eq!(pool.active_count(), 1);
}

#[test]
fn placement_on_blocked_cell_is_rejected_before_lookup() {
    let mut pool = pool(20);
    let cell = CellCoord::new(0, 0);
    let map = Map {
        blocked: [cell].into_iter().collect(),
    };

    assert_eq!(
        pool.place(&map, TurretKind::new(99), cell),
        Err(PlacementError::OccupiedCell)
    );
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn unknown_kind_is_rejected() {
    let mut pool = pool(20);

    assert_eq!(
        pool.place(&Map::default(), TurretKind::new(99), CellCoord::new(1, 1)),
        Err(PlacementError::UnknownKind)
    );
    assert!(pool.view().is_empty());
}

#[test]
fn full_pool_rejects_without_side_effects() {
    let mut pool = pool(2);
    let map = Map::default();
    let _ = pool.place(&map, basic(), CellCoord::new(0, 0)).expect("first");
    let _ = pool.place(&map, basic(), CellCoord::new(1, 0)).expect("second");
    let before: Vec<_> = pool.view().into_vec();

    assert_eq!(
        pool.place(&map, basic(), CellCoord::new(2, 0)),
        Err(PlacementError::PoolExhausted)
    );

    assert_eq!(pool.capacity(), 2);
    assert_eq!(pool.view().into_vec(), before);
    assert!(pool.turret_at(CellCoord::new(2, 0)).is_none());
}

#[test]
fn default_capacity_holds_twenty_turrets() {
    let mut pool = pool(turret_defence_core::DEFAULT_POOL_CAPACITY);
    let map = Map::default();
    for column in 0..20 {
        assert!(pool.place(&map, basic(), CellCoord::new(column, 0)).is_ok());
    }
    assert_eq!(
        pool.place(&map, basic(), CellCoord::new(0, 1)),
        Err(PlacementError::PoolExhausted)
    );
}

#[test]
fn removal_frees_slot_and_cell() {
    let mut pool = pool(1);
    let map = Map::default();
    let cell = CellCoord::new(4, 4);
    let slot = pool.place(&map, basic(), cell).expect("placed");

    assert_eq!(pool.remove(cell), Ok(slot));
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.remove(cell), Err(RemovalError::MissingTurret));

    assert_eq!(pool.place(&map, TurretKind::new(2), cell), Ok(slot));
    assert_eq!(
        pool.turret_at(cell).map(|turret| turret.stats.kind),
        Some(TurretKind::new(2))
    );
}

#[test]
fn upgrade_swaps_template_and_charges_exact_cost() {
    let mut pool = pool(20);
    let mut wallet = Wallet::new(100);
    let cell = CellCoord::new(3, 3);
    let slot = pool.place(&Map::default(), basic(), cell).expect("placed");

    let upgrade = pool.upgrade(&mut wallet, cell).expect("upgrade succeeds");

    assert_eq!(
        upgrade,
        Upgrade {
            slot,
            level: TurretLevel::new(1),
            cost: 30,
        }
    );
    assert_eq!(wallet.balance(), 70);
    let turret = pool.turret_at(cell).expect("still present");
    assert_eq!(turret.cell, cell);
    assert_eq!(turret.slot, slot);
    assert_eq!(turret.stats.damage, 8);
    assert_eq!(turret.stats.sprite_index, 1);
    assert_eq!(pool.active_count(), 1);
}

#[test]
fn upgrade_without_funds_changes_nothing() {
    let mut pool = pool(20);
    let mut wallet = Wallet::new(29);
    let cell = CellCoord::new(3, 3);
    let _ = pool.place(&Map::default(), basic(), cell).expect("placed");

    assert_eq!(
        pool.upgrade(&mut wallet, cell),
        Err(UpgradeError::InsufficientFunds)
    );
    assert_eq!(wallet.balance(), 29);
    assert_eq!(
        pool.turret_at(cell).map(|turret| turret.stats.level),
        Some(TurretLevel::BASE)
    );
}

#[test]
fn upgrade_at_highest_level_changes_nothing() {
    let mut pool = pool(20);
    let mut wallet = Wallet::new(1_000);
    let cell = CellCoord::new(0, 5);
    let _ = pool.place(&Map::default(), basic(), cell).expect("placed");
    let _ = pool.upgrade(&mut wallet, cell).expect("level 1");
    let _ = pool.upgrade(&mut wallet, cell).expect("level 2");
    assert_eq!(wallet.balance(), 900);

    assert_eq!(pool.upgrade(&mut wallet, cell), Err(UpgradeError::MaxLevel));
    assert_eq!(wallet.balance(), 900);
    assert_eq!(
        pool.turret_at(cell).map(|turret| turret.stats.level),
        Some(TurretLevel::new(2))
    );
}

#[test]
fn upgrade_on_empty_cell_is_rejected() {
    let mut pool = pool(20);
    let mut wallet = Wallet::new(1_000);

    assert_eq!(
        pool.upgrade(&mut wallet, CellCoord::new(8, 8)),
        Err(UpgradeError::MissingTurret)
    );
    assert_eq!(wallet.balance(), 1_000);
}

#[test]
fn render_and_update_only_touch_active_slots() {
    let mut pool = pool(4);
    let map = Map::default();
    let first = pool.place(&map, basic(), CellCoord::new(0, 0)).expect("first");
    let second = pool
        .place(&map, TurretKind::new(2), CellCoord::new(1, 0))
        .expect("second");
    let _ = pool.remove(CellCoord::new(0, 0)).expect("removed");

    assert!(pool.try_fire(second).is_some());
    assert!(pool.try_fire(first).is_none(), "freed slot cannot fire");
    pool.update_all(Duration::from_millis(400));

    let mut recorder = Recorder::default();
    pool.render_all(&mut recorder);

    assert_eq!(recorder.drawn.len(), 1);
    let drawn = recorder.drawn[0];
    assert_eq!(drawn.slot, second);
    assert_eq!(drawn.stats.sprite_index, 3);
    assert_eq!(drawn.ready_in, Duration::from_millis(600));
}
