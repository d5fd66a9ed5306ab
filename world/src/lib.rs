#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative turret state management for Turret Defence.

mod grid;
mod pool;
mod wallet;

use turret_defence_core::{
    CellCoord, Command, Event, PlacementError, SlotId, TurretKind, TurretSnapshot,
};

pub use grid::Grid;
pub use pool::{TurretPool, Upgrade};
pub use wallet::Wallet;

/// Map collaborator consulted before a turret is placed.
pub trait CellOccupancy {
    /// Reports whether the cell is free for building.
    fn is_cell_empty(&self, cell: CellCoord) -> bool;
}

/// Economy collaborator charged for upgrades and purchases.
pub trait Purse {
    /// Currency currently held.
    fn balance(&self) -> u32;

    /// Reports whether the purse can cover `amount`.
    fn is_money_enough(&self, amount: u32) -> bool {
        self.balance() >= amount
    }

    /// Removes `amount` from the purse.
    fn decrease_money(&mut self, amount: u32);
}

/// Presentation collaborator that draws active turrets.
pub trait TurretRenderer {
    /// Draws a single active turret.
    fn draw_turret(&mut self, turret: &TurretSnapshot);
}

/// Represents the authoritative Turret Defence world state.
#[derive(Clone, Debug)]
pub struct World {
    pool: TurretPool,
    grid: Grid,
    wallet: Wallet,
}

impl World {
    /// Creates a world from its turret pool, build grid and starting wallet.
    #[must_use]
    pub fn new(pool: TurretPool, grid: Grid, wallet: Wallet) -> Self {
        Self { pool, grid, wallet }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceTurret { kind, cell } => match purchase_turret(world, kind, cell) {
            Ok(slot) => {
                out_events.push(Event::TurretPlaced { slot, kind, cell });
                out_events.push(Event::MoneyChanged {
                    balance: world.wallet.balance(),
                });
            }
            Err(reason) => {
                log::info!("rejected turret {kind} at {cell}: {reason}");
                out_events.push(Event::TurretPlacementRejected { kind, cell, reason });
            }
        },
        Command::RemoveTurret { cell } => match world.pool.remove(cell) {
            Ok(slot) => out_events.push(Event::TurretRemoved { slot, cell }),
            Err(reason) => {
                log::info!("rejected removal at {cell}: {reason}");
                out_events.push(Event::TurretRemovalRejected { cell, reason });
            }
        },
        Command::UpgradeTurret { cell } => match world.pool.upgrade(&mut world.wallet, cell) {
            Ok(upgrade) => {
                out_events.push(Event::TurretUpgraded {
                    slot: upgrade.slot,
                    cell,
                    level: upgrade.level,
                    cost: upgrade.cost,
                });
                out_events.push(Event::MoneyChanged {
                    balance: world.wallet.balance(),
                });
            }
            Err(reason) => {
                log::info!("rejected upgrade at {cell}: {reason}");
                out_events.push(Event::TurretUpgradeRejected { cell, reason });
            }
        },
        Command::Tick { dt } => {
            world.pool.update_all(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::Earn { amount } => {
            world.wallet.earn(amount);
            out_events.push(Event::MoneyChanged {
                balance: world.wallet.balance(),
            });
        }
    }
}

/// Places a turret and charges its purchase cost.
///
/// Funds are checked only once the pool has accepted the request, and the
/// purse is charged only after the turret is active.
fn purchase_turret(
    world: &mut World,
    kind: TurretKind,
    cell: CellCoord,
) -> Result<SlotId, PlacementError> {
    let _ = world.pool.check_placement(&world.grid, kind, cell)?;
    let cost = world.pool.purchase_cost(kind).unwrap_or(0);
    if !world.wallet.is_money_enough(cost) {
        return Err(PlacementError::InsufficientFunds);
    }
    let slot = world.pool.place(&world.grid, kind, cell)?;
    world.wallet.decrease_money(cost);
    Ok(slot)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use turret_defence_catalog::TurretCatalog;
    use turret_defence_core::{CellCoord, TurretKind, TurretLevel, TurretSnapshot, TurretView};

    use super::{Grid, Purse, TurretRenderer, World};

    /// Captures every active turret in slot order.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        world.pool.view()
    }

    /// Snapshot of the turret standing on `cell`, if any.
    #[must_use]
    pub fn turret_at(world: &World, cell: CellCoord) -> Option<TurretSnapshot> {
        world.pool.turret_at(cell)
    }

    /// Price of a base-level turret of the provided kind.
    #[must_use]
    pub fn purchase_cost(world: &World, kind: TurretKind) -> Option<u32> {
        world.pool.purchase_cost(kind)
    }

    /// Price of reaching `level` for the provided kind.
    #[must_use]
    pub fn upgrade_cost(world: &World, kind: TurretKind, level: TurretLevel) -> Option<u32> {
        world.pool.upgrade_cost(kind, level)
    }

    /// Currency currently held by the player.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.wallet.balance()
    }

    /// Provides read-only access to the build grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the template catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &TurretCatalog {
        world.pool.catalog()
    }

    /// Number of slots, active or not.
    #[must_use]
    pub fn capacity(world: &World) -> usize {
        world.pool.capacity()
    }

    /// Draws every active turret through the provided renderer.
    pub fn render<R>(world: &World, renderer: &mut R)
    where
        R: TurretRenderer + ?Sized,
    {
        world.pool.render_all(renderer);
    }
}
