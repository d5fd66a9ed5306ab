#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Turret Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Rejected requests are reported as events carrying a
//! reason so that callers can give feedback instead of guessing.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Number of turret slots allocated when no explicit capacity is configured.
pub const DEFAULT_POOL_CAPACITY: usize = 20;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a base-level turret on the provided cell.
    PlaceTurret {
        /// Kind of turret to construct.
        kind: TurretKind,
        /// Cell that should host the turret.
        cell: CellCoord,
    },
    /// Requests removal of the turret standing on the provided cell.
    RemoveTurret {
        /// Cell hosting the turret targeted for removal.
        cell: CellCoord,
    },
    /// Requests that the turret on the provided cell advance one level.
    UpgradeTurret {
        /// Cell hosting the turret targeted for the upgrade.
        cell: CellCoord,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Credits the player's purse, typically with a bounty.
    Earn {
        /// Amount of currency added to the purse.
        amount: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a turret was placed into the world.
    TurretPlaced {
        /// Slot that now hosts the turret.
        slot: SlotId,
        /// Kind of turret that was placed.
        kind: TurretKind,
        /// Cell occupied by the turret.
        cell: CellCoord,
    },
    /// Reports that a turret placement request was rejected.
    TurretPlacementRejected {
        /// Kind of turret requested for placement.
        kind: TurretKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a turret was removed and its slot freed.
    TurretRemoved {
        /// Slot released by the removal.
        slot: SlotId,
        /// Cell previously occupied by the turret.
        cell: CellCoord,
    },
    /// Reports that a turret removal request was rejected.
    TurretRemovalRejected {
        /// Cell provided in the removal request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that a turret advanced to a new level.
    TurretUpgraded {
        /// Slot hosting the upgraded turret.
        slot: SlotId,
        /// Cell occupied by the turret.
        cell: CellCoord,
        /// Level reached by the upgrade.
        level: TurretLevel,
        /// Currency charged for the upgrade.
        cost: u32,
    },
    /// Reports that a turret upgrade request was rejected.
    TurretUpgradeRejected {
        /// Cell provided in the upgrade request.
        cell: CellCoord,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Announces the purse balance after it changed.
    MoneyChanged {
        /// Balance held by the player after the change.
        balance: u32,
    },
}

/// Identifier of a turret type as listed in the template catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretKind(u32);

impl TurretKind {
    /// Creates a new turret kind identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the kind.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TurretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Upgrade tier of a turret, starting at [`TurretLevel::BASE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretLevel(u32);

impl TurretLevel {
    /// Level assigned to freshly placed turrets.
    pub const BASE: Self = Self(0);

    /// Creates a new level with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the level directly above this one, if representable.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Reports whether this is the base level.
    #[must_use]
    pub const fn is_base(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TurretLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Index of a slot inside the fixed-capacity turret pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Immutable stat record describing one turret kind at one level.
///
/// Records are loaded once from the template catalog and never mutated; the
/// pool copies them into slots on activation and upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    /// Turret type the record belongs to.
    pub kind: TurretKind,
    /// Upgrade tier described by the record.
    pub level: TurretLevel,
    /// Currency required to reach this level from the previous one.
    pub upgrade_cost: u32,
    /// Frame index inside the turret sprite sheet.
    pub sprite_index: u32,
    /// Currency required to place a base-level turret of this kind.
    pub purchase_cost: u32,
    /// Shots fired per second.
    pub fire_rate: f32,
    /// Damage dealt per shot.
    pub damage: u32,
    /// Effect radius measured in grid cells.
    pub radius: u32,
}

impl TurretStats {
    /// Time a turret with these stats needs between two shots.
    ///
    /// A non-positive fire rate never reloads and yields `None`.
    #[must_use]
    pub fn reload_interval(&self) -> Option<Duration> {
        if self.fire_rate > 0.0 && self.fire_rate.is_finite() {
            Duration::try_from_secs_f32(1.0 / self.fire_rate).ok()
        } else {
            None
        }
    }
}

/// Immutable representation of a single active turret used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Slot hosting the turret.
    pub slot: SlotId,
    /// Cell occupied by the turret.
    pub cell: CellCoord,
    /// Stats applied to the turret at its current level.
    pub stats: TurretStats,
    /// Remaining time before the turret may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all active turrets.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Number of active turrets captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no turret is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Reasons a turret placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The map reports the cell as unavailable for building.
    OccupiedCell,
    /// The catalog holds no base-level template for the requested kind.
    UnknownKind,
    /// An active turret already stands on the cell.
    TurretPresent,
    /// Every slot in the pool is already active.
    PoolExhausted,
    /// The player cannot afford the purchase cost.
    InsufficientFunds,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::OccupiedCell => "cell is not free for building",
            Self::UnknownKind => "turret kind is not in the catalog",
            Self::TurretPresent => "a turret already stands on the cell",
            Self::PoolExhausted => "no free turret slot left",
            Self::InsufficientFunds => "not enough money to buy the turret",
        };
        f.write_str(message)
    }
}

/// Reasons a turret removal request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No active turret stands on the cell.
    MissingTurret,
}

impl fmt::Display for RemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTurret => f.write_str("no turret stands on the cell"),
        }
    }
}

/// Reasons a turret upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No active turret stands on the cell.
    MissingTurret,
    /// The catalog defines no level above the turret's current one.
    MaxLevel,
    /// The player cannot afford the upgrade cost.
    InsufficientFunds,
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::MissingTurret => "no turret stands on the cell",
            Self::MaxLevel => "turret is already at its highest level",
            Self::InsufficientFunds => "not enough money for the upgrade",
        };
        f.write_str(message)
    }
}
