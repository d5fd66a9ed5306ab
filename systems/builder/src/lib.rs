#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for emitting turret placement, removal and upgrade commands.

use turret_defence_core::{CellCoord, Command, TurretKind};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Turret kind picked from the shop on this frame, if any.
    pub select_kind: Option<TurretKind>,
    /// Indicates whether the player confirmed a placement on this frame.
    pub place_action: bool,
    /// Indicates whether the player requested turret removal on this frame.
    pub remove_action: bool,
    /// Indicates whether the player requested a turret upgrade on this frame.
    pub upgrade_action: bool,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Input that confirms a placement on the provided cell.
    #[must_use]
    pub const fn place_at(cell: CellCoord) -> Self {
        Self {
            select_kind: None,
            place_action: true,
            remove_action: false,
            upgrade_action: false,
            cursor_cell: Some(cell),
        }
    }

    /// Input that requests removal of the turret on the provided cell.
    #[must_use]
    pub const fn remove_at(cell: CellCoord) -> Self {
        Self {
            select_kind: None,
            place_action: false,
            remove_action: true,
            upgrade_action: false,
            cursor_cell: Some(cell),
        }
    }

    /// Input that requests an upgrade of the turret on the provided cell.
    #[must_use]
    pub const fn upgrade_at(cell: CellCoord) -> Self {
        Self {
            select_kind: None,
            place_action: false,
            remove_action: false,
            upgrade_action: true,
            cursor_cell: Some(cell),
        }
    }

    /// Input that only changes the selected turret kind.
    #[must_use]
    pub const fn select(kind: TurretKind) -> Self {
        Self {
            select_kind: Some(kind),
            place_action: false,
            remove_action: false,
            upgrade_action: false,
            cursor_cell: None,
        }
    }
}

/// Builder system that translates player input into turret commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    selected: Option<TurretKind>,
}

impl Builder {
    /// Creates a new builder system with nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Turret kind that placements will use.
    #[must_use]
    pub const fn selected(&self) -> Option<TurretKind> {
        self.selected
    }

    /// Consumes adapter-derived input to emit builder commands.
    ///
    /// The `turret_at` closure should mirror the world's `query::turret_at`
    /// helper and report whether a turret stands on the probed cell.
    pub fn handle<F>(&mut self, input: BuilderInput, mut turret_at: F, out: &mut Vec<Command>)
    where
        F: FnMut(CellCoord) -> bool,
    {
        if let Some(kind) = input.select_kind {
            self.selected = Some(kind);
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };
        let occupied = turret_at(cell);

        if input.place_action && !occupied {
            if let Some(kind) = self.selected {
                out.push(Command::PlaceTurret { kind, cell });
            }
        }

        if input.upgrade_action && occupied {
            out.push(Command::UpgradeTurret { cell });
        }

        if input.remove_action && occupied {
            out.push(Command::RemoveTurret { cell });
        }
    }
}
