//! Plain-text presentation of the board and of world events.

use std::fmt::Write as _;

use turret_defence_core::{CellCoord, Event, TurretSnapshot};
use turret_defence_world::{Grid, TurretRenderer};

const EMPTY_GLYPH: char = '.';
const ROAD_GLYPH: char = '=';

/// Renderer that collects active turrets and prints them as a character grid.
#[derive(Debug, Default)]
pub(crate) struct TextBoard {
    turrets: Vec<TurretSnapshot>,
}

impl TurretRenderer for TextBoard {
    fn draw_turret(&mut self, turret: &TurretSnapshot) {
        self.turrets.push(*turret);
    }
}

impl TextBoard {
    /// Draws the grid with one glyph per cell followed by a turret legend.
    ///
    /// Turrets appear as their level digit; levels above nine show as `+`.
    pub(crate) fn compose(&self, grid: &Grid) -> String {
        let mut out = String::new();
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                out.push(self.glyph(grid, CellCoord::new(column, row)));
            }
            out.push('\n');
        }
        for turret in &self.turrets {
            let stats = turret.stats;
            let _ = writeln!(
                out,
                "slot {:>2}: kind {} level {} at {} sprite {} damage {} radius {} rate {:.2}/s",
                turret.slot.get(),
                stats.kind,
                stats.level,
                turret.cell,
                stats.sprite_index,
                stats.damage,
                stats.radius,
                stats.fire_rate,
            );
        }
        out
    }

    fn glyph(&self, grid: &Grid, cell: CellCoord) -> char {
        if let Some(turret) = self.turrets.iter().find(|turret| turret.cell == cell) {
            return char::from_digit(turret.stats.level.get(), 10).unwrap_or('+');
        }
        if grid.is_road(cell) {
            ROAD_GLYPH
        } else {
            EMPTY_GLYPH
        }
    }
}

/// Formats a world event as a single log line.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::TimeAdvanced { dt } => format!("time advanced by {:.3}s", dt.as_secs_f32()),
        Event::TurretPlaced { slot, kind, cell } => {
            format!("placed kind {kind} at {cell} in slot {}", slot.get())
        }
        Event::TurretPlacementRejected { kind, cell, reason } => {
            format!("cannot place kind {kind} at {cell}: {reason}")
        }
        Event::TurretRemoved { slot, cell } => {
            format!("removed turret at {cell}, slot {} is free", slot.get())
        }
        Event::TurretRemovalRejected { cell, reason } => {
            format!("cannot remove at {cell}: {reason}")
        }
        Event::TurretUpgraded {
            cell, level, cost, ..
        } => format!("upgraded turret at {cell} to level {level} for {cost}"),
        Event::TurretUpgradeRejected { cell, reason } => {
            format!("cannot upgrade at {cell}: {reason}")
        }
        Event::MoneyChanged { balance } => format!("balance is now {balance}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use turret_defence_core::{
        PlacementError, SlotId, TurretKind, TurretLevel, TurretStats,
    };

    fn turret(column: u32, row: u32, level: u32) -> TurretSnapshot {
        TurretSnapshot {
            slot: SlotId::new(0),
            cell: CellCoord::new(column, row),
            stats: TurretStats {
                kind: TurretKind::new(1),
                level: TurretLevel::new(level),
                upgrade_cost: 0,
                sprite_index: 2,
                purchase_cost: 50,
                fire_rate: 1.5,
                damage: 7,
                radius: 2,
            },
            ready_in: Duration::ZERO,
        }
    }

    #[test]
    fn grid_shows_road_and_turret_levels() {
        let grid = Grid::new(3, 2).with_road([CellCoord::new(0, 1), CellCoord::new(1, 1)]);
        let mut board = TextBoard::default();
        board.draw_turret(&turret(2, 0, 1));

        let text = board.compose(&grid);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("..1"));
        assert_eq!(lines.next(), Some("==."));
        let legend = lines.next().expect("legend line");
        assert!(legend.contains("kind 1 level 1 at (2, 0)"));
        assert!(legend.contains("rate 1.50/s"));
    }

    #[test]
    fn rejection_mentions_reason() {
        let line = describe(&Event::TurretPlacementRejected {
            kind: TurretKind::new(4),
            cell: CellCoord::new(1, 2),
            reason: PlacementError::PoolExhausted,
        });
        assert_eq!(line, "cannot place kind 4 at (1, 2): no free turret slot left");
    }
}
