//! Fixed-capacity turret pool that arbitrates placement, removal and upgrades.

use std::{collections::BTreeMap, path::Path, time::Duration};

use turret_defence_catalog::{CatalogError, TurretCatalog};
use turret_defence_core::{
    CellCoord, PlacementError, RemovalError, SlotId, TurretKind, TurretLevel, TurretSnapshot,
    TurretStats, TurretView, UpgradeError,
};

use crate::{CellOccupancy, Purse, TurretRenderer};

/// Outcome of a successful upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Upgrade {
    /// Slot hosting the upgraded turret.
    pub slot: SlotId,
    /// Level the turret reached.
    pub level: TurretLevel,
    /// Currency deducted from the purse.
    pub cost: u32,
}

#[derive(Clone, Copy, Debug)]
struct ActiveTurret {
    stats: TurretStats,
    cell: CellCoord,
    ready_in: Duration,
}

/// Reusable container for at most one active turret.
#[derive(Clone, Debug)]
struct TurretSlot {
    id: SlotId,
    active: Option<ActiveTurret>,
}

impl TurretSlot {
    fn new(id: SlotId) -> Self {
        Self { id, active: None }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn activate(&mut self, stats: TurretStats, cell: CellCoord) {
        self.active = Some(ActiveTurret {
            stats,
            cell,
            ready_in: Duration::ZERO,
        });
    }

    fn deactivate(&mut self) {
        self.active = None;
    }

    fn improve(&mut self, stats: TurretStats) {
        if let Some(turret) = self.active.as_mut() {
            turret.stats = stats;
        }
    }

    fn update(&mut self, dt: Duration) {
        if let Some(turret) = self.active.as_mut() {
            turret.ready_in = turret.ready_in.saturating_sub(dt);
        }
    }

    fn snapshot(&self) -> Option<TurretSnapshot> {
        self.active.map(|turret| TurretSnapshot {
            slot: self.id,
            cell: turret.cell,
            stats: turret.stats,
            ready_in: turret.ready_in,
        })
    }
}

/// Pool owning every turret slot and the template catalog they draw from.
///
/// Slots are allocated once; placement activates the lowest free slot and
/// removal marks it free again. A cell index keeps at most one active slot
/// per cell.
#[derive(Clone, Debug)]
pub struct TurretPool {
    catalog: TurretCatalog,
    slots: Vec<TurretSlot>,
    occupied: BTreeMap<CellCoord, usize>,
}

impl TurretPool {
    /// Creates a pool with `capacity` inactive slots backed by `catalog`.
    #[must_use]
    pub fn new(catalog: TurretCatalog, capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|index| {
                let id = u32::try_from(index).unwrap_or(u32::MAX);
                TurretSlot::new(SlotId::new(id))
            })
            .collect();
        Self {
            catalog,
            slots,
            occupied: BTreeMap::new(),
        }
    }

    /// Loads the catalog from disk and allocates the slots.
    ///
    /// Catalog failures are returned before any slot exists, so a caller
    /// never runs a game loop against a half-loaded catalog.
    pub fn initialize(
        catalog_path: impl AsRef<Path>,
        capacity: usize,
    ) -> Result<Self, CatalogError> {
        let catalog = TurretCatalog::load(catalog_path)?;
        Ok(Self::new(catalog, capacity))
    }

    /// Template catalog shared read-only by every slot.
    #[must_use]
    pub fn catalog(&self) -> &TurretCatalog {
        &self.catalog
    }

    /// Total number of slots, active or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently hosting a turret.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.occupied.len()
    }

    /// Hands every active turret to the renderer in slot order.
    pub fn render_all<R>(&self, renderer: &mut R)
    where
        R: TurretRenderer + ?Sized,
    {
        for snapshot in self.slots.iter().filter_map(TurretSlot::snapshot) {
            renderer.draw_turret(&snapshot);
        }
    }

    /// Advances the reload timer of every active turret.
    pub fn update_all(&mut self, dt: Duration) {
        for slot in self.slots.iter_mut().filter(|slot| slot.is_active()) {
            slot.update(dt);
        }
    }

    /// Fires the turret in `slot` if it has reloaded, restarting its timer.
    ///
    /// Returns the stats the shot was fired with.
    pub fn try_fire(&mut self, slot: SlotId) -> Option<TurretStats> {
        let index = usize::try_from(slot.get()).ok()?;
        let turret = self.slots.get_mut(index)?.active.as_mut()?;
        if !turret.ready_in.is_zero() {
            return None;
        }
        turret.ready_in = turret.stats.reload_interval()?;
        Some(turret.stats)
    }

    /// Purchase cost of a base-level turret of the provided kind.
    #[must_use]
    pub fn purchase_cost(&self, kind: TurretKind) -> Option<u32> {
        self.catalog.find_base(kind).map(|stats| stats.purchase_cost)
    }

    /// Cost of reaching `level` for the provided kind, if that level exists.
    #[must_use]
    pub fn upgrade_cost(&self, kind: TurretKind, level: TurretLevel) -> Option<u32> {
        self.catalog.find(kind, level).map(|stats| stats.upgrade_cost)
    }

    /// Checks whether a turret could be placed without changing anything.
    ///
    /// Reports the slot that [`TurretPool::place`] would activate.
    pub fn check_placement<M>(
        &self,
        map: &M,
        kind: TurretKind,
        cell: CellCoord,
    ) -> Result<SlotId, PlacementError>
    where
        M: CellOccupancy + ?Sized,
    {
        self.vacancy(map, kind, cell)
            .map(|(index, _)| self.slots[index].id)
    }

    /// Activates the first free slot with the base template of `kind` on `cell`.
    ///
    /// The purse is not charged here; billing belongs to the caller.
    pub fn place<M>(
        &mut self,
        map: &M,
        kind: TurretKind,
        cell: CellCoord,
    ) -> Result<SlotId, PlacementError>
    where
        M: CellOccupancy + ?Sized,
    {
        let (index, stats) = self.vacancy(map, kind, cell).map_err(|reason| {
            log::debug!("placement of kind {kind} at {cell} rejected: {reason}");
            reason
        })?;
        let slot = &mut self.slots[index];
        slot.activate(stats, cell);
        let _ = self.occupied.insert(cell, index);
        log::debug!("slot {} activated with kind {kind} at {cell}", slot.id.get());
        Ok(slot.id)
    }

    /// Deactivates the turret standing on `cell`, freeing its slot.
    pub fn remove(&mut self, cell: CellCoord) -> Result<SlotId, RemovalError> {
        let index = self
            .occupied
            .remove(&cell)
            .ok_or(RemovalError::MissingTurret)?;
        let slot = &mut self.slots[index];
        slot.deactivate();
        log::debug!("slot {} released from {cell}", slot.id.get());
        Ok(slot.id)
    }

    /// Advances the turret on `cell` one level, charging the purse.
    ///
    /// Rejections leave both the turret and the purse untouched.
    pub fn upgrade<P>(&mut self, purse: &mut P, cell: CellCoord) -> Result<Upgrade, UpgradeError>
    where
        P: Purse + ?Sized,
    {
        let index = *self
            .occupied
            .get(&cell)
            .ok_or(UpgradeError::MissingTurret)?;
        let current = self.slots[index]
            .active
            .map(|turret| turret.stats)
            .ok_or(UpgradeError::MissingTurret)?;
        let next = current
            .level
            .next()
            .and_then(|level| self.catalog.find(current.kind, level))
            .copied()
            .ok_or(UpgradeError::MaxLevel)?;

        if !purse.is_money_enough(next.upgrade_cost) {
            log::debug!(
                "upgrade at {cell} needs {} but purse holds {}",
                next.upgrade_cost,
                purse.balance()
            );
            return Err(UpgradeError::InsufficientFunds);
        }

        let slot = &mut self.slots[index];
        slot.improve(next);
        purse.decrease_money(next.upgrade_cost);
        log::debug!("slot {} upgraded to level {}", slot.id.get(), next.level);
        Ok(Upgrade {
            slot: slot.id,
            level: next.level,
            cost: next.upgrade_cost,
        })
    }

    /// Snapshot of the turret standing on `cell`, if any.
    #[must_use]
    pub fn turret_at(&self, cell: CellCoord) -> Option<TurretSnapshot> {
        self.occupied
            .get(&cell)
            .and_then(|index| self.slots.get(*index))
            .and_then(TurretSlot::snapshot)
    }

    /// Captures every active turret in slot order.
    #[must_use]
    pub fn view(&self) -> TurretView {
        TurretView::from_snapshots(self.slots.iter().filter_map(TurretSlot::snapshot).collect())
    }

    fn vacancy<M>(
        &self,
        map: &M,
        kind: TurretKind,
        cell: CellCoord,
    ) -> Result<(usize, TurretStats), PlacementError>
    where
        M: CellOccupancy + ?Sized,
    {
        if !map.is_cell_empty(cell) {
            return Err(PlacementError::OccupiedCell);
        }
        let stats = *self
            .catalog
            .find_base(kind)
            .ok_or(PlacementError::UnknownKind)?;
        if self.occupied.contains_key(&cell) {
            return Err(PlacementError::TurretPresent);
        }
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_active())
            .ok_or(PlacementError::PoolExhausted)?;
        Ok((index, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OpenField;

    impl CellOccupancy for OpenField {
        fn is_cell_empty(&self, _cell: CellCoord) -> bool {
            true
        }
    }

    fn pool(capacity: usize) -> TurretPool {
        let catalog = TurretCatalog::parse("header\n1 0 0 0 50 2.0 5 2\n1 1 30 1 0 2.0 8 2\n")
            .expect("catalog parses");
        TurretPool::new(catalog, capacity)
    }

    #[test]
    fn new_pool_has_only_inactive_slots() {
        let pool = pool(20);
        assert_eq!(pool.capacity(), 20);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.view().is_empty());
    }

    #[test]
    fn placement_reuses_lowest_free_slot() {
        let mut pool = pool(3);
        let first = pool.place(&OpenField, TurretKind::new(1), CellCoord::new(0, 0));
        let second = pool.place(&OpenField, TurretKind::new(1), CellCoord::new(1, 0));
        assert_eq!(first, Ok(SlotId::new(0)));
        assert_eq!(second, Ok(SlotId::new(1)));

        assert_eq!(pool.remove(CellCoord::new(0, 0)), Ok(SlotId::new(0)));
        assert_eq!(
            pool.place(&OpenField, TurretKind::new(1), CellCoord::new(2, 0)),
            Ok(SlotId::new(0))
        );
    }

    #[test]
    fn check_placement_does_not_mutate() {
        let pool = pool(1);
        assert_eq!(
            pool.check_placement(&OpenField, TurretKind::new(1), CellCoord::new(3, 3)),
            Ok(SlotId::new(0))
        );
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn fresh_turret_fires_then_reloads() {
        let mut pool = pool(1);
        let slot = pool
            .place(&OpenField, TurretKind::new(1), CellCoord::new(0, 0))
            .expect("placed");

        assert!(pool.try_fire(slot).is_some());
        assert!(pool.try_fire(slot).is_none(), "must reload between shots");

        pool.update_all(Duration::from_millis(250));
        assert!(pool.try_fire(slot).is_none());
        pool.update_all(Duration::from_millis(250));
        assert!(pool.try_fire(slot).is_some());
    }

    #[test]
    fn inactive_slot_never_fires() {
        let mut pool = pool(2);
        assert!(pool.try_fire(SlotId::new(1)).is_none());
        assert!(pool.try_fire(SlotId::new(7)).is_none());
    }
}
