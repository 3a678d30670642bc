use crate::geometry::{cell_of, snap_to_cell, Aabb, CellCoord, Position};
use crate::tower::Tower;
use std::collections::BTreeSet;

/// Placement slots of a level. Occupancy is never stored: a slot is taken
/// while some tower's footprint covers it.
#[derive(Clone, Debug)]
pub struct Grid {
    cell_size: f32,
    slots: Vec<Position>,
    slot_cells: BTreeSet<CellCoord>,
    show_slots: bool,
}

impl Grid {
    pub fn new(cell_size: f32, slots: Vec<Position>) -> Self {
        let slot_cells = slots.iter().map(|&s| cell_of(s, cell_size)).collect();
        Self {
            cell_size,
            slots,
            slot_cells,
            show_slots: false,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Centre of the cell under `point`.
    pub fn slot_for(&self, point: Position) -> Position {
        snap_to_cell(point, self.cell_size)
    }

    pub fn is_configured_slot(&self, slot: Position) -> bool {
        self.slot_cells.contains(&cell_of(slot, self.cell_size))
    }

    /// Footprint of a tower standing at `position`.
    pub fn footprint(&self, position: Position) -> Aabb {
        Aabb::square(position, self.cell_size)
    }

    pub fn is_spot_available<'a>(&self, slot: Position, towers: impl IntoIterator<Item = &'a Tower>) -> bool {
        self.is_configured_slot(slot)
            && !towers
                .into_iter()
                .any(|tower| self.footprint(tower.position()).contains(slot))
    }

    pub fn toggle_slots(&mut self) -> bool {
        self.show_slots = !self.show_slots;
        self.show_slots
    }

    /// Whether the slot overlay should be drawn. Not read by the simulation.
    pub fn show_slots(&self) -> bool {
        self.show_slots
    }

    pub fn slots(&self) -> &[Position] {
        &self.slots
    }

    pub fn slots_with_availability<'a>(&self, towers: impl IntoIterator<Item = &'a Tower>) -> Vec<(Position, bool)> {
        let footprints: Vec<Aabb> = towers
            .into_iter()
            .map(|tower| self.footprint(tower.position()))
            .collect();
        self.slots
            .iter()
            .map(|&slot| (slot, !footprints.iter().any(|f| f.contains(slot))))
            .collect()
    }
}
