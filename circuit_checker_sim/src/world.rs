// Dense 3D cell grid.
//
// Stored as a flat `Vec<Cell>` indexed by `x + z * size_x + y * size_x *
// size_z` for O(1) reads and writes. Out-of-bounds reads return air;
// out-of-bounds writes are dropped. Fixtures are laid out by computing
// coordinates, never by searching, so a fixture that hangs off the edge of
// the grid simply reads back as empty.
//
// See also: `sim.rs`, which owns a `CellWorld` together with the world's
// identity and tick state.

use crate::types::{Cell, CellCoord, CellKind};

/// Dense 3D cell grid.
#[derive(Clone, Debug, Default)]
pub struct CellWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    cells: Vec<Cell>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl CellWorld {
    /// Create a grid filled with air.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            cells: vec![Cell::AIR; total],
            size_x,
            size_y,
            size_z,
        }
    }

    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        Some(coord.x as usize + coord.z as usize * sx + coord.y as usize * sx * sz)
    }

    /// Read a cell. Air for out-of-bounds coordinates.
    pub fn get(&self, coord: CellCoord) -> Cell {
        self.index(coord)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::AIR)
    }

    /// Write a cell. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: CellCoord, cell: Cell) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = cell;
        }
    }

    /// Change the powered flag of a repeater. Cells of any other kind are
    /// left untouched, so a circuit cannot conjure an output where the
    /// fixture has none.
    pub fn set_repeater_power(&mut self, coord: CellCoord, powered: bool) {
        if let Some(cell) = self
            .index(coord)
            .map(|i| &mut self.cells[i])
            .filter(|c| c.kind == CellKind::Repeater)
        {
            cell.powered = powered;
        }
    }

    /// Number of cells of the given kind. Only used for diagnostics and tests.
    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_is_all_air() {
        let world = CellWorld::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(world.get(CellCoord::new(x, y, z)), Cell::AIR);
                }
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut world = CellWorld::new(8, 8, 8);
        let coord = CellCoord::new(3, 5, 2);
        world.set(coord, Cell::POWER_SOURCE);
        assert_eq!(world.get(coord), Cell::POWER_SOURCE);
        assert_eq!(world.get(CellCoord::new(3, 5, 3)), Cell::AIR);
    }

    #[test]
    fn out_of_bounds_read_returns_air() {
        let world = CellWorld::new(4, 4, 4);
        assert_eq!(world.get(CellCoord::new(-1, 0, 0)), Cell::AIR);
        assert_eq!(world.get(CellCoord::new(0, 4, 0)), Cell::AIR);
        assert_eq!(world.get(CellCoord::new(100, 100, 100)), Cell::AIR);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut world = CellWorld::new(4, 4, 4);
        world.set(CellCoord::new(-1, 0, 0), Cell::POWER_SOURCE);
        world.set(CellCoord::new(4, 0, 0), Cell::POWER_SOURCE);
        assert_eq!(world.count_kind(CellKind::PowerSource), 0);
    }

    #[test]
    fn indexing_is_exact() {
        let mut world = CellWorld::new(10, 8, 6);
        let coord = CellCoord::new(5, 3, 4);
        world.set(coord, Cell::repeater(false));
        assert_eq!(world.get(coord).kind, CellKind::Repeater);
        assert_eq!(world.get(CellCoord::new(4, 3, 4)), Cell::AIR);
        assert_eq!(world.get(CellCoord::new(5, 2, 4)), Cell::AIR);
        assert_eq!(world.get(CellCoord::new(5, 3, 3)), Cell::AIR);
        assert_eq!(world.count_kind(CellKind::Repeater), 1);
    }

    #[test]
    fn repeater_power_only_touches_repeaters() {
        let mut world = CellWorld::new(8, 8, 8);
        let rep = CellCoord::new(1, 1, 1);
        let solid = CellCoord::new(2, 1, 1);
        world.set(rep, Cell::repeater(false));
        world.set(
            solid,
            Cell {
                kind: CellKind::Solid,
                powered: false,
            },
        );

        world.set_repeater_power(rep, true);
        world.set_repeater_power(solid, true);
        world.set_repeater_power(CellCoord::new(3, 1, 1), true);

        assert!(world.get(rep).powered);
        assert!(!world.get(solid).powered);
        assert_eq!(world.get(CellCoord::new(3, 1, 1)), Cell::AIR);
    }

    #[test]
    fn default_world_is_empty() {
        let world = CellWorld::default();
        assert_eq!(world.size_x, 0);
        assert_eq!(world.get(CellCoord::new(0, 0, 0)), Cell::AIR);
    }
}
