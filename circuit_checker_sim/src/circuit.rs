// Circuits: logic that lives inside the world and reacts to it every tick.
//
// A `Circuit` stands in for the player-built machinery the checker verifies.
// `SimWorld::step()` calls `update()` once per tick on every installed
// circuit, in installation order, after the tick counter advances. Circuits
// see and mutate only the cell grid; they have no access to the world's
// identity, players or sprint state.

use crate::world::CellWorld;

/// Per-tick world logic.
pub trait Circuit: Send {
    /// Short human-readable label for logs.
    fn name(&self) -> &str;

    /// Run one tick of logic against the grid.
    fn update(&mut self, world: &mut CellWorld, tick: u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, CellCoord};

    struct Toggle {
        at: CellCoord,
    }

    impl Circuit for Toggle {
        fn name(&self) -> &str {
            "toggle"
        }

        fn update(&mut self, world: &mut CellWorld, tick: u64) {
            world.set_repeater_power(self.at, tick % 2 == 1);
        }
    }

    #[test]
    fn circuit_drives_repeater() {
        let at = CellCoord::new(1, 1, 1);
        let mut world = CellWorld::new(4, 4, 4);
        world.set(at, Cell::repeater(false));
        let mut toggle = Toggle { at };

        toggle.update(&mut world, 1);
        assert!(world.get(at).powered);
        toggle.update(&mut world, 2);
        assert!(!world.get(at).powered);
        assert_eq!(toggle.name(), "toggle");
    }
}
