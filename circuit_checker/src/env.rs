// The environment interface the verification engine consumes.
//
// The engine never touches `SimWorld` directly. Everything it needs from
// the world (identity, cell writes, cell reads, the fast-forward request, and
// player lookup) goes through `Environment`, which keeps the task and codec
// logic testable against a stub and keeps the world free of verifier
// concepts. `SimWorld` gets its implementation here.

use circuit_checker_sim::sim::SimWorld;
use circuit_checker_sim::types::{Cell, CellCoord, CellKind, PlayerId, WorldId};

/// What the engine may ask of a simulated world.
pub trait Environment {
    /// Persistent identity of the world. Two handles are the same world iff
    /// their identities are equal.
    fn identity(&self) -> WorldId;

    /// Make `coord` an active input (`true`) or clear it (`false`).
    fn set_cell(&mut self, coord: CellCoord, active: bool);

    /// What occupies `coord`.
    fn cell_kind(&self, coord: CellCoord) -> CellKind;

    /// Whether the cell at `coord` is powered, regardless of its kind.
    fn is_activated(&self, coord: CellCoord) -> bool;

    /// Run the next `ticks` ticks as fast as possible.
    fn advance_simulation_by(&mut self, ticks: u64);

    /// Whether `player` is online and can receive reports.
    fn has_player(&self, player: PlayerId) -> bool;
}

impl Environment for SimWorld {
    fn identity(&self) -> WorldId {
        self.id
    }

    fn set_cell(&mut self, coord: CellCoord, active: bool) {
        let cell = if active { Cell::POWER_SOURCE } else { Cell::AIR };
        self.world.set(coord, cell);
    }

    fn cell_kind(&self, coord: CellCoord) -> CellKind {
        self.world.get(coord).kind
    }

    fn is_activated(&self, coord: CellCoord) -> bool {
        self.world.get(coord).powered
    }

    fn advance_simulation_by(&mut self, ticks: u64) {
        self.request_sprint(ticks);
    }

    fn has_player(&self, player: PlayerId) -> bool {
        self.is_online(player)
    }
}
