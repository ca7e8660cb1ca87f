// Simulated world state and its tick.
//
// `SimWorld` is the environment a verification runs against. It owns the
// cell grid, the world's persistent identity (`WorldId`), the tick counter,
// the set of online players, the installed circuits, and the sprint budget.
//
// ## Identity
//
// `id` is minted from the world's PRNG at construction and replaced by
// `reload()`. Anything that captured the old id (a verification task, for
// instance) can detect that it is now talking to a different world even
// though the `SimWorld` value itself never moved.
//
// ## Sprint
//
// `request_sprint(n)` asks the driver to run the next `n` ticks back to back
// without waiting out the normal tick duration. The world does not time
// itself; the host loop calls `take_sprint_tick()` after every step and only
// sleeps when it returns `false`. A new request replaces whatever remains of
// the previous one.
//
// See also: `world.rs` for the grid, `circuit.rs` for the per-tick logic
// hook, and the host loop in the `circuit_checker` crate that drives `step()`.

use std::collections::BTreeSet;

use circuit_checker_prng::GameRng;
use tracing::debug;

use crate::circuit::Circuit;
use crate::types::{PlayerId, WorldId};
use crate::world::CellWorld;

/// A simulated world: grid, identity, clock and actors.
pub struct SimWorld {
    /// Persistent identity. Changes on `reload()`.
    pub id: WorldId,
    /// Ticks stepped since construction. Not reset by `reload()`.
    pub tick: u64,
    /// The cell grid.
    pub world: CellWorld,
    /// Source for identities minted by this world.
    rng: GameRng,
    /// Ticks left to run without waiting.
    sprint_remaining: u64,
    /// Players currently online.
    players: BTreeSet<PlayerId>,
    /// Installed circuits, updated in order every tick.
    circuits: Vec<Box<dyn Circuit>>,
}

impl SimWorld {
    /// Create an empty world of the given size with a seeded identity.
    pub fn new(seed: u64, size: (u32, u32, u32)) -> Self {
        let mut rng = GameRng::new(seed);
        let id = WorldId::new(&mut rng);
        Self {
            id,
            tick: 0,
            world: CellWorld::new(size.0, size.1, size.2),
            rng,
            sprint_remaining: 0,
            players: BTreeSet::new(),
            circuits: Vec::new(),
        }
    }

    /// Advance one tick and run every circuit.
    pub fn step(&mut self) {
        self.tick += 1;
        // Circuits borrow the grid mutably; detach them for the loop.
        let mut circuits = std::mem::take(&mut self.circuits);
        for circuit in &mut circuits {
            circuit.update(&mut self.world, self.tick);
        }
        self.circuits = circuits;
    }

    /// Install a circuit. It runs from the next `step()` on.
    pub fn install_circuit(&mut self, circuit: Box<dyn Circuit>) {
        debug!(circuit = circuit.name(), "installing circuit");
        self.circuits.push(circuit);
    }

    pub fn circuit_count(&self) -> usize {
        self.circuits.len()
    }

    /// Ask for the next `ticks` ticks to run without waiting.
    pub fn request_sprint(&mut self, ticks: u64) {
        debug!(ticks, tick = self.tick, "sprint requested");
        self.sprint_remaining = ticks;
    }

    /// Consume one sprint tick. `false` when no sprint is active.
    pub fn take_sprint_tick(&mut self) -> bool {
        if self.sprint_remaining == 0 {
            return false;
        }
        self.sprint_remaining -= 1;
        true
    }

    pub fn sprint_remaining(&self) -> u64 {
        self.sprint_remaining
    }

    /// Simulate an unload/reload: same grid, new identity, sprint cancelled.
    pub fn reload(&mut self) -> WorldId {
        let old = self.id;
        self.id = WorldId::new(&mut self.rng);
        self.sprint_remaining = 0;
        debug!(%old, new = %self.id, "world reloaded");
        self.id
    }

    pub fn join(&mut self, player: PlayerId) -> bool {
        self.players.insert(player)
    }

    pub fn leave(&mut self, player: PlayerId) -> bool {
        self.players.remove(&player)
    }

    pub fn is_online(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }
}
