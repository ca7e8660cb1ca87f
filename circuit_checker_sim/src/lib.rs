// circuit_checker_sim: the simulated cell world circuits run in.
//
// This crate is the environment the verification engine talks to. It has no
// knowledge of boards, verdicts or tasks; the `circuit_checker` crate adapts
// it to its `Environment` trait.
//
// Module overview:
// - `types.rs`:   CellCoord, SimUuid-based WorldId/PlayerId, CellKind, Cell.
// - `world.rs`:   Dense 3D cell grid (out-of-bounds reads are air).
// - `circuit.rs`: `Circuit` trait, per-tick logic installed in a world.
// - `sim.rs`:     SimWorld: grid + identity + tick + sprint + players.
// - `prng`:       Re-exported from `circuit_checker_prng`.

pub mod circuit;
pub use circuit_checker_prng as prng;
pub mod sim;
pub mod types;
pub mod world;
