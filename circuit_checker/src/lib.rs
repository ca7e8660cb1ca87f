// circuit_checker: tick-driven verification harness for circuits built in a
// simulated cell world.
//
// A circuit under test lives in a fixture: a region of the world, found by
// name, whose input cells encode a 6×7 game board and whose seven output
// cells are the circuit's answer (the column it would play). A verification
// writes a fresh board onto the inputs, lets the circuit run for a fixed
// number of world ticks, then reads the outputs once and reports one verdict
// to the player who asked.
//
// Module overview:
// - `board.rs`:     LogicalBoard, CellState, and the random position generator.
// - `codec.rs`:     Board ↔ world coordinates (input writes, output reads).
// - `config.rs`:    CheckerConfig + FixtureGeometry, loaded from JSON.
// - `env.rs`:       `Environment` trait the engine talks to; impl for SimWorld.
// - `error.rs`:     VerifyError and ConfigError.
// - `fixture.rs`:   Name → anchor registry.
// - `verdict.rs`:   The four verdicts and `classify`.
// - `task.rs`:      VerificationTask, one per verification, advanced per tick.
// - `registry.rs`:  TaskRegistry: inbox drained at the top of each tick, then
//                   every live task advanced exactly once.
// - `verifier.rs`:  `verify` entry point: lookup, write phase, settle delay.
// - `report.rs`:    Reports to players and the sinks that carry them.
// - `reference.rs`: ReferenceCircuit with selectable solver policies.
// - `host.rs`:      The tick thread: commands, world step, registry tick.
//
// Dependencies: `circuit_checker_sim` for the world, `circuit_checker_prng`
// for seeded randomness. The `checker` binary (`main.rs`) runs a reference
// circuit through the whole pipeline.

pub mod board;
pub mod codec;
pub mod config;
pub mod env;
pub mod error;
pub mod fixture;
pub mod host;
pub mod reference;
pub mod registry;
pub mod report;
pub mod task;
pub mod verdict;
pub mod verifier;

pub use host::start_host;
