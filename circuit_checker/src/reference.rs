// Reference circuit: a known-behavior circuit to verify against.
//
// `ReferenceCircuit` sits in a fixture and, every tick, reads the board
// presented on the fixture's inputs and drives the output bank according to
// its `SolverPolicy`. It exists so the harness can be exercised end to end
// (CLI demo, integration tests) without a hand-built circuit. Each policy is
// chosen to land on one verdict:
//
//   FirstOpenColumn  always picks a legal column      → Pass
//   FirstColumn      always picks column 0            → Pass, or IllegalMove
//                                                       once column 0 is full
//   Silent           never lights anything            → NoOutput
//   AllColumns       lights every output              → MultipleOutputs
//
// Outputs are repeaters placed by `install`; the circuit only toggles their
// power, so removing a repeater out from under it makes that slot dark.

use std::fmt;
use std::str::FromStr;

use circuit_checker_sim::circuit::Circuit;
use circuit_checker_sim::types::{Cell, CellCoord};
use circuit_checker_sim::world::CellWorld;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{COLS, LogicalBoard};
use crate::codec;
use crate::config::FixtureGeometry;

/// How a `ReferenceCircuit` picks its output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolverPolicy {
    #[default]
    FirstOpenColumn,
    FirstColumn,
    Silent,
    AllColumns,
}

impl SolverPolicy {
    pub const ALL: [SolverPolicy; 4] = [
        SolverPolicy::FirstOpenColumn,
        SolverPolicy::FirstColumn,
        SolverPolicy::Silent,
        SolverPolicy::AllColumns,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SolverPolicy::FirstOpenColumn => "first-open-column",
            SolverPolicy::FirstColumn => "first-column",
            SolverPolicy::Silent => "silent",
            SolverPolicy::AllColumns => "all-columns",
        }
    }

    /// Output pattern this policy produces for `board`.
    pub fn choose(self, board: &LogicalBoard) -> [bool; COLS] {
        let mut outputs = [false; COLS];
        match self {
            SolverPolicy::FirstOpenColumn => {
                if let Some(col) = board.open_columns().next() {
                    outputs[col] = true;
                }
            }
            SolverPolicy::FirstColumn => outputs[0] = true,
            SolverPolicy::Silent => {}
            SolverPolicy::AllColumns => outputs = [true; COLS],
        }
        outputs
    }
}

impl fmt::Display for SolverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown solver policy `{0}`")]
pub struct UnknownPolicy(pub String);

impl FromStr for SolverPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolverPolicy::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPolicy(s.to_owned()))
    }
}

/// A circuit that solves boards by a fixed policy.
#[derive(Clone, Debug)]
pub struct ReferenceCircuit {
    anchor: CellCoord,
    geometry: FixtureGeometry,
    policy: SolverPolicy,
}

impl ReferenceCircuit {
    pub fn new(anchor: CellCoord, geometry: FixtureGeometry, policy: SolverPolicy) -> Self {
        Self {
            anchor,
            geometry,
            policy,
        }
    }

    /// Place an unpowered repeater on every output slot of the fixture.
    pub fn install(&self, world: &mut CellWorld) {
        for slot in 0..COLS {
            if let Some(coord) = codec::output_coord(self.anchor, &self.geometry, slot) {
                world.set(coord, Cell::repeater(false));
            }
        }
    }
}

impl Circuit for ReferenceCircuit {
    fn name(&self) -> &str {
        self.policy.name()
    }

    fn update(&mut self, world: &mut CellWorld, _tick: u64) {
        let board = codec::read_inputs(self.anchor, &self.geometry, |c| world.get(c).kind);
        let outputs = self.policy.choose(&board);
        for (slot, on) in outputs.into_iter().enumerate() {
            if let Some(coord) = codec::output_coord(self.anchor, &self.geometry, slot) {
                world.set_repeater_power(coord, on);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ROWS;
    use crate::env::Environment;
    use crate::verdict::{Verdict, classify};
    use circuit_checker_sim::sim::SimWorld;

    const ANCHOR: CellCoord = CellCoord::new(2, 0, 0);

    fn board_with_full_column(col: usize) -> LogicalBoard {
        let mut codes = [[0u8; COLS]; ROWS];
        for (row, line) in codes.iter_mut().enumerate() {
            line[col] = if row % 2 == 0 { 1 } else { 2 };
        }
        LogicalBoard::from_codes(codes).unwrap()
    }

    fn run(policy: SolverPolicy, board: &LogicalBoard) -> Verdict {
        let geometry = FixtureGeometry::default();
        let mut sim = SimWorld::new(4, (64, 32, 40));
        let circuit = ReferenceCircuit::new(ANCHOR, geometry, policy);
        circuit.install(&mut sim.world);
        sim.install_circuit(Box::new(circuit));

        for (coord, active) in codec::encode_inputs(ANCHOR, &geometry, board) {
            sim.set_cell(coord, active);
        }
        sim.step();
        classify(board, &codec::decode_outputs(ANCHOR, &geometry, &sim))
    }

    #[test]
    fn policies_produce_their_verdicts() {
        let board = board_with_full_column(0);
        assert_eq!(
            run(SolverPolicy::FirstOpenColumn, &board),
            Verdict::Pass { column: 1 }
        );
        assert_eq!(
            run(SolverPolicy::FirstColumn, &board),
            Verdict::IllegalMove { column: 0 }
        );
        assert_eq!(run(SolverPolicy::Silent, &board), Verdict::NoOutput);
        assert_eq!(
            run(SolverPolicy::AllColumns, &board),
            Verdict::MultipleOutputs { count: COLS }
        );
    }

    #[test]
    fn first_column_passes_on_empty_board() {
        assert_eq!(
            run(SolverPolicy::FirstColumn, &LogicalBoard::empty()),
            Verdict::Pass { column: 0 }
        );
    }

    #[test]
    fn circuit_follows_input_changes() {
        let geometry = FixtureGeometry::default();
        let mut sim = SimWorld::new(4, (64, 32, 40));
        let circuit = ReferenceCircuit::new(ANCHOR, geometry, SolverPolicy::FirstOpenColumn);
        circuit.install(&mut sim.world);
        sim.install_circuit(Box::new(circuit));

        sim.step();
        assert!(codec::decode_outputs(ANCHOR, &geometry, &sim)[0]);

        let board = board_with_full_column(0);
        for (coord, active) in codec::encode_inputs(ANCHOR, &geometry, &board) {
            sim.set_cell(coord, active);
        }
        sim.step();
        let outputs = codec::decode_outputs(ANCHOR, &geometry, &sim);
        assert_eq!(outputs, [false, true, false, false, false, false, false]);
    }

    #[test]
    fn missing_repeaters_stay_dark() {
        let geometry = FixtureGeometry::default();
        let mut sim = SimWorld::new(4, (64, 32, 40));
        sim.install_circuit(Box::new(ReferenceCircuit::new(
            ANCHOR,
            geometry,
            SolverPolicy::AllColumns,
        )));
        sim.step();
        assert_eq!(codec::decode_outputs(ANCHOR, &geometry, &sim), [false; COLS]);
    }

    #[test]
    fn circuit_at_coordinate_limit_leaves_world_untouched() {
        let geometry = FixtureGeometry::default();
        let anchor = CellCoord::new(i32::MAX - 10, 0, 0);
        let mut sim = SimWorld::new(4, (64, 32, 40));
        let circuit = ReferenceCircuit::new(anchor, geometry, SolverPolicy::AllColumns);
        circuit.install(&mut sim.world);
        sim.install_circuit(Box::new(circuit));
        sim.step();
        assert_eq!(codec::decode_outputs(anchor, &geometry, &sim), [false; COLS]);
    }

    #[test]
    fn policy_names_parse_back() {
        for policy in SolverPolicy::ALL {
            assert_eq!(policy.name().parse::<SolverPolicy>(), Ok(policy));
        }
        assert_eq!(
            "best".parse::<SolverPolicy>(),
            Err(UnknownPolicy("best".into()))
        );
    }
}
