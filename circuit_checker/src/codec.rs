// Board codec: logical boards to physical cells and back.
//
// Pure coordinate arithmetic over a fixture's anchor and `FixtureGeometry`.
// Coordinates are computed, never searched for. A malformed fixture (the
// wrong kind of cell where an output should be, a fixture hanging off the
// grid, or one whose cells fall outside the `i32` coordinate range) reads as
// "inactive" rather than failing; the problem then surfaces as a "no output"
// or "multiple outputs" verdict. Cells with no representable coordinate get
// no input writes.
//
// Layout, relative to the anchor, for input cell (row, col):
//
//   MarkerA: input_origin + (0, -row * row_step, col * col_step)
//   MarkerB: the MarkerA coordinate + (0, 0, marker_b_offset)
//
// and for output slot i:
//
//   output_origin + (0, 0, i * output_step)
//
// See also: `config.rs` for the geometry defaults, `task.rs` which decodes
// outputs at the end of a run, `verifier.rs` which applies the encoded
// writes.

use circuit_checker_sim::types::{CellCoord, CellKind};

use crate::board::{COLS, CellState, LogicalBoard, ROWS};
use crate::config::FixtureGeometry;
use crate::env::Environment;

/// MarkerA and MarkerB coordinates of board cell `(row, col)`, or `None` if
/// either falls outside the coordinate range.
pub fn input_coords(
    anchor: CellCoord,
    geometry: &FixtureGeometry,
    row: usize,
    col: usize,
) -> Option<(CellCoord, CellCoord)> {
    let (ox, oy, oz) = geometry.input_origin;
    let marker_a = anchor.offset(
        ox,
        oy.checked_sub(scaled(row, geometry.row_step)?)?,
        oz.checked_add(scaled(col, geometry.col_step)?)?,
    )?;
    let marker_b = marker_a.offset(0, 0, geometry.marker_b_offset)?;
    Some((marker_a, marker_b))
}

/// Coordinate of output slot `slot`, or `None` if it falls outside the
/// coordinate range.
pub fn output_coord(
    anchor: CellCoord,
    geometry: &FixtureGeometry,
    slot: usize,
) -> Option<CellCoord> {
    let (ox, oy, oz) = geometry.output_origin;
    anchor.offset(ox, oy, oz.checked_add(scaled(slot, geometry.output_step)?)?)
}

/// `index * step` without overflow.
fn scaled(index: usize, step: i32) -> Option<i32> {
    i32::try_from(index).ok()?.checked_mul(step)
}

/// Every input write needed to present `board` at `anchor`.
///
/// Two entries per board cell (MarkerA coordinate, then MarkerB), so empty
/// cells clear whatever a previous run left behind.
pub fn encode_inputs(
    anchor: CellCoord,
    geometry: &FixtureGeometry,
    board: &LogicalBoard,
) -> Vec<(CellCoord, bool)> {
    board
        .iter()
        .filter_map(|(row, col, state)| {
            let (a, b) = input_coords(anchor, geometry, row, col)?;
            Some([(a, state.has_marker_a()), (b, state.has_marker_b())])
        })
        .flatten()
        .collect()
}

/// Read the output bank. A slot is on only if it holds a powered repeater.
pub fn decode_outputs(
    anchor: CellCoord,
    geometry: &FixtureGeometry,
    env: &dyn Environment,
) -> [bool; COLS] {
    let mut outputs = [false; COLS];
    for (slot, out) in outputs.iter_mut().enumerate() {
        *out = output_coord(anchor, geometry, slot).is_some_and(|coord| {
            env.cell_kind(coord) == CellKind::Repeater && env.is_activated(coord)
        });
    }
    outputs
}

/// Reconstruct the board currently presented at `anchor`, given a way to
/// look up cell kinds. A marker is present where a power source sits.
pub fn read_inputs(
    anchor: CellCoord,
    geometry: &FixtureGeometry,
    kind_at: impl Fn(CellCoord) -> CellKind,
) -> LogicalBoard {
    let mut cells = [[CellState::Empty; COLS]; ROWS];
    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            if let Some((a, b)) = input_coords(anchor, geometry, row, col) {
                *cell = CellState::from_markers(
                    kind_at(a) == CellKind::PowerSource,
                    kind_at(b) == CellKind::PowerSource,
                );
            }
        }
    }
    LogicalBoard::from_cells(cells)
}
