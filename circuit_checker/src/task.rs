// Verification tasks: one attempt to verify a circuit against one board.
//
// A task is created (by the verifier, after the settle delay) bound to the
// identity of the world its inputs were written into, the fixture anchor,
// and the board under test. From then on it is driven exclusively by
// `TaskRegistry::on_tick`, which calls `advance` exactly once per tick.
//
// ## Lifecycle
//
//   Pending ──first advance──▶ Running ──elapsed == TOTAL_TICKS──▶ Completed
//      │                          │
//      └──────world changed───────┴──────────────────────────────▶ Aborted
//
// - The first `advance` issues the one-time speed-up request to the world
//   (`TOTAL_TICKS * test_sequence` ticks) and moves Pending → Running. The
//   request is guarded by `sprint_issued`, not by the tick counter.
// - Every `advance` counts one tick. The counter advances once per call no
//   matter how fast the world is running, so the wait is measured in
//   world ticks.
// - On the call where `elapsed` reaches `TOTAL_TICKS` the outputs are
//   decoded, classified, and reported, and the task is retired. This is the
//   only place a verdict is produced, so a task is evaluated at most once.
// - If the world passed to `advance` is not the one the task was bound to
//   (the world was reloaded), the task retires without evaluating and
//   without telling the player.
//
// See also: `registry.rs` for the scheduler, `verdict.rs` for
// classification, `codec.rs` for output decoding.

use circuit_checker_sim::types::{CellCoord, PlayerId, WorldId};
use tracing::{info, warn};

use crate::board::LogicalBoard;
use crate::codec;
use crate::config::FixtureGeometry;
use crate::env::Environment;
use crate::error::VerifyError;
use crate::report::{Report, ReportSink};
use crate::verdict::{self, Verdict};

/// Ticks a circuit gets to settle on an answer.
pub const TOTAL_TICKS: u32 = 600;

/// Compact identifier for a verification task, assigned by the verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Lifecycle state of a task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    /// Registered, speed-up not yet requested.
    Pending,
    /// Counting ticks.
    Running,
    /// Evaluated and reported.
    Completed(Verdict),
    /// Discarded without evaluation.
    Aborted(VerifyError),
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed(_) | TaskState::Aborted(_))
    }
}

/// One verification attempt.
#[derive(Clone, Debug)]
pub struct VerificationTask {
    id: TaskId,
    player: PlayerId,
    world: WorldId,
    anchor: CellCoord,
    geometry: FixtureGeometry,
    board: LogicalBoard,
    /// How many back-to-back runs this task accounts for. Always 1 today.
    test_sequence: u32,
    elapsed: u32,
    sprint_issued: bool,
    state: TaskState,
}

impl VerificationTask {
    pub fn new(
        id: TaskId,
        player: PlayerId,
        world: WorldId,
        anchor: CellCoord,
        geometry: FixtureGeometry,
        board: LogicalBoard,
    ) -> Self {
        Self {
            id,
            player,
            world,
            anchor,
            geometry,
            board,
            test_sequence: 1,
            elapsed: 0,
            sprint_issued: false,
            state: TaskState::Pending,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn board(&self) -> &LogicalBoard {
        &self.board
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Ticks requested from the world on the first advance.
    pub fn sprint_ticks(&self) -> u64 {
        u64::from(TOTAL_TICKS) * u64::from(self.test_sequence)
    }

    /// Advance one tick. Returns whether the task is still live; the caller
    /// must drop it once this returns `false`.
    pub fn advance(&mut self, env: &mut dyn Environment, sink: &mut dyn ReportSink) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        let current = env.identity();
        if current != self.world {
            let err = VerifyError::EnvironmentMismatch {
                bound: self.world,
                current,
            };
            warn!(task = %self.id, elapsed = self.elapsed, %err, "aborting verification");
            self.state = TaskState::Aborted(err);
            return false;
        }

        if !self.sprint_issued {
            self.sprint_issued = true;
            env.advance_simulation_by(self.sprint_ticks());
            self.state = TaskState::Running;
        }

        self.elapsed += 1;
        if self.elapsed < TOTAL_TICKS {
            return true;
        }

        let outputs = codec::decode_outputs(self.anchor, &self.geometry, env);
        let verdict = verdict::classify(&self.board, &outputs);
        info!(task = %self.id, player = %self.player, ?verdict, "verification finished");
        sink.send(self.player, Report::Verdict(verdict));
        self.state = TaskState::Completed(verdict);
        false
    }
}
