// Verification entry point.
//
// `Verifier::verify` turns "player P wants fixture F checked" into a running
// task:
//
//   1. Resolve the fixture name to an anchor (`FixtureNotFound` if unknown).
//   2. Resolve the player in the environment (`UserUnresolved` if offline).
//   3. Draw a fresh board from the generator.
//   4. Tell the player inputs are being set, then write every input cell.
//   5. After the settle delay, hand the task to the registry.
//
// Steps 1-4 run on the caller's thread, which is the tick thread in the
// host. Step 5 runs on a short-lived timer thread that only talks to the
// registry through its `TaskSender`; the task is built before the thread is
// spawned, bound to the world identity the inputs were written into.
//
// A zero settle delay skips the thread and queues the task before step 4.
// The registry admits it at its next tick, after the writes, so the order
// the task observes is unchanged; a stopped registry is reported before the
// player hears anything or the world changes.
//
// Failures in steps 1-2 leave the world untouched and send nothing to the
// player; the caller decides how to surface them.

use std::thread;
use std::time::Duration;

use circuit_checker_sim::types::{CellCoord, PlayerId};
use tracing::{debug, warn};

use crate::board::{BoardGenerator, LogicalBoard};
use crate::codec;
use crate::config::FixtureGeometry;
use crate::env::Environment;
use crate::error::VerifyError;
use crate::fixture::FixtureRegistry;
use crate::registry::TaskSender;
use crate::report::{Report, ReportSink};
use crate::task::{TaskId, VerificationTask};

/// Starts verifications and hands their tasks to a registry.
pub struct Verifier<G: BoardGenerator> {
    fixtures: FixtureRegistry,
    generator: G,
    geometry: FixtureGeometry,
    settle_delay: Duration,
    tasks: TaskSender,
    next_task_id: u64,
}

impl<G: BoardGenerator> Verifier<G> {
    pub fn new(
        generator: G,
        geometry: FixtureGeometry,
        settle_delay: Duration,
        tasks: TaskSender,
    ) -> Self {
        Self {
            fixtures: FixtureRegistry::new(),
            generator,
            geometry,
            settle_delay,
            tasks,
            next_task_id: 1,
        }
    }

    pub fn fixtures_mut(&mut self) -> &mut FixtureRegistry {
        &mut self.fixtures
    }

    pub fn geometry(&self) -> &FixtureGeometry {
        &self.geometry
    }

    /// Start verifying fixture `fixture_name` on behalf of `user`.
    ///
    /// On success the board is already written and the task will join the
    /// registry after the settle delay. The returned id names that task.
    pub fn verify(
        &mut self,
        env: &mut dyn Environment,
        sink: &mut dyn ReportSink,
        user: PlayerId,
        fixture_name: &str,
    ) -> Result<TaskId, VerifyError> {
        let anchor = self
            .fixtures
            .lookup(fixture_name)
            .ok_or_else(|| VerifyError::FixtureNotFound(fixture_name.to_owned()))?;
        if !env.has_player(user) {
            return Err(VerifyError::UserUnresolved(user));
        }

        let board = self.generator.generate();
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;

        let task = VerificationTask::new(id, user, env.identity(), anchor, self.geometry, board);
        if self.settle_delay.is_zero() {
            self.tasks.add_task(task)?;
            self.write_inputs(env, sink, user, id, fixture_name, anchor, &board);
            return Ok(id);
        }

        self.write_inputs(env, sink, user, id, fixture_name, anchor, &board);

        let tasks = self.tasks.clone();
        let delay = self.settle_delay;
        thread::spawn(move || {
            thread::sleep(delay);
            if let Err(err) = tasks.add_task(task) {
                warn!(task = %id, %err, "dropping task after settle delay");
            }
        });
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    fn write_inputs(
        &self,
        env: &mut dyn Environment,
        sink: &mut dyn ReportSink,
        user: PlayerId,
        id: TaskId,
        fixture_name: &str,
        anchor: CellCoord,
        board: &LogicalBoard,
    ) {
        sink.send(user, Report::SettingInputs);
        debug!(
            task = %id,
            fixture = fixture_name,
            %anchor,
            occupied = board.occupied_count(),
            "setting inputs"
        );
        for (coord, active) in codec::encode_inputs(anchor, &self.geometry, board) {
            env.set_cell(coord, active);
        }
    }
}
