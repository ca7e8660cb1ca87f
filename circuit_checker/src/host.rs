// Host loop: the tick thread that owns the world and runs verifications.
//
// Architecture: one tick thread with a command channel in front of it.
//
// - **Tick thread** (spawned by `start_host`): owns the `SimWorld`, the
//   `TaskRegistry` and the `Verifier`. Each iteration it drains pending
//   `HostCommand`s, steps the world, runs `registry.on_tick`, and then
//   sleeps one tick duration unless the world has sprint ticks left.
// - **Settle timers** (spawned by the verifier): sleep, then push a task
//   into the registry's inbox. They never touch the world.
// - **Callers** talk to the tick thread only through `HostHandle`, and read
//   reports from the `Receiver<Delivery>` returned alongside it.
//
// Commands are applied at the top of a tick, before the world steps, so a
// `Verify` writes its inputs between two ticks and the circuit sees them on
// the very next step.
//
// Shutdown: `HostHandle::stop` clears `keep_running` and joins the thread.
// Dropping the handle without stopping closes the command channel, which
// also ends the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use circuit_checker_sim::sim::SimWorld;
use circuit_checker_sim::types::{CellCoord, PlayerId};
use tracing::{debug, info, warn};

use crate::board::RandomBoardGenerator;
use crate::config::CheckerConfig;
use crate::reference::{ReferenceCircuit, SolverPolicy};
use crate::registry::TaskRegistry;
use crate::report::{ChannelSink, Delivery, Report, ReportSink};
use crate::verifier::Verifier;

/// Requests applied by the tick thread at the start of a tick.
#[derive(Clone, Debug)]
pub enum HostCommand {
    /// Bring a player online.
    Join(PlayerId),
    /// Take a player offline. Their running tasks still finish.
    Leave(PlayerId),
    /// Register (or move) a named fixture. With `reference` set, also build
    /// a `ReferenceCircuit` with that policy at the anchor.
    RegisterFixture {
        name: String,
        anchor: CellCoord,
        reference: Option<SolverPolicy>,
    },
    /// Start a verification of `fixture` for `player`.
    Verify { player: PlayerId, fixture: String },
    /// Unload and reload the world, giving it a new identity.
    ReloadWorld,
}

/// Handle returned by `start_host` to drive and stop the tick thread.
pub struct HostHandle {
    commands: Sender<HostCommand>,
    keep_running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl HostHandle {
    /// Queue a command. Returns `false` if the tick thread has exited.
    pub fn send(&self, command: HostCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn join(&self, player: PlayerId) -> bool {
        self.send(HostCommand::Join(player))
    }

    pub fn leave(&self, player: PlayerId) -> bool {
        self.send(HostCommand::Leave(player))
    }

    pub fn register_fixture(
        &self,
        name: impl Into<String>,
        anchor: CellCoord,
        reference: Option<SolverPolicy>,
    ) -> bool {
        self.send(HostCommand::RegisterFixture {
            name: name.into(),
            anchor,
            reference,
        })
    }

    pub fn verify(&self, player: PlayerId, fixture: impl Into<String>) -> bool {
        self.send(HostCommand::Verify {
            player,
            fixture: fixture.into(),
        })
    }

    pub fn reload_world(&self) -> bool {
        self.send(HostCommand::ReloadWorld)
    }

    /// Signal the tick thread to stop and wait for it to shut down.
    pub fn stop(mut self) {
        self.keep_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Start the tick thread. Returns its handle and the stream of reports
/// addressed to players.
pub fn start_host(config: CheckerConfig) -> (HostHandle, Receiver<Delivery>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (delivery_tx, delivery_rx) = mpsc::channel();
    let keep_running = Arc::new(AtomicBool::new(true));
    let keep_running_clone = keep_running.clone();

    let thread = thread::spawn(move || {
        run_host(config, command_rx, delivery_tx, keep_running_clone);
    });

    (
        HostHandle {
            commands: command_tx,
            keep_running,
            thread: Some(thread),
        },
        delivery_rx,
    )
}

/// State owned by the tick thread.
struct Host {
    world: SimWorld,
    registry: TaskRegistry,
    verifier: Verifier<RandomBoardGenerator>,
    sink: ChannelSink,
}

/// Main tick loop. Runs until `keep_running` is cleared or the handle is
/// dropped.
fn run_host(
    config: CheckerConfig,
    commands: Receiver<HostCommand>,
    deliveries: Sender<Delivery>,
    keep_running: Arc<AtomicBool>,
) {
    let registry = TaskRegistry::new();
    let verifier = Verifier::new(
        RandomBoardGenerator::new(config.generator_seed),
        config.geometry,
        config.settle_delay(),
        registry.sender(),
    );
    let mut host = Host {
        world: SimWorld::new(config.world_seed, config.world_size),
        registry,
        verifier,
        sink: ChannelSink::new(deliveries),
    };
    let tick_duration = config.tick_duration();
    info!(world = %host.world.id, ?tick_duration, "host started");

    'ticks: while keep_running.load(Ordering::SeqCst) {
        loop {
            match commands.try_recv() {
                Ok(command) => host.handle_command(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'ticks,
            }
        }

        host.world.step();
        host.registry.on_tick(&mut host.world, &mut host.sink);

        if !host.world.take_sprint_tick() {
            thread::sleep(tick_duration);
        }
    }

    info!(
        tick = host.world.tick,
        live_tasks = host.registry.len(),
        "host stopped"
    );
}

impl Host {
    fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::Join(player) => {
                self.world.join(player);
                debug!(%player, "joined");
            }
            HostCommand::Leave(player) => {
                self.world.leave(player);
                debug!(%player, "left");
            }
            HostCommand::RegisterFixture {
                name,
                anchor,
                reference,
            } => {
                let geometry = *self.verifier.geometry();
                if let Some(policy) = reference {
                    let circuit = ReferenceCircuit::new(anchor, geometry, policy);
                    circuit.install(&mut self.world.world);
                    self.world.install_circuit(Box::new(circuit));
                }
                info!(fixture = %name, %anchor, ?reference, "fixture registered");
                self.verifier.fixtures_mut().register(name, anchor);
            }
            HostCommand::Verify { player, fixture } => {
                match self
                    .verifier
                    .verify(&mut self.world, &mut self.sink, player, &fixture)
                {
                    Ok(task) => debug!(%task, %player, %fixture, "verification started"),
                    Err(err) => {
                        warn!(%player, %fixture, %err, "verification rejected");
                        self.sink.send(player, Report::Rejected(err));
                    }
                }
            }
            HostCommand::ReloadWorld => {
                let old = self.world.id;
                let new = self.world.reload();
                info!(%old, %new, live_tasks = self.registry.len(), "world reloaded");
            }
        }
    }
}
