// CLI entry point for the circuit checker.
//
// Starts a host, brings one player online, builds a reference circuit in a
// fixture named `demo`, and verifies it `--runs` times in a row, printing
// every report the player receives. Exits non-zero if any run failed to
// pass. See `host.rs` for the tick thread and `reference.rs` for the solver
// policies.
//
// Usage:
//   checker [OPTIONS]
//     --config <PATH>     JSON config file (default: built-in defaults)
//     --policy <NAME>     Reference circuit policy (default: first-open-column)
//     --runs <N>          Verifications to run (default: 3)
//     --json              Print reports as JSON lines
//
// Logging goes to stderr and is filtered by `RUST_LOG` (default: info).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use circuit_checker::config::CheckerConfig;
use circuit_checker::reference::SolverPolicy;
use circuit_checker::report::{Delivery, DeliveryRecord, Report};
use circuit_checker::start_host;
use circuit_checker_prng::GameRng;
use circuit_checker_sim::types::{CellCoord, PlayerId};
use tracing_subscriber::EnvFilter;

const FIXTURE: &str = "demo";
const ANCHOR: CellCoord = CellCoord::new(8, 4, 8);
/// How long to wait for a single run's verdict before giving up.
const RUN_TIMEOUT: Duration = Duration::from_secs(120);

struct Options {
    config: Option<PathBuf>,
    policy: SolverPolicy,
    runs: u32,
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args();
    let config = match &options.config {
        Some(path) => match CheckerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => CheckerConfig::default(),
    };

    let player = PlayerId::new(&mut GameRng::new(config.world_seed));
    let (host, deliveries) = start_host(config);
    host.join(player);
    host.register_fixture(FIXTURE, ANCHOR, Some(options.policy));

    let mut failures = 0;
    for _ in 0..options.runs {
        host.verify(player, FIXTURE);
        match wait_for_outcome(&deliveries, options.json) {
            Some(true) => {}
            Some(false) => failures += 1,
            None => {
                eprintln!("No verdict within {RUN_TIMEOUT:?}");
                failures += 1;
                break;
            }
        }
    }

    host.stop();
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failures} of {} runs did not pass", options.runs);
        ExitCode::FAILURE
    }
}

/// Print deliveries until one ends the run. Returns whether it passed, or
/// `None` if nothing conclusive arrived in time.
fn wait_for_outcome(deliveries: &Receiver<Delivery>, json: bool) -> Option<bool> {
    loop {
        let delivery = deliveries.recv_timeout(RUN_TIMEOUT).ok()?;
        print_delivery(&delivery, json);
        match delivery.report {
            Report::SettingInputs => {}
            Report::Verdict(verdict) => return Some(verdict.passed()),
            Report::Rejected(_) => return Some(false),
        }
    }
}

fn print_delivery(delivery: &Delivery, json: bool) {
    if !json {
        println!("{}", delivery.report);
        return;
    }
    match serde_json::to_string(&DeliveryRecord::from(delivery)) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("Failed to encode report: {e}"),
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching.
fn parse_args() -> Options {
    let mut options = Options {
        config: None,
        policy: SolverPolicy::default(),
        runs: 3,
        json: false,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                options.config = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }));
            }
            "--policy" => {
                i += 1;
                options.policy = match args.get(i).map(|s| s.parse::<SolverPolicy>()) {
                    Some(Ok(policy)) => policy,
                    Some(Err(e)) => {
                        eprintln!("{e}");
                        std::process::exit(1);
                    }
                    None => {
                        eprintln!("--policy requires a value");
                        std::process::exit(1);
                    }
                };
            }
            "--runs" => {
                i += 1;
                options.runs = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--runs requires a valid number");
                    std::process::exit(1);
                });
            }
            "--json" => options.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_usage() {
    println!("Usage: checker [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>     JSON config file (default: built-in defaults)");
    println!("  --policy <NAME>     Reference circuit policy (default: first-open-column)");
    println!("                      one of: first-open-column, first-column, silent, all-columns");
    println!("  --runs <N>          Verifications to run (default: 3)");
    println!("  --json              Print reports as JSON lines");
    println!("  --help, -h          Show this help");
}
