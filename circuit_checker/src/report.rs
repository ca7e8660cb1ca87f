// Reports sent back to the player who asked for a verification.
//
// The engine produces `Report`s and hands them to a `ReportSink` together
// with the recipient. How they reach the player is the sink's business: the
// host uses `ChannelSink` to forward them over an `mpsc` channel, tests use
// `MemorySink` to collect them in order.
//
// Only the kind of report is load-bearing. The `Display` text mirrors what a
// player sees in chat and may change freely.

use std::fmt;
use std::sync::mpsc::Sender;

use circuit_checker_sim::types::PlayerId;
use serde::Serialize;

use crate::error::VerifyError;
use crate::verdict::Verdict;

/// A message for a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    /// Debug notice that the board is being written to the fixture inputs.
    SettingInputs,
    /// A finished verification.
    Verdict(Verdict),
    /// A request that could not be started.
    Rejected(VerifyError),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::SettingInputs => write!(f, "[CC-DEBUG] Setting inputs..."),
            Report::Verdict(verdict) => write!(f, "[CC] {verdict}"),
            Report::Rejected(err) => write!(f, "[CC] Cannot verify: {err}"),
        }
    }
}

/// A report addressed to a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub player: PlayerId,
    pub report: Report,
}

/// Where reports go.
pub trait ReportSink {
    fn send(&mut self, player: PlayerId, report: Report);
}

/// Forwards every report over a channel. A closed receiver drops reports.
pub struct ChannelSink {
    tx: Sender<Delivery>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Delivery>) -> Self {
        Self { tx }
    }
}

impl ReportSink for ChannelSink {
    fn send(&mut self, player: PlayerId, report: Report) {
        // A receiver that went away just means nobody is listening anymore.
        let _ = self.tx.send(Delivery { player, report });
    }
}

/// Keeps every report in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub deliveries: Vec<Delivery>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdicts only, in arrival order.
    pub fn verdicts(&self) -> Vec<Verdict> {
        self.deliveries
            .iter()
            .filter_map(|d| match d.report {
                Report::Verdict(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn send(&mut self, player: PlayerId, report: Report) {
        self.deliveries.push(Delivery { player, report });
    }
}

/// JSON line form of a delivery, used by the CLI's `--json` output.
#[derive(Serialize)]
pub struct DeliveryRecord {
    pub player: PlayerId,
    pub message: String,
    pub verdict: Option<Verdict>,
}

impl From<&Delivery> for DeliveryRecord {
    fn from(delivery: &Delivery) -> Self {
        Self {
            player: delivery.player,
            message: delivery.report.to_string(),
            verdict: match delivery.report {
                Report::Verdict(v) => Some(v),
                _ => None,
            },
        }
    }
}
