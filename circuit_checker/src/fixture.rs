// Named fixtures: where in the world each circuit under test lives.
//
// A fixture is just an anchor coordinate. All input and output positions are
// derived from it through `FixtureGeometry` (see `codec.rs`). Names are
// unique; registering an existing name moves the fixture. Fixture regions are
// not checked for overlap.

use std::collections::BTreeMap;

use circuit_checker_sim::types::CellCoord;
use serde::{Deserialize, Serialize};

/// Name to anchor map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRegistry {
    anchors: BTreeMap<String, CellCoord>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` at `anchor`, returning the anchor it replaced.
    pub fn register(&mut self, name: impl Into<String>, anchor: CellCoord) -> Option<CellCoord> {
        self.anchors.insert(name.into(), anchor)
    }

    pub fn lookup(&self, name: &str) -> Option<CellCoord> {
        self.anchors.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<CellCoord> {
        self.anchors.remove(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.anchors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
