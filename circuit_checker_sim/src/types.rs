// Core types shared across the cell world.
//
// Defines spatial coordinates (`CellCoord`), the identity types for worlds
// and players (UUID v4 wrappers minted from the PRNG), and the cell model
// (`CellKind` + `Cell`). Everything derives serde so fixtures and configs can
// name coordinates in JSON.

use circuit_checker_prng::GameRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D cell grid, in cell units.
///
/// - X: east (positive) / west (negative)
/// - Y: up (positive) / down (negative)
/// - Z: south (positive) / north (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// This coordinate shifted by `(dx, dy, dz)`, or `None` if any axis
    /// leaves the `i32` range.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Identities: UUID v4 from the PRNG
// ---------------------------------------------------------------------------

/// A UUID v4 drawn from a `GameRng`.
///
/// RFC 4122 layout: version nibble (byte 6, high half) is `0100`, variant
/// bits (byte 8, top two) are `10`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimUuid([u8; 16]);

impl SimUuid {
    pub fn new_v4(rng: &mut GameRng) -> Self {
        let mut bytes = rng.next_128_bits();
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;
        Self(bytes)
    }

    /// Parse the 8-4-4-4-12 hex form. Dashes are optional.
    pub fn parse(s: &str) -> Option<Self> {
        let hex: Vec<u8> = s.bytes().filter(|&b| b != b'-').collect();
        if hex.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, pair) in hex.chunks_exact(2).enumerate() {
            let pair = std::str::from_utf8(pair).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// Serialized as the hex string so ids work as JSON map keys.
impl Serialize for SimUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SimUuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SimUuid::parse(&s).ok_or_else(|| serde::de::Error::custom("invalid UUID format"))
    }
}

impl fmt::Debug for SimUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimUuid({self})")
    }
}

impl fmt::Display for SimUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub SimUuid);

        impl $name {
            pub fn new(rng: &mut GameRng) -> Self {
                Self(SimUuid::new_v4(rng))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

entity_id!(
    /// Persistent identity of a simulated world. Survives in-memory moves
    /// but changes when the world is unloaded and reloaded.
    WorldId
);
entity_id!(
    /// A player (the actor who requests verifications and receives reports).
    PlayerId
);

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// What occupies a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Air,
    /// Always-on power source. Input cells are written as these.
    PowerSource,
    /// Signal carrier with an on/off state. Output cells are read from these.
    Repeater,
    /// Inert building material.
    Solid,
}

/// One grid cell: its kind and whether it is currently powered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub powered: bool,
}

impl Cell {
    pub const AIR: Cell = Cell {
        kind: CellKind::Air,
        powered: false,
    };

    pub const POWER_SOURCE: Cell = Cell {
        kind: CellKind::PowerSource,
        powered: true,
    };

    pub const fn repeater(powered: bool) -> Self {
        Self {
            kind: CellKind::Repeater,
            powered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_v4_version_and_variant_bits() {
        let mut rng = GameRng::new(42);
        for _ in 0..500 {
            let bytes = *SimUuid::new_v4(&mut rng).as_bytes();
            assert_eq!(bytes[6] >> 4, 4, "UUID version must be 4");
            assert_eq!(bytes[8] >> 6, 2, "UUID variant must be RFC 4122");
        }
    }

    #[test]
    fn uuid_display_parses_back() {
        let mut rng = GameRng::new(5);
        let uuid = SimUuid::new_v4(&mut rng);
        let s = uuid.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(&s[8..9], "-");
        assert_eq!(&s[23..24], "-");
        assert_eq!(SimUuid::parse(&s), Some(uuid));
    }

    #[test]
    fn uuid_parse_rejects_garbage() {
        assert_eq!(SimUuid::parse("not-a-uuid"), None);
        assert_eq!(SimUuid::parse(&"zz".repeat(16)), None);
    }

    #[test]
    fn world_ids_from_same_seed_match() {
        let mut a = GameRng::new(11);
        let mut b = GameRng::new(11);
        assert_eq!(WorldId::new(&mut a), WorldId::new(&mut b));
        assert_ne!(WorldId::new(&mut a), WorldId::new(&mut GameRng::new(12)));
    }

    #[test]
    fn player_id_json_is_a_string() {
        let mut rng = GameRng::new(1);
        let player = PlayerId::new(&mut rng);
        let json = serde_json::to_string(&player).unwrap();
        assert!(json.starts_with('"'));
        let restored: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(player, restored);
    }

    #[test]
    fn coord_offset() {
        let c = CellCoord::new(10, 20, 30).offset(-1, 26, 6);
        assert_eq!(c, Some(CellCoord::new(9, 46, 36)));
    }

    #[test]
    fn coord_offset_past_i32_range_is_none() {
        assert_eq!(CellCoord::new(i32::MAX - 10, 0, 0).offset(51, 0, 0), None);
        assert_eq!(CellCoord::new(0, i32::MIN, 0).offset(0, -1, 0), None);
        assert_eq!(CellCoord::new(0, 0, i32::MAX).offset(0, 0, 1), None);
        assert_eq!(
            CellCoord::new(i32::MAX - 10, 0, 0).offset(10, 0, 0),
            Some(CellCoord::new(i32::MAX, 0, 0))
        );
    }
}
