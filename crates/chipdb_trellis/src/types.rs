//! Routing graph and tile metadata types served by a [`DeviceProvider`](crate::DeviceProvider).
//!
//! Every wire, arc, and bel reference inside a [`LocationType`] is a
//! [`RelId`]: a tile offset relative to the coordinate that owns the location
//! type, plus a dense index into the location type found at that offset. Since
//! the offset is relative, one definition is valid at every coordinate that
//! shares the location type.

use chipdb_common::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned identity of a routing graph shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocTypeKey(pub String);

impl LocTypeKey {
    /// Creates a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for LocTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A relative reference to a wire, arc, or bel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelId {
    /// Tile offset from the owning coordinate.
    pub rel: Location,
    /// Dense index within the location type at that offset.
    pub id: u32,
}

impl RelId {
    /// Creates a relative reference.
    pub const fn new(rel: Location, id: u32) -> Self {
        Self { rel, id }
    }

    /// Creates a reference into the owning tile itself.
    pub const fn local(id: u32) -> Self {
        Self {
            rel: Location::new(0, 0),
            id,
        }
    }
}

/// Attachment of a wire to a bel port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelPin {
    /// The bel the wire attaches to.
    pub bel: RelId,
    /// Port name on that bel.
    pub pin: String,
}

/// A routing wire of a location type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// Wire name, e.g. `H02E0701`.
    pub name: String,
    /// Arcs driving this wire.
    #[serde(default)]
    pub arcs_uphill: Vec<RelId>,
    /// Arcs driven by this wire.
    #[serde(default)]
    pub arcs_downhill: Vec<RelId>,
    /// Bel ports attached to this wire.
    #[serde(default)]
    pub bel_pins: Vec<BelPin>,
}

/// A directed programmable connection between two wires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    /// Driving wire.
    pub src_wire: RelId,
    /// Driven wire.
    pub sink_wire: RelId,
    /// Type of the physical tile that hosts the switch.
    pub tiletype: String,
    /// Arc class tag, passed through to the consumer.
    #[serde(default)]
    pub cls: u8,
}

/// Signal direction of a bel port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortDirection {
    /// Driven from the routing fabric.
    Input,
    /// Drives the routing fabric.
    Output,
    /// Either direction.
    Inout,
}

impl PortDirection {
    /// Numeric code stored in the database.
    pub fn code(self) -> u32 {
        match self {
            PortDirection::Input => 0,
            PortDirection::Output => 1,
            PortDirection::Inout => 2,
        }
    }
}

/// Connection of a bel port to a routing wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelWire {
    /// The connected wire.
    pub wire: RelId,
    /// Port name on the bel.
    pub pin: String,
    /// Port direction.
    pub dir: PortDirection,
}

/// A placeable primitive of a location type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bel {
    /// Bel name, e.g. `SLICEA` or `PIOB`.
    pub name: String,
    /// Primitive type name, resolved through the identifier table.
    #[serde(rename = "type")]
    pub bel_type: String,
    /// Sub-position within the tile.
    pub z: u32,
    /// Port-to-wire connections.
    #[serde(default)]
    pub wires: Vec<BelWire>,
}

/// A deduplicated routing graph shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationType {
    /// Wires, indexed densely.
    #[serde(default)]
    pub wires: Vec<Wire>,
    /// Arcs, indexed densely.
    #[serde(default)]
    pub arcs: Vec<Arc>,
    /// Bels, indexed densely.
    #[serde(default)]
    pub bels: Vec<Bel>,
}

/// A named physical tile hosted by a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    /// Tile name, e.g. `R2C3:PLC2`.
    pub name: String,
    /// Tile type, e.g. `PLC2`.
    #[serde(rename = "type")]
    pub tile_type: String,
}

/// Global clock quadrant of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Upper left.
    UL,
    /// Upper right.
    UR,
    /// Lower left.
    LL,
    /// Lower right.
    LR,
}

impl Quadrant {
    /// Numeric code stored in the database.
    pub fn code(self) -> u8 {
        match self {
            Quadrant::UL => 0,
            Quadrant::UR => 1,
            Quadrant::LL => 2,
            Quadrant::LR => 3,
        }
    }
}

/// Side from which a tap driver feeds the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TapDirection {
    /// Driven from the left.
    Left,
    /// Driven from the right.
    Right,
}

impl TapDirection {
    /// Numeric code stored in the database.
    pub fn code(self) -> u8 {
        match self {
            TapDirection::Left => 0,
            TapDirection::Right => 1,
        }
    }
}

/// Clock tap driver feeding a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapDriver {
    /// Driving side.
    pub dir: TapDirection,
    /// Column of the driving tap.
    pub col: u16,
}

/// Global clock distribution metadata of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    /// Clock quadrant.
    pub quadrant: Quadrant,
    /// Tap driver.
    pub tap_driver: TapDriver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(Quadrant::UL.code(), 0);
        assert_eq!(Quadrant::LR.code(), 3);
        assert_eq!(TapDirection::Right.code(), 1);
        assert_eq!(PortDirection::Inout.code(), 2);
    }

    #[test]
    fn bel_deserializes_with_uppercase_directions() {
        let json = r#"{
            "name": "SLICEA",
            "type": "TRELLIS_SLICE",
            "z": 0,
            "wires": [
                {"wire": {"rel": {"x": 0, "y": 0}, "id": 3}, "pin": "A0", "dir": "INPUT"},
                {"wire": {"rel": {"x": 0, "y": 0}, "id": 4}, "pin": "F0", "dir": "OUTPUT"}
            ]
        }"#;
        let bel: Bel = serde_json::from_str(json).unwrap();
        assert_eq!(bel.bel_type, "TRELLIS_SLICE");
        assert_eq!(bel.wires[0].dir, PortDirection::Input);
        assert_eq!(bel.wires[1].wire, RelId::local(4));
    }

    #[test]
    fn wire_lists_default_to_empty() {
        let wire: Wire = serde_json::from_str(r#"{"name": "H00L0000"}"#).unwrap();
        assert!(wire.arcs_uphill.is_empty());
        assert!(wire.arcs_downhill.is_empty());
        assert!(wire.bel_pins.is_empty());
    }

    #[test]
    fn negative_relative_offsets() {
        let arc: Arc = serde_json::from_str(
            r#"{
                "src_wire": {"rel": {"x": -1, "y": 0}, "id": 2},
                "sink_wire": {"rel": {"x": 0, "y": 0}, "id": 0},
                "tiletype": "PLC2"
            }"#,
        )
        .unwrap();
        assert_eq!(arc.src_wire.rel, Location::new(-1, 0));
        assert_eq!(arc.cls, 0);
    }

    #[test]
    fn loc_type_key_is_transparent() {
        let key: LocTypeKey = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(key, LocTypeKey::new("a1b2"));
        assert_eq!(key.to_string(), "a1b2");
    }
}
