//! Static registry of the supported 74xx ICs and their DIP pinouts.
//!
//! The catalog is pure data and constant for the lifetime of the process.
//! [`IcType`] is a closed set, so [`lookup`] is total; the only fallible
//! step is parsing a part number with [`str::parse`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CircuitError;

/// Largest pin count of any package in the catalog.
pub const MAX_PINS: usize = 16;

/// Identifier of a pin on a package: its 1-based DIP pin number.
///
/// Pin identifiers display and parse as `pin-N`.
///
/// ```
/// use dld_trainer_engine::catalog::PinId;
///
/// let pin: PinId = "pin-11".parse().unwrap();
/// assert_eq!(pin, PinId(11));
/// assert_eq!(pin.to_string(), "pin-11");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub u8);
impl PinId {
    /// Zero-based index of this pin (if it is in range of the largest package).
    pub fn index(self) -> Option<usize> {
        let n = usize::from(self.0);
        (1..=MAX_PINS).contains(&n).then(|| n - 1)
    }
}
impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin-{}", self.0)
    }
}
impl FromStr for PinId {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("pin-")
            .and_then(|n| n.parse::<u8>().ok())
            .map(PinId)
            .filter(|p| p.index().is_some())
            .ok_or_else(|| CircuitError::InvalidPinId(s.to_string()))
    }
}

/// The electrical role of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinRole {
    /// Data input.
    Input,
    /// Driven output.
    Output,
    /// Supply (VCC).
    Power,
    /// Ground.
    Ground,
    /// Clock input of a sequential element.
    Clock,
    /// Asynchronous or enable-style control input (preset, clear, strobe, ...).
    Control,
    /// Pin with no internal connection.
    NoConnect,
}
impl PinRole {
    /// Whether the simulator resolves a driving value for this pin.
    pub fn is_driven_input(self) -> bool {
        matches!(self, PinRole::Input | PinRole::Clock | PinRole::Control)
    }
}

/// Which side of the package outline a pin is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinSide {
    #[allow(missing_docs)] Top,
    #[allow(missing_docs)] Bottom,
    #[allow(missing_docs)] Left,
    #[allow(missing_docs)] Right,
}
impl PinSide {
    /// Side of a DIP pin: the first half runs down the left, the rest up the right.
    pub const fn of_dip(number: u8, pin_count: u8) -> Self {
        if number <= pin_count / 2 { PinSide::Left } else { PinSide::Right }
    }
}

/// A pin in an IC's fixed layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PinDefinition {
    /// Pin identifier.
    pub id: PinId,
    /// Datasheet name (e.g. `1A`, `2CLK`).
    pub name: &'static str,
    /// Electrical role.
    pub role: PinRole,
    /// Side of the package outline.
    pub side: PinSide,
}

/// Family grouping of an IC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IcCategory {
    #[allow(missing_docs)] Gate,
    #[allow(missing_docs)] FlipFlop,
    #[allow(missing_docs)] Counter,
    #[allow(missing_docs)] Decoder,
    #[allow(missing_docs)] Mux,
    #[allow(missing_docs)] Display,
}

/// Static description of an IC type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IcDefinition {
    /// The type being described.
    pub ic_type: IcType,
    /// Display name (the part number).
    pub name: &'static str,
    /// Short functional description.
    pub description: &'static str,
    /// Number of package pins.
    pub pin_count: u8,
    /// Pins in DIP order (pin 1 first).
    pub pins: &'static [PinDefinition],
    /// Family grouping.
    pub category: IcCategory,
}
impl IcDefinition {
    /// Gets a pin of this IC by identifier.
    pub fn pin(&self, id: PinId) -> Option<&'static PinDefinition> {
        self.pins.iter().find(|p| p.id == id)
    }

    /// Iterates over the pins with the given role.
    pub fn pins_with_role(&self, role: PinRole) -> impl Iterator<Item = &'static PinDefinition> {
        self.pins.iter().filter(move |p| p.role == role)
    }
}

macro_rules! ic_types {
    ($($(#[$m:meta])* $Id:ident = $part:literal),* $(,)?) => {
        /// The supported IC types, identified by 74xx part number.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum IcType {
            $(
                $(#[$m])*
                #[serde(rename = $part)]
                $Id,
            )*
        }
        impl IcType {
            /// Every supported type, in catalog order.
            pub const ALL: &'static [IcType] = &[$(IcType::$Id),*];

            /// The part number of this type.
            pub fn part_number(self) -> &'static str {
                match self {
                    $(IcType::$Id => $part,)*
                }
            }
        }
        impl FromStr for IcType {
            type Err = CircuitError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($part => Ok(IcType::$Id),)*
                    _ => Err(CircuitError::UnknownIcType(s.to_string())),
                }
            }
        }
    }
}

ic_types! {
    /// Quad 2-input NAND.
    Ic7400 = "7400",
    /// Quad 2-input NOR.
    Ic7402 = "7402",
    /// Hex inverter.
    Ic7404 = "7404",
    /// Quad 2-input AND.
    Ic7408 = "7408",
    /// Quad 2-input OR.
    Ic7432 = "7432",
    /// Quad 2-input XOR.
    Ic7486 = "7486",
    /// Dual D flip-flop with preset and clear.
    Ic7474 = "7474",
    /// Dual JK flip-flop with preset and clear.
    Ic7476 = "7476",
    /// Decade counter.
    Ic7490 = "7490",
    /// 4-bit binary counter.
    Ic7493 = "7493",
    /// 3-to-8 line decoder.
    Ic74138 = "74138",
    /// 8-to-1 multiplexer.
    Ic74151 = "74151",
    /// BCD to 7-segment decoder/driver.
    Ic7447 = "7447",
}

impl IcType {
    /// Gets the catalog entry for this type.
    pub fn definition(self) -> &'static IcDefinition {
        lookup(self)
    }
}
impl std::fmt::Display for IcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.part_number())
    }
}

/// Builds a DIP pin table: `dip![count; number name Role, ...]`.
macro_rules! dip {
    ($count:literal; $($num:literal $name:literal $role:ident),* $(,)?) => {
        &[$(PinDefinition {
            id: PinId($num),
            name: $name,
            role: PinRole::$role,
            side: PinSide::of_dip($num, $count),
        }),*]
    }
}

/// Pinout shared by the 7400, 7408, 7432 and 7486.
macro_rules! quad_gate_pins {
    () => {
        dip![14;
            1 "1A" Input, 2 "1B" Input, 3 "1Y" Output,
            4 "2A" Input, 5 "2B" Input, 6 "2Y" Output,
            7 "GND" Ground,
            8 "3Y" Output, 9 "3A" Input, 10 "3B" Input,
            11 "4Y" Output, 12 "4A" Input, 13 "4B" Input,
            14 "VCC" Power,
        ]
    }
}

static IC_7400: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7400,
    name: "7400",
    description: "Quad 2-Input NAND Gate",
    pin_count: 14,
    pins: quad_gate_pins!(),
    category: IcCategory::Gate,
};
static IC_7402: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7402,
    name: "7402",
    description: "Quad 2-Input NOR Gate",
    pin_count: 14,
    pins: dip![14;
        1 "1Y" Output, 2 "1A" Input, 3 "1B" Input,
        4 "2Y" Output, 5 "2A" Input, 6 "2B" Input,
        7 "GND" Ground,
        8 "3A" Input, 9 "3B" Input, 10 "3Y" Output,
        11 "4A" Input, 12 "4B" Input, 13 "4Y" Output,
        14 "VCC" Power,
    ],
    category: IcCategory::Gate,
};
static IC_7404: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7404,
    name: "7404",
    description: "Hex Inverter",
    pin_count: 14,
    pins: dip![14;
        1 "1A" Input, 2 "1Y" Output,
        3 "2A" Input, 4 "2Y" Output,
        5 "3A" Input, 6 "3Y" Output,
        7 "GND" Ground,
        8 "4Y" Output, 9 "4A" Input,
        10 "5Y" Output, 11 "5A" Input,
        12 "6Y" Output, 13 "6A" Input,
        14 "VCC" Power,
    ],
    category: IcCategory::Gate,
};
static IC_7408: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7408,
    name: "7408",
    description: "Quad 2-Input AND Gate",
    pin_count: 14,
    pins: quad_gate_pins!(),
    category: IcCategory::Gate,
};
static IC_7432: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7432,
    name: "7432",
    description: "Quad 2-Input OR Gate",
    pin_count: 14,
    pins: quad_gate_pins!(),
    category: IcCategory::Gate,
};
static IC_7486: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7486,
    name: "7486",
    description: "Quad 2-Input XOR Gate",
    pin_count: 14,
    pins: quad_gate_pins!(),
    category: IcCategory::Gate,
};
static IC_7474: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7474,
    name: "7474",
    description: "Dual D-Type Positive-Edge-Triggered Flip-Flop",
    pin_count: 14,
    pins: dip![14;
        1 "1CLR" Control, 2 "1D" Input, 3 "1CLK" Clock, 4 "1PRE" Control,
        5 "1Q" Output, 6 "1Q'" Output,
        7 "GND" Ground,
        8 "2Q'" Output, 9 "2Q" Output,
        10 "2PRE" Control, 11 "2CLK" Clock, 12 "2D" Input, 13 "2CLR" Control,
        14 "VCC" Power,
    ],
    category: IcCategory::FlipFlop,
};
static IC_7476: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7476,
    name: "7476",
    description: "Dual JK Flip-Flop with Preset and Clear",
    pin_count: 16,
    pins: dip![16;
        1 "1CLK" Clock, 2 "1PRE" Control, 3 "1CLR" Control, 4 "1J" Input,
        5 "VCC" Power,
        6 "2CLK" Clock, 7 "2PRE" Control, 8 "2CLR" Control, 9 "2J" Input,
        10 "2Q'" Output, 11 "2Q" Output, 12 "2K" Input,
        13 "GND" Ground,
        14 "1Q'" Output, 15 "1Q" Output, 16 "1K" Input,
    ],
    category: IcCategory::FlipFlop,
};
static IC_7490: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7490,
    name: "7490",
    description: "Decade Counter",
    pin_count: 14,
    pins: dip![14;
        1 "CKB" Clock, 2 "R0(1)" Control, 3 "R0(2)" Control, 4 "NC" NoConnect,
        5 "VCC" Power, 6 "R9(1)" Control, 7 "R9(2)" Control,
        8 "QC" Output, 9 "QB" Output, 10 "GND" Ground,
        11 "QD" Output, 12 "QA" Output, 13 "NC" NoConnect, 14 "CKA" Clock,
    ],
    category: IcCategory::Counter,
};
static IC_7493: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7493,
    name: "7493",
    description: "4-Bit Binary Counter",
    pin_count: 14,
    pins: dip![14;
        1 "CKB" Clock, 2 "R0(1)" Control, 3 "R0(2)" Control, 4 "NC" NoConnect,
        5 "VCC" Power, 6 "NC" NoConnect, 7 "NC" NoConnect,
        8 "QC" Output, 9 "QB" Output, 10 "GND" Ground,
        11 "QD" Output, 12 "QA" Output, 13 "NC" NoConnect, 14 "CKA" Clock,
    ],
    category: IcCategory::Counter,
};
static IC_74138: IcDefinition = IcDefinition {
    ic_type: IcType::Ic74138,
    name: "74138",
    description: "3-to-8 Line Decoder/Demultiplexer",
    pin_count: 16,
    pins: dip![16;
        1 "A" Input, 2 "B" Input, 3 "C" Input,
        4 "G2A" Control, 5 "G2B" Control, 6 "G1" Control,
        7 "Y7" Output, 8 "GND" Ground,
        9 "Y6" Output, 10 "Y5" Output, 11 "Y4" Output, 12 "Y3" Output,
        13 "Y2" Output, 14 "Y1" Output, 15 "Y0" Output,
        16 "VCC" Power,
    ],
    category: IcCategory::Decoder,
};
static IC_74151: IcDefinition = IcDefinition {
    ic_type: IcType::Ic74151,
    name: "74151",
    description: "8-to-1 Line Multiplexer",
    pin_count: 16,
    pins: dip![16;
        1 "D3" Input, 2 "D2" Input, 3 "D1" Input, 4 "D0" Input,
        5 "Y" Output, 6 "W" Output, 7 "G" Control, 8 "GND" Ground,
        9 "C" Input, 10 "B" Input, 11 "A" Input,
        12 "D7" Input, 13 "D6" Input, 14 "D5" Input, 15 "D4" Input,
        16 "VCC" Power,
    ],
    category: IcCategory::Mux,
};
static IC_7447: IcDefinition = IcDefinition {
    ic_type: IcType::Ic7447,
    name: "7447",
    description: "BCD to 7-Segment Decoder/Driver",
    pin_count: 16,
    pins: dip![16;
        1 "B" Input, 2 "C" Input, 3 "LT" Control, 4 "BI/RBO" Control,
        5 "RBI" Control, 6 "D" Input, 7 "A" Input, 8 "GND" Ground,
        9 "e" Output, 10 "d" Output, 11 "c" Output, 12 "b" Output,
        13 "a" Output, 14 "g" Output, 15 "f" Output,
        16 "VCC" Power,
    ],
    category: IcCategory::Display,
};

/// Gets the catalog entry for an IC type.
pub fn lookup(ic_type: IcType) -> &'static IcDefinition {
    match ic_type {
        IcType::Ic7400  => &IC_7400,
        IcType::Ic7402  => &IC_7402,
        IcType::Ic7404  => &IC_7404,
        IcType::Ic7408  => &IC_7408,
        IcType::Ic7432  => &IC_7432,
        IcType::Ic7486  => &IC_7486,
        IcType::Ic7474  => &IC_7474,
        IcType::Ic7476  => &IC_7476,
        IcType::Ic7490  => &IC_7490,
        IcType::Ic7493  => &IC_7493,
        IcType::Ic74138 => &IC_74138,
        IcType::Ic74151 => &IC_74151,
        IcType::Ic7447  => &IC_7447,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn layouts_are_consistent() {
        for &ty in IcType::ALL {
            let def = lookup(ty);
            assert_eq!(def.ic_type, ty);
            assert_eq!(def.name, ty.part_number());
            assert_eq!(def.pins.len(), usize::from(def.pin_count), "{ty}: pin count");
            assert!(usize::from(def.pin_count) <= MAX_PINS);

            let ids: HashSet<_> = def.pins.iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), def.pins.len(), "{ty}: duplicate pin ids");
            for (i, pin) in def.pins.iter().enumerate() {
                assert_eq!(pin.id.index(), Some(i), "{ty}: pins out of DIP order");
            }
            assert_eq!(def.pins_with_role(PinRole::Power).count(), 1, "{ty}: VCC");
            assert_eq!(def.pins_with_role(PinRole::Ground).count(), 1, "{ty}: GND");
        }
    }

    #[test]
    fn sides() {
        let def = lookup(IcType::Ic7476);
        assert_eq!(def.pin(PinId(8)).map(|p| p.side), Some(PinSide::Left));
        assert_eq!(def.pin(PinId(9)).map(|p| p.side), Some(PinSide::Right));
        assert_eq!(lookup(IcType::Ic7400).pin(PinId(7)).map(|p| p.side), Some(PinSide::Left));
    }

    #[test]
    fn part_numbers_round_trip() {
        for &ty in IcType::ALL {
            assert_eq!(ty.to_string().parse::<IcType>().ok(), Some(ty));
        }
        assert!(matches!("7401".parse::<IcType>(), Err(CircuitError::UnknownIcType(s)) if s == "7401"));
    }

    #[test]
    fn pin_ids() {
        assert_eq!("pin-1".parse::<PinId>().ok(), Some(PinId(1)));
        assert!("pin-0".parse::<PinId>().is_err());
        assert!("pin-17".parse::<PinId>().is_err());
        assert!("input".parse::<PinId>().is_err());
    }
}
